//! # OpenRGB network protocol: wire format
//!
//! This crate implements the binary framing layer of the OpenRGB SDK
//! protocol, the TCP protocol the OpenRGB daemon speaks to expose
//! RGB-capable peripherals as programmable controllers.
//!
//! ## Protocol Design
//!
//! - **Header**: every frame opens with a fixed 16-byte header: the ASCII
//!   magic `ORGB`, a device index, a message type code, and the body length.
//!   Parsed zero-copy via [`zerocopy`](https://docs.rs/zerocopy).
//! - **Body**: a hand-rolled little-endian encoding of integers,
//!   length-prefixed NUL-terminated strings, 4-byte color triples, and
//!   16-bit-counted lists. There is no self-describing layer; both peers
//!   must agree on the layout per message type.
//! - **Description records**: controller data replies embed a tree of
//!   mode/zone/LED records, each with an exact size calculation so outbound
//!   buffers are sized before a single byte is written.
//!
//! ## Implementation Notes
//!
//! - **Explicit Validation**: all parsing returns `Result`; malformed
//!   frames are rejected with structured errors naming the offending values.
//!   There are no "unchecked" fast paths.
//!
//! - **Size Limits**: the header codec imposes no body size bound so the
//!   cap stays a transport concern; clients enforce a 16 MiB default before
//!   allocating.
//!
//! - **Direction Discipline**: requests and replies share type codes. The
//!   decoders are explicit about which peer produced a frame; nothing is
//!   inferred from content.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod descriptions;
pub mod errors;
pub mod flags;
pub mod frame;
pub mod header;
pub mod message_type;
pub mod messages;
pub mod types;

pub use descriptions::{DeviceDescription, LedDescription, ModeDescription, ZoneDescription, ZoneMatrix};
pub use errors::{ProtocolError, Result};
pub use flags::ModeFlags;
pub use frame::Frame;
pub use header::Header;
pub use message_type::MessageType;
pub use messages::Message;
pub use types::{Color, ColorMode, DeviceType, Direction, ZoneType};

/// Version of the protocol this crate implements.
///
/// The client announces it during the handshake; the negotiated version for
/// a connection is the minimum of both peers' values.
pub const IMPLEMENTED_PROTOCOL_VERSION: u32 = 1;
