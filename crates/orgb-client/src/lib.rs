//! OpenRGB client: connection logic over the wire format.
//!
//! This crate contains the client side of the OpenRGB SDK protocol. The
//! protocol logic is strictly separated from I/O:
//!
//! ```text
//!      ┌──────────────────────────────┐
//!      │ session (pure state machine) │
//!      │ - handshake & versioning     │
//!      │ - FIFO reply correlation     │
//!      │ - notification routing       │
//!      └──────────────────────────────┘
//!                    ↑ frames / actions
//!      ┌──────────────────────────────┐
//!      │ client (blocking driver)     │
//!      │ - executes session actions   │
//!      │ - deadlines & error policy   │
//!      └──────────────────────────────┘
//!                    ↑ frames
//!      ┌──────────────────────────────┐
//!      │ transport (framed TCP)       │
//!      └──────────────────────────────┘
//! ```
//!
//! # Key Principles
//!
//! - No I/O in the state machine: [`session::Session`] only turns frames
//!   into state transitions and actions, which makes the correlation and
//!   handshake rules testable without sockets.
//! - One reader, one writer: the protocol has no request ids, so reply
//!   correlation is FIFO per message type. [`Client`] is therefore a
//!   single-threaded handle; callers that share it must serialize access
//!   externally.
//! - No silent failure: every fatal error tears the connection down and is
//!   returned to the caller; later calls get
//!   [`error::ClientError::NotConnected`] until the handle reconnects.
//!
//! # Modules
//!
//! - [`client`]: public blocking API ([`Client`])
//! - [`session`]: connection state machine (handshake, correlation)
//! - [`transport`]: framed blocking TCP transport with deadlines
//! - [`error`]: client error types

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod client;
pub mod error;
pub mod session;
pub mod transport;

pub use client::{Client, DEFAULT_HANDSHAKE_TIMEOUT, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT};
pub use error::{ClientError, Result};
pub use session::Notification;
