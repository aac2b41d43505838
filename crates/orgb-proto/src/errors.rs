//! Error types for the OpenRGB wire protocol.
//!
//! All errors are structured, testable, and carry the values that caused the
//! failure.

use thiserror::Error;

/// Protocol-level errors that can occur during frame parsing and validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Input buffer exhausted mid-field
    #[error("input truncated: needed {needed} bytes, only {available} available")]
    Truncated {
        /// Bytes the current field required
        needed: usize,
        /// Bytes left in the buffer
        available: usize,
    },

    /// Invalid magic bytes in the frame header
    #[error("invalid magic: expected \"ORGB\"")]
    BadMagic,

    /// Header message type code not in the recognised set
    #[error("unknown message type: {0}")]
    UnknownMessageType(u32),

    /// A 32-bit enum field carried a value outside its range
    #[error("invalid {kind} value: {value}")]
    InvalidEnum {
        /// Which enum the value was decoded as
        kind: &'static str,
        /// The offending wire value
        value: u32,
    },

    /// A length-prefixed string had no terminator or a non-zero final byte
    #[error("string field is not NUL-terminated")]
    UnterminatedString,

    /// A length-prefixed string was not valid UTF-8
    #[error("string field is not valid UTF-8")]
    InvalidString,

    /// A zone's declared matrix length disagrees with its dimensions
    #[error("matrix block size mismatch: declared {declared}, computed {computed}")]
    MatrixSizeMismatch {
        /// The 16-bit length field from the wire
        declared: u16,
        /// `8 + 4 * height * width` from the decoded dimensions
        computed: u64,
    },

    /// The body's `data_size` mirror disagrees with the header's `body_size`
    #[error("data_size mismatch: header says {header} bytes, body says {body}")]
    DataSizeMismatch {
        /// `body_size` from the frame header
        header: u32,
        /// `data_size` from the message body
        body: u32,
    },

    /// A device's active mode index points past its mode list
    #[error("active_mode {active_mode} out of range for {modes} modes")]
    ActiveModeOutOfRange {
        /// The decoded active mode index
        active_mode: u32,
        /// Number of modes the device declared
        modes: usize,
    },

    /// A device's color list length disagrees with its LED list length
    #[error("color count {colors} does not match LED count {leds}")]
    ColorCountMismatch {
        /// Number of colors the device declared
        colors: usize,
        /// Number of LEDs the device declared
        leds: usize,
    },

    /// A message body left undecoded bytes behind
    #[error("trailing bytes after message body: {0} left over")]
    TrailingBytes(usize),

    /// A message was decoded in the wrong direction
    #[error("message type {0} is never sent by this peer")]
    WrongDirection(u32),

    /// Declared body size exceeds the configured maximum
    #[error("body too large: {size} bytes exceeds maximum {max}")]
    OverSized {
        /// Declared body size
        size: usize,
        /// Configured cap
        max: usize,
    },
}

/// Convenient Result type alias for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;
