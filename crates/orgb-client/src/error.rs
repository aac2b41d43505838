//! Error types for the client layer.
//!
//! Protocol-shape failures are produced by `orgb-proto` and wrapped here;
//! this module adds the connection-lifecycle kinds (timeouts, disconnects,
//! correlation failures) and classifies which errors leave the handle
//! usable.

use std::{fmt, io};

use orgb_proto::ProtocolError;

/// Errors surfaced by [`Client`](crate::Client) operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Operation attempted on a handle with no live connection
    NotConnected,

    /// `connect` attempted on a handle that is already connected
    AlreadyConnected,

    /// A deadline fired before the operation completed
    Timeout,

    /// The transport was closed or reset by the peer
    Disconnected,

    /// An inbound frame matched no pending expectation and is not a
    /// known notification
    UnexpectedMessage {
        /// Message type code of the offending frame
        message_type: u32,
    },

    /// The wire data violated the protocol
    Protocol(ProtocolError),

    /// Transport-level failure outside the disconnect/timeout kinds
    Transport(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not connected"),
            Self::AlreadyConnected => write!(f, "already connected"),
            Self::Timeout => write!(f, "operation timed out"),
            Self::Disconnected => write!(f, "connection closed by peer"),
            Self::UnexpectedMessage { message_type } => {
                write!(f, "unexpected message: type {} matches no pending request", message_type)
            },
            Self::Protocol(err) => write!(f, "protocol error: {}", err),
            Self::Transport(msg) => write!(f, "transport error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Protocol(err) => Some(err),
            _ => None,
        }
    }
}

impl ClientError {
    /// Whether the handle survives this error.
    ///
    /// Only the two state-check kinds are recoverable; everything else
    /// breaks the connection, and further calls return
    /// [`ClientError::NotConnected`] until the handle reconnects.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotConnected | Self::AlreadyConnected)
    }
}

impl From<ProtocolError> for ClientError {
    fn from(err: ProtocolError) -> Self {
        Self::Protocol(err)
    }
}

/// Convert io::Error to ClientError (for transport failures).
///
/// EOF-ish kinds collapse to `Disconnected` and timeout kinds to `Timeout`
/// so callers never have to inspect io error kinds themselves.
impl From<io::Error> for ClientError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe => Self::Disconnected,
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => Self::Timeout,
            _ => Self::Transport(err.to_string()),
        }
    }
}

/// Convenient Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
