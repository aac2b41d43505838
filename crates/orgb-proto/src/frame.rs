//! Frame type combining a header and raw body bytes.
//!
//! A `Frame` is the transport-layer unit: a 16-byte header followed by
//! `body_size` bytes of already-encoded body. Decoding the body into a typed
//! message happens separately (see [`Message`](crate::Message)), so the
//! transport can move frames around without understanding them.

use bytes::{BufMut, Bytes};

use crate::{
    Header,
    errors::{ProtocolError, Result},
};

/// Complete protocol frame (transport layer)
///
/// # Invariants
///
/// - `body.len()` always matches `header.body_size()`; [`Frame::new`] pins
///   the header field to the actual body length and [`Frame::decode`] reads
///   exactly the declared length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame header (16 bytes)
    pub header: Header,

    /// Raw body bytes (already encoded)
    pub body: Bytes,
}

impl Frame {
    /// Create a new frame with automatic `body_size` calculation.
    ///
    /// The header's `body_size` field is set to the actual body length, so a
    /// frame with mismatched sizes cannot be constructed.
    #[must_use]
    pub fn new(mut header: Header, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        header.body_size = (body.len() as u32).to_le_bytes();
        Self { header, body }
    }

    /// Total wire size of this frame (header + body).
    #[must_use]
    pub fn wire_size(&self) -> usize {
        Header::SIZE + self.body.len()
    }

    /// Encode the frame into a buffer.
    ///
    /// Writes `[header (16 bytes)] + [body (variable)]`. Encoding is a plain
    /// copy and cannot fail; the transport enforces the size cap.
    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_slice(&self.header.to_bytes());
        dst.put_slice(&self.body);
    }

    /// Decode a frame from wire bytes.
    ///
    /// Reads the header, then exactly `body_size` body bytes. Trailing data
    /// is ignored so a larger buffer can hold several frames.
    ///
    /// # Errors
    ///
    /// Returns an error if the header is invalid or fewer than `body_size`
    /// bytes follow it.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let header = Header::from_bytes(bytes)?;

        let body_size = header.body_size() as usize;
        let available = bytes.len() - Header::SIZE;
        if available < body_size {
            return Err(ProtocolError::Truncated { needed: body_size, available });
        }

        let body = Bytes::copy_from_slice(&bytes[Header::SIZE..Header::SIZE + body_size]);

        Ok(Self { header: *header, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MessageType;

    #[test]
    fn new_pins_body_size() {
        let header = Header::new(MessageType::SetClientName, 0);
        let frame = Frame::new(header, vec![1u8, 2, 3, 4, 5, 6]);
        assert_eq!(frame.header.body_size(), 6);
        assert_eq!(frame.wire_size(), 22);
    }

    #[test]
    fn frame_round_trip() {
        let header = Header::new(MessageType::UpdateLeds, 3);
        let frame = Frame::new(header, vec![0xAAu8; 10]);

        let mut wire = Vec::new();
        frame.encode(&mut wire);
        assert_eq!(wire.len(), frame.wire_size());

        let parsed = Frame::decode(&wire).expect("should decode");
        assert_eq!(frame, parsed);
    }

    #[test]
    fn empty_body_round_trip() {
        let header = Header::new(MessageType::SetCustomMode, 1);
        let frame = Frame::new(header, Vec::new());

        let mut wire = Vec::new();
        frame.encode(&mut wire);
        assert_eq!(wire.len(), Header::SIZE);

        let parsed = Frame::decode(&wire).expect("should decode");
        assert_eq!(parsed.header.body_size(), 0);
        assert!(parsed.body.is_empty());
    }

    #[test]
    fn reject_truncated_body() {
        let header = Header::new(MessageType::UpdateLeds, 0);
        let frame = Frame::new(header, vec![0u8; 20]);

        let mut wire = Vec::new();
        frame.encode(&mut wire);
        wire.truncate(Header::SIZE + 5);

        let result = Frame::decode(&wire);
        assert_eq!(result, Err(ProtocolError::Truncated { needed: 20, available: 5 }));
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let header = Header::new(MessageType::DeviceListUpdated, 0);
        let frame = Frame::new(header, Vec::new());

        let mut wire = Vec::new();
        frame.encode(&mut wire);
        wire.extend_from_slice(&[0xFF; 8]);

        let parsed = Frame::decode(&wire).expect("should decode");
        assert!(parsed.body.is_empty());
    }
}
