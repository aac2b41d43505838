//! Frame header implementation with zero-copy parsing.
//!
//! Every frame begins with this fixed 16-byte structure, serialized as raw
//! little-endian binary. Fields are stored as raw byte arrays so the struct
//! can be cast directly from untrusted network bytes without alignment
//! concerns or unsafe code.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{
    MessageType,
    errors::{ProtocolError, Result},
};

/// Fixed 16-byte frame header (little-endian byte order)
///
/// Layout on the wire:
/// `[magic "ORGB": 4] [device_idx: u32] [message_type: u32] [body_size: u32]`
///
/// # Validation
///
/// [`Header::from_bytes`] guarantees the magic is correct and the message
/// type code is recognised. It deliberately does NOT bound `body_size`; the
/// transport layer owns the size cap so that the cap stays configurable in
/// one place.
#[repr(C)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, PartialEq, Eq)]
pub struct Header {
    magic: [u8; 4],
    device_idx: [u8; 4],
    message_type: [u8; 4],
    pub(crate) body_size: [u8; 4],
}

impl Header {
    /// Size of the serialized header (16 bytes)
    pub const SIZE: usize = 16;

    /// Magic bytes: "ORGB" in ASCII
    pub const MAGIC: [u8; 4] = *b"ORGB";

    /// Create a new header with the given message type and target device.
    ///
    /// `body_size` starts at zero; [`Frame::new`](crate::Frame::new) pins it
    /// to the actual body length.
    #[must_use]
    pub fn new(message_type: MessageType, device_idx: u32) -> Self {
        Self {
            magic: Self::MAGIC,
            device_idx: device_idx.to_le_bytes(),
            message_type: message_type.to_u32().to_le_bytes(),
            body_size: [0; 4],
        }
    }

    /// Parse a header from network bytes (zero-copy).
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is shorter than 16 bytes, the magic is
    /// not `ORGB`, or the message type code is unknown.
    pub fn from_bytes(bytes: &[u8]) -> Result<&Self> {
        let header = Self::ref_from_prefix(bytes)
            .map_err(|_| ProtocolError::Truncated {
                needed: Self::SIZE,
                available: bytes.len(),
            })?
            .0;

        if header.magic != Self::MAGIC {
            return Err(ProtocolError::BadMagic);
        }

        let code = u32::from_le_bytes(header.message_type);
        if MessageType::from_u32(code).is_none() {
            return Err(ProtocolError::UnknownMessageType(code));
        }

        Ok(header)
    }

    /// Serialize the header to bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut arr = [0u8; Self::SIZE];
        arr.copy_from_slice(IntoBytes::as_bytes(self));
        arr
    }

    /// Target controller index (0 for server-global messages).
    #[must_use]
    pub fn device_idx(&self) -> u32 {
        u32::from_le_bytes(self.device_idx)
    }

    /// Raw message type code.
    #[must_use]
    pub fn message_type(&self) -> u32 {
        u32::from_le_bytes(self.message_type)
    }

    /// Message type as an enum, if the code is recognised.
    ///
    /// Always `Some` for headers that came through [`Header::from_bytes`] or
    /// [`Header::new`].
    #[must_use]
    pub fn message_type_enum(&self) -> Option<MessageType> {
        MessageType::from_u32(self.message_type())
    }

    /// Declared body length (frame length minus the header's 16 bytes).
    #[must_use]
    pub fn body_size(&self) -> u32 {
        u32::from_le_bytes(self.body_size)
    }
}

impl std::fmt::Debug for Header {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Header")
            .field("device_idx", &self.device_idx())
            .field("message_type", &self.message_type())
            .field("body_size", &self.body_size())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_size() {
        assert_eq!(std::mem::size_of::<Header>(), Header::SIZE);
        assert_eq!(Header::SIZE, 16);
    }

    #[test]
    fn magic_is_orgb() {
        assert_eq!(Header::MAGIC, [0x4F, 0x52, 0x47, 0x42]);
        let header = Header::new(MessageType::RequestControllerCount, 0);
        assert_eq!(&header.to_bytes()[..4], b"ORGB");
    }

    #[test]
    fn header_round_trip() {
        let header = Header::new(MessageType::UpdateSingleLed, 7);
        let bytes = header.to_bytes();
        let parsed = Header::from_bytes(&bytes).expect("should parse");
        assert_eq!(&header, parsed);
        assert_eq!(parsed.device_idx(), 7);
        assert_eq!(parsed.message_type_enum(), Some(MessageType::UpdateSingleLed));
        assert_eq!(parsed.body_size(), 0);
    }

    #[test]
    fn reject_short_buffer() {
        let result = Header::from_bytes(&[0u8; 10]);
        assert_eq!(result, Err(ProtocolError::Truncated { needed: 16, available: 10 }));
    }

    #[test]
    fn reject_invalid_magic() {
        let mut bytes = Header::new(MessageType::RequestControllerCount, 0).to_bytes();
        bytes[0] = b'X';
        assert_eq!(Header::from_bytes(&bytes), Err(ProtocolError::BadMagic));
    }

    #[test]
    fn reject_unknown_message_type() {
        let mut bytes = Header::new(MessageType::RequestControllerCount, 0).to_bytes();
        bytes[8..12].copy_from_slice(&999u32.to_le_bytes());
        assert_eq!(Header::from_bytes(&bytes), Err(ProtocolError::UnknownMessageType(999)));
    }

    #[test]
    fn fields_are_little_endian() {
        let mut header = Header::new(MessageType::ResizeZone, 0x0102_0304);
        header.body_size = 8u32.to_le_bytes();
        let bytes = header.to_bytes();
        assert_eq!(&bytes[4..8], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&bytes[8..12], &[0xE8, 0x03, 0x00, 0x00]);
        assert_eq!(&bytes[12..16], &[0x08, 0x00, 0x00, 0x00]);
    }
}
