//! Little-endian cursors over contiguous byte buffers.
//!
//! The wire format is built from a handful of primitives: unsigned integers,
//! fixed 4-byte colors, length-prefixed strings, and 16-bit-counted lists.
//! [`BufferWriter`] appends them to a growable buffer and cannot fail;
//! callers size the buffer up front from the records' `calc_size`.
//! [`BufferReader`] consumes them from a bounded slice and fails with
//! [`ProtocolError::Truncated`] instead of reading past the end.
//!
//! All multi-byte integers are little-endian regardless of host byte order.
//! The cursors are pure; they never perform I/O.

use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    errors::{ProtocolError, Result},
    types::Color,
};

/// Wire size of a length-prefixed string: length word + content + terminator.
#[must_use]
pub fn string_wire_size(s: &str) -> usize {
    2 + s.len() + 1
}

/// Wire size of a 16-bit-counted color list.
#[must_use]
pub fn color_list_wire_size(colors: &[Color]) -> usize {
    2 + Color::WIRE_SIZE * colors.len()
}

/// Appends protocol primitives to a growable byte buffer.
#[derive(Debug, Default)]
pub struct BufferWriter {
    buf: BytesMut,
}

impl BufferWriter {
    /// Create an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with pre-reserved capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: BytesMut::with_capacity(capacity) }
    }

    /// Bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Append a `u8`.
    pub fn put_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    /// Append a `u16`, little-endian.
    pub fn put_u16(&mut self, value: u16) {
        self.buf.put_u16_le(value);
    }

    /// Append a `u32`, little-endian.
    pub fn put_u32(&mut self, value: u32) {
        self.buf.put_u32_le(value);
    }

    /// Append raw bytes verbatim.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    /// Append a color as `{r, g, b, 0}`.
    pub fn put_color(&mut self, color: Color) {
        self.buf.put_slice(&[color.r, color.g, color.b, 0]);
    }

    /// Append a length-prefixed, NUL-terminated string.
    ///
    /// The 16-bit length counts the terminator, so an empty string is
    /// written as `01 00 00`.
    pub fn put_string(&mut self, s: &str) {
        debug_assert!(s.len() + 1 <= usize::from(u16::MAX));
        self.put_u16((s.len() + 1) as u16);
        self.buf.put_slice(s.as_bytes());
        self.buf.put_u8(0);
    }

    /// Append a 16-bit count followed by the colors.
    pub fn put_color_list(&mut self, colors: &[Color]) {
        debug_assert!(colors.len() <= usize::from(u16::MAX));
        self.put_u16(colors.len() as u16);
        for &color in colors {
            self.put_color(color);
        }
    }

    /// Finish writing and hand the buffer over.
    #[must_use]
    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}

/// Consumes protocol primitives from a bounded byte slice.
#[derive(Debug)]
pub struct BufferReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> BufferReader<'a> {
    /// Create a reader over the whole slice.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Whether every byte has been consumed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(ProtocolError::Truncated { needed: n, available: self.remaining() });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read a `u8`.
    pub fn get_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Read a `u16`, little-endian.
    pub fn get_u16(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Read a `u32`, little-endian.
    pub fn get_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read exactly `n` raw bytes.
    pub fn get_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    /// Read a 4-byte color; the padding byte is ignored.
    pub fn get_color(&mut self) -> Result<Color> {
        let bytes = self.take(Color::WIRE_SIZE)?;
        Ok(Color::new(bytes[0], bytes[1], bytes[2]))
    }

    /// Read a length-prefixed, NUL-terminated string.
    ///
    /// The length must be at least 1 (the terminator), the final byte must
    /// be zero, and the content must be valid UTF-8.
    pub fn get_string(&mut self) -> Result<String> {
        let len = usize::from(self.get_u16()?);
        if len == 0 {
            return Err(ProtocolError::UnterminatedString);
        }
        let raw = self.take(len)?;
        let Some((&terminator, content)) = raw.split_last() else {
            return Err(ProtocolError::UnterminatedString);
        };
        if terminator != 0 {
            return Err(ProtocolError::UnterminatedString);
        }
        String::from_utf8(content.to_vec()).map_err(|_| ProtocolError::InvalidString)
    }

    /// Read a 16-bit count followed by that many colors.
    pub fn get_color_list(&mut self) -> Result<Vec<Color>> {
        let count = usize::from(self.get_u16()?);
        let mut colors = Vec::with_capacity(count);
        for _ in 0..count {
            colors.push(self.get_color()?);
        }
        Ok(colors)
    }
}
