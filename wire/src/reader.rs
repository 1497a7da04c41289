use byteorder::{BigEndian, ByteOrder};

use crate::{Result, WireError};

/// A cursor over an immutable byte slice. Every `read_*` call advances the
/// cursor and fails with `WireError::Truncated` rather than panicking when
/// the requested bytes exceed what remains.
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Reader { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(WireError::Truncated);
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    pub fn read_u24(&mut self) -> Result<u32> {
        Ok(BigEndian::read_u24(self.take(3)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(BigEndian::read_u32(self.take(4)?))
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    /// Peek at the next byte without advancing the cursor.
    pub fn peek_u8(&self) -> Result<u8> {
        if self.is_empty() {
            return Err(WireError::Truncated);
        }
        Ok(self.buf[self.pos])
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n)?;
        Ok(())
    }

    /// Read a u8-length-prefixed sub-slice, returning a fresh `Reader` over
    /// exactly that many bytes. Callers that expect no trailing data should
    /// call `assert_exhausted` on the result.
    pub fn read_u8_prefixed(&mut self) -> Result<Reader<'a>> {
        let len = self.read_u8()? as usize;
        Ok(Reader::new(self.take(len)?))
    }

    pub fn read_u16_prefixed(&mut self) -> Result<Reader<'a>> {
        let len = self.read_u16()? as usize;
        Ok(Reader::new(self.take(len)?))
    }

    pub fn read_u24_prefixed(&mut self) -> Result<Reader<'a>> {
        let len = self.read_u24()? as usize;
        Ok(Reader::new(self.take(len)?))
    }

    /// Like `read_u8_prefixed`, but returns the raw bytes instead of a
    /// sub-cursor — convenient for opaque blobs that callers won't parse
    /// further (session ids, ticket bodies, ...).
    pub fn read_u8_prefixed_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_u8()? as usize;
        self.take(len)
    }

    pub fn read_u16_prefixed_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_u16()? as usize;
        self.take(len)
    }

    pub fn read_u24_prefixed_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_u24()? as usize;
        self.take(len)
    }

    /// Fails with `TrailingData` unless every byte of the cursor has been
    /// consumed. Every caller holding a sub-cursor that represents a
    /// complete wire structure (an extension body, a handshake message)
    /// must call this before accepting the parse as valid.
    pub fn assert_exhausted(&self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(WireError::TrailingData)
        }
    }

    pub fn rest(&mut self) -> &'a [u8] {
        let rest = &self.buf[self.pos..];
        self.pos = self.buf.len();
        rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_read_fails() {
        let mut r = Reader::new(&[0x01, 0x02]);
        assert_eq!(r.read_u8().unwrap(), 1);
        assert_eq!(r.read_u16(), Err(WireError::Truncated));
    }

    #[test]
    fn length_prefix_mismatch_fails() {
        // declares 5 bytes follow, but only 2 are present
        let mut r = Reader::new(&[0x05, 0xAA, 0xBB]);
        assert_eq!(r.read_u8_prefixed_bytes(), Err(WireError::Truncated));
    }

    #[test]
    fn nested_cursor_enforces_exhaustion() {
        // u16-len = 3, body = [1,2,3,4] -- one trailing byte inside the sub-cursor
        let mut r = Reader::new(&[0x00, 0x03, 1, 2, 3]);
        let mut inner = r.read_u16_prefixed().unwrap();
        assert_eq!(inner.read_u8().unwrap(), 1);
        assert_eq!(inner.read_u8().unwrap(), 2);
        assert_eq!(inner.remaining(), 1);
        assert_eq!(inner.assert_exhausted(), Err(WireError::TrailingData));
    }
}
