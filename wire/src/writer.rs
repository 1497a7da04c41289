use byteorder::{BigEndian, ByteOrder};

/// A growable big-endian byte-string writer. Length-prefixed child writers
/// patch their own length header in place when they go out of scope, so
/// callers write nested structures (an extension body inside an extension
/// list inside a handshake message) without precomputing lengths by hand.
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Writer { buf: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Writer { buf: Vec::with_capacity(cap) }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn put_u8(&mut self, v: u8) -> &mut Self {
        self.buf.push(v);
        self
    }

    pub fn put_u16(&mut self, v: u16) -> &mut Self {
        let mut tmp = [0u8; 2];
        BigEndian::write_u16(&mut tmp, v);
        self.buf.extend_from_slice(&tmp);
        self
    }

    pub fn put_u24(&mut self, v: u32) -> &mut Self {
        let mut tmp = [0u8; 4];
        BigEndian::write_u32(&mut tmp, v);
        self.buf.extend_from_slice(&tmp[1..]);
        self
    }

    pub fn put_u32(&mut self, v: u32) -> &mut Self {
        let mut tmp = [0u8; 4];
        BigEndian::write_u32(&mut tmp, v);
        self.buf.extend_from_slice(&tmp);
        self
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Opens a u8-length-prefixed child region. The length byte is
    /// reserved now and patched with the true body length when the
    /// returned `LengthPrefixed` is dropped.
    pub fn begin_u8(&mut self) -> LengthPrefixed<'_> {
        let header_at = self.buf.len();
        self.buf.push(0);
        LengthPrefixed { writer: self, header_at, header_len: 1 }
    }

    pub fn begin_u16(&mut self) -> LengthPrefixed<'_> {
        let header_at = self.buf.len();
        self.buf.extend_from_slice(&[0, 0]);
        LengthPrefixed { writer: self, header_at, header_len: 2 }
    }

    pub fn begin_u24(&mut self) -> LengthPrefixed<'_> {
        let header_at = self.buf.len();
        self.buf.extend_from_slice(&[0, 0, 0]);
        LengthPrefixed { writer: self, header_at, header_len: 3 }
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrowed handle to an in-progress length-prefixed region. Write the
/// body through the `Deref`/`DerefMut` to `Writer`-like methods exposed
/// here; the header is patched on `Drop`.
pub struct LengthPrefixed<'a> {
    writer: &'a mut Writer,
    header_at: usize,
    header_len: usize,
}

impl<'a> LengthPrefixed<'a> {
    pub fn put_u8(&mut self, v: u8) -> &mut Self {
        self.writer.put_u8(v);
        self
    }

    pub fn put_u16(&mut self, v: u16) -> &mut Self {
        self.writer.put_u16(v);
        self
    }

    pub fn put_u24(&mut self, v: u32) -> &mut Self {
        self.writer.put_u24(v);
        self
    }

    pub fn put_u32(&mut self, v: u32) -> &mut Self {
        self.writer.put_u32(v);
        self
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.writer.put_bytes(bytes);
        self
    }

    pub fn begin_u8(&mut self) -> LengthPrefixed<'_> {
        self.writer.begin_u8()
    }

    pub fn begin_u16(&mut self) -> LengthPrefixed<'_> {
        self.writer.begin_u16()
    }

    pub fn begin_u24(&mut self) -> LengthPrefixed<'_> {
        self.writer.begin_u24()
    }

    pub fn len(&self) -> usize {
        self.writer.buf.len() - (self.header_at + self.header_len)
    }
}

impl<'a> Drop for LengthPrefixed<'a> {
    fn drop(&mut self) {
        let body_len = self.writer.buf.len() - (self.header_at + self.header_len);
        let header = &mut self.writer.buf[self.header_at..self.header_at + self.header_len];
        match self.header_len {
            1 => header[0] = body_len as u8,
            2 => BigEndian::write_u16(header, body_len as u16),
            3 => {
                let mut tmp = [0u8; 4];
                BigEndian::write_u32(&mut tmp, body_len as u32);
                header.copy_from_slice(&tmp[1..]);
            }
            _ => unreachable!("header_len is only ever 1, 2, or 3"),
        }
    }
}

/// A fixed-capacity buffer used where the caller wants to guarantee no
/// heap growth (e.g. writing directly into a caller-owned record buffer).
/// Fails with `WireError::Overflow` rather than reallocating.
pub struct FixedWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> FixedWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        FixedWriter { buf, pos: 0 }
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) -> crate::Result<()> {
        if self.buf.len() - self.pos < bytes.len() {
            return Err(crate::WireError::Overflow);
        }
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(())
    }

    pub fn finish(self) -> &'a [u8] {
        &self.buf[..self.pos]
    }

    pub fn len(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_length_prefixes_patch_correctly() {
        let mut w = Writer::new();
        {
            let mut outer = w.begin_u16();
            outer.put_u8(0xAA);
            {
                let mut inner = outer.begin_u8();
                inner.put_bytes(b"xyz");
            }
            outer.put_u8(0xBB);
        }
        let buf = w.finish();
        // outer length = 1 (0xAA) + 1 (inner len byte) + 3 (xyz) + 1 (0xBB) = 6
        assert_eq!(&buf[..2], &[0x00, 0x06]);
        assert_eq!(buf[2], 0xAA);
        assert_eq!(buf[3], 3); // inner length
        assert_eq!(&buf[4..7], b"xyz");
        assert_eq!(buf[7], 0xBB);
    }

    #[test]
    fn fixed_writer_overflows() {
        let mut backing = [0u8; 2];
        let mut fw = FixedWriter::new(&mut backing);
        fw.put_bytes(&[1, 2]).unwrap();
        assert_eq!(fw.put_bytes(&[3]), Err(crate::WireError::Overflow));
    }
}
