//! Cursor-based reader/writer for the TLS wire grammar: every handshake
//! message, extension, and record header is a sequence of fixed-width
//! big-endian integers and length-prefixed byte strings. This crate
//! provides the one place that enforces "never read past the end of the
//! slice" and "every length field matches the bytes actually present" so
//! the rest of the workspace never hand-rolls a bounds check.

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

use std::fmt;

/// Failure of a wire-codec operation. Every `Reader`/`Writer` method that
/// can run past the bounds of its backing slice returns this instead of
/// panicking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireError {
    /// The operation needed more bytes than remained in the cursor.
    Truncated,
    /// A length-prefixed read's declared length does not match the bytes
    /// actually available, or a caller expected a sub-cursor to be fully
    /// consumed but bytes remained.
    TrailingData,
    /// A fixed-capacity writer ran out of room.
    Overflow,
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::Truncated => write!(f, "wire: truncated message"),
            WireError::TrailingData => write!(f, "wire: unexpected trailing data"),
            WireError::Overflow => write!(f, "wire: buffer capacity exceeded"),
        }
    }
}

impl std::error::Error for WireError {}

pub type Result<T> = std::result::Result<T, WireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_round_trips_writer_output() {
        let mut w = Writer::new();
        w.put_u8(0x16);
        w.put_u16(0x0303);
        {
            let mut body = w.begin_u24();
            body.put_u8(1);
            body.put_u24(5);
            body.put_bytes(b"hello");
        }
        let buf = w.finish();

        let mut r = Reader::new(&buf);
        assert_eq!(r.read_u8().unwrap(), 0x16);
        assert_eq!(r.read_u16().unwrap(), 0x0303);
        let mut body = r.read_u24_prefixed().unwrap();
        assert_eq!(body.read_u8().unwrap(), 1);
        assert_eq!(body.read_u24().unwrap(), 5);
        assert_eq!(body.read_bytes(5).unwrap(), b"hello");
        body.assert_exhausted().unwrap();
        r.assert_exhausted().unwrap();
    }
}
