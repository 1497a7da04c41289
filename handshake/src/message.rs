//! `spec.md` §6.2: "Handshake message: 1-byte msg_type, 3-byte length,
//! body; DTLS additionally carries message_seq (u16), fragment_offset
//! (u24), fragment_length (u24)." This engine never fragments a DTLS
//! handshake message across multiple records (`spec.md` §9 Open Question
//! on DTLS scope, resolved in DESIGN.md): every DTLS message is sent and
//! expected as a single fragment spanning the whole body.

use tls_types::HandshakeType;
use wire::{Reader, Writer};

use crate::error::{HandshakeError, Result};

/// One parsed handshake message: its type and body, with the outer
/// length/fragment framing already stripped.
pub struct HandshakeMessage {
    pub msg_type: HandshakeType,
    pub body: Vec<u8>,
    /// DTLS only: `message_seq`, used to detect retransmits/reordering.
    pub message_seq: Option<u16>,
}

/// Writes one handshake message (type ‖ length ‖ body, plus DTLS framing
/// if `message_seq` is `Some`) and returns the full wire bytes, which the
/// caller both sends and appends to the transcript.
pub fn write_handshake_message(msg_type: HandshakeType, body: &[u8], message_seq: Option<u16>) -> Vec<u8> {
    let mut w = Writer::new();
    w.put_u8(msg_type.wire());
    w.put_u24(body.len() as u32);
    if let Some(seq) = message_seq {
        w.put_u16(seq);
        w.put_u24(0); // fragment_offset
        w.put_u24(body.len() as u32); // fragment_length
    }
    w.put_bytes(body);
    w.finish()
}

/// Parses one handshake message from `buf` (a full record's plaintext
/// fragment, possibly containing more than one message back to back in
/// TLS; DTLS carries exactly one message per record in this engine).
/// Returns the message and the number of bytes consumed.
pub fn read_handshake_message(buf: &[u8], is_dtls: bool) -> Result<(HandshakeMessage, usize)> {
    let mut r = Reader::new(buf);
    let msg_type =
        HandshakeType::from_wire(r.read_u8()?).ok_or(HandshakeError::Decode("unknown handshake message type"))?;

    let message_seq = if is_dtls {
        let length = r.read_u24()? as usize;
        let seq = r.read_u16()?;
        let fragment_offset = r.read_u24()? as usize;
        let fragment_length = r.read_u24()? as usize;
        if fragment_offset != 0 || fragment_length != length {
            return Err(HandshakeError::Decode("dtls handshake message is fragmented; this engine expects a single fragment"));
        }
        let body = r.read_bytes(fragment_length)?.to_vec();
        let consumed = buf.len() - r.remaining();
        return Ok((HandshakeMessage { msg_type, body, message_seq: Some(seq) }, consumed));
    } else {
        None
    };

    let body = r.read_u24_prefixed_bytes()?.to_vec();
    let consumed = buf.len() - r.remaining();
    Ok((HandshakeMessage { msg_type, body, message_seq }, consumed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tls_message_round_trips() {
        let body = b"client hello body bytes";
        let wire = write_handshake_message(HandshakeType::ClientHello, body, None);
        let (msg, consumed) = read_handshake_message(&wire, false).unwrap();
        assert_eq!(msg.msg_type, HandshakeType::ClientHello);
        assert_eq!(msg.body, body);
        assert_eq!(consumed, wire.len());
        assert!(msg.message_seq.is_none());
    }

    #[test]
    fn dtls_message_round_trips_with_sequence() {
        let body = b"dtls client hello";
        let wire = write_handshake_message(HandshakeType::ClientHello, body, Some(7));
        let (msg, consumed) = read_handshake_message(&wire, true).unwrap();
        assert_eq!(msg.message_seq, Some(7));
        assert_eq!(msg.body, body);
        assert_eq!(consumed, wire.len());
    }
}
