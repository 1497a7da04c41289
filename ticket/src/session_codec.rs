//! Serializes the subset of `tls_types::Session` that `spec.md` §4.5 step
//! 1 names ("including master_secret, cipher, version, SNI, timeout") to
//! and from the plaintext blob that gets AES-CBC encrypted inside a
//! ticket.

use tls_types::{CipherSuite, ProtocolVersion, Session, VerifyResult};
use wire::{Reader, Writer};

use crate::error::{Result, TicketError};

pub fn serialize(session: &Session) -> Vec<u8> {
    let mut w = Writer::new();
    w.put_bytes(&session.master_secret);
    w.put_u16(session.cipher_suite.id);
    w.put_u16(session.protocol_version.wire());
    w.put_u32(session.not_after as u32);
    match &session.server_name {
        Some(name) => {
            w.begin_u8().put_bytes(name.as_bytes());
        }
        None => {
            w.put_u8(0);
        }
    }
    w.finish()
}

/// Rebuilds a `Session`. `spec.md` §4.5 step 2: "Zero the embedded
/// session_id so the decrypted session won't collide with cache keys" —
/// the caller is responsible for substituting the ClientHello's offered
/// session_id afterward (step 4's "substitute... for resumption
/// detection"), so this always yields an empty `session_id`.
pub fn deserialize(body: &[u8]) -> Result<Session> {
    let mut r = Reader::new(body);
    let master_secret_bytes = r.read_bytes(48).map_err(|_| TicketError::Malformed)?;
    let mut master_secret = [0u8; 48];
    master_secret.copy_from_slice(master_secret_bytes);

    let cipher_id = r.read_u16().map_err(|_| TicketError::Malformed)?;
    let cipher_suite = CipherSuite::by_id(cipher_id).ok_or(TicketError::Malformed)?;

    let version = ProtocolVersion::from_wire(r.read_u16().map_err(|_| TicketError::Malformed)?);
    let not_after = r.read_u32().map_err(|_| TicketError::Malformed)? as u64;

    let name_bytes = r.read_u8_prefixed_bytes().map_err(|_| TicketError::Malformed)?;
    let server_name = if name_bytes.is_empty() {
        None
    } else {
        Some(std::str::from_utf8(name_bytes).map_err(|_| TicketError::Malformed)?.to_string())
    };
    r.assert_exhausted().map_err(|_| TicketError::Malformed)?;

    Ok(Session {
        session_id: Vec::new(),
        master_secret,
        cipher_suite,
        protocol_version: version,
        peer_certificate: None,
        verify_result: VerifyResult::NotRequested,
        not_after,
        server_name,
        ec_point_format: None,
        ticket: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_session_fields() {
        let suite = CipherSuite::by_id(0xC02F).unwrap();
        let session = Session {
            session_id: vec![9, 9, 9],
            master_secret: [5u8; 48],
            cipher_suite: suite,
            protocol_version: ProtocolVersion::TLS1_2,
            peer_certificate: None,
            verify_result: VerifyResult::Verified,
            not_after: 123456,
            server_name: Some("example.org".to_string()),
            ec_point_format: None,
            ticket: None,
        };
        let blob = serialize(&session);
        let restored = deserialize(&blob).unwrap();
        assert_eq!(restored.master_secret, session.master_secret);
        assert_eq!(restored.cipher_suite.id, session.cipher_suite.id);
        assert_eq!(restored.not_after, session.not_after);
        assert_eq!(restored.server_name, session.server_name);
        assert!(restored.session_id.is_empty());
    }
}
