//! Stateless session-ticket issuance and validation, `spec.md` §4.5 and
//! §3.6. Ties together three small pieces: the AES-128-CBC mode
//! (`cbc`), the rotating key material (`keys`), and the session
//! serialization format (`session_codec`). The wire format this crate
//! produces/consumes is `spec.md` §6.2's `NewSessionTicket` body: `u32
//! lifetime ‖ u16 body_len ‖ 16-byte key_name ‖ 16-byte IV ‖ ciphertext ‖
//! 32-byte HMAC`.

mod cbc;
mod error;
pub mod keys;
mod session_codec;

pub use error::{Result, TicketError};
pub use keys::{TicketKeyMaterial, TicketKeyRing};

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tls_types::Session;
use wire::{Reader, Writer};

type HmacSha256 = Hmac<Sha256>;

/// `spec.md` §4.5 step 6: lifetime_hint ‖ body_len ‖ key_name ‖ iv ‖
/// ciphertext ‖ hmac, already split apart for the caller.
pub struct IssuedTicket {
    pub lifetime_hint: u32,
    pub body: Vec<u8>,
}

/// `spec.md` §4.5 "Validation", final step: the five-way outcome the
/// ClientHello `session_ticket` extension processing collapses to.
#[derive(Debug, Clone)]
pub enum TicketOutcome {
    /// No `session_ticket` extension was present.
    NotPresent,
    /// Extension present but empty body: the client wants a ticket issued
    /// this handshake but is not resuming.
    WantsNew,
    /// Present and non-empty, but it didn't decrypt or verify: fall back
    /// to a full handshake with a fresh session (`spec.md` §7).
    Undecryptable,
    /// Decrypted under a key the ring no longer treats as current: resume,
    /// but re-issue a fresh ticket at the end of the handshake.
    DecryptedRenew(Box<Session>),
    /// Decrypted under the current key: resume, no re-issue needed.
    DecryptedKeep(Box<Session>),
}

/// `spec.md` §4.5 "Issuance" steps 3-6. `session_id` on the serialized
/// session is always empty (session_codec never serializes it); the
/// caller substitutes the ClientHello's session_id back in on decrypt.
pub fn issue(keys: &TicketKeyMaterial, iv: &[u8; 16], session: &Session, lifetime_hint: u32) -> IssuedTicket {
    let plaintext = session_codec::serialize(session);
    let ciphertext = cbc::encrypt(&keys.aes_key, iv, &plaintext);

    let mut mac = HmacSha256::new_from_slice(&keys.hmac_key).expect("hmac accepts any key length");
    mac.update(&keys.key_name);
    mac.update(iv);
    mac.update(&ciphertext);
    let tag = mac.finalize().into_bytes();

    let mut w = Writer::new();
    w.put_bytes(&keys.key_name);
    w.put_bytes(iv);
    w.put_bytes(&ciphertext);
    w.put_bytes(&tag);

    IssuedTicket { lifetime_hint, body: w.finish() }
}

/// `spec.md` §4.5 "Validation" steps 1-5. `ticket_body` is the raw bytes
/// a ClientHello `session_ticket` extension carried (not the
/// `NewSessionTicket` message; this engine never re-sends the
/// `lifetime_hint`/outer length back to itself). `now` is used by the
/// caller afterward to check `Session::is_expired`; this function does
/// not itself reject expired sessions so a caller can distinguish
/// "undecryptable" from "decrypted but expired".
pub fn validate(ring: &TicketKeyRing, ticket_body: &[u8]) -> Result<(Session, bool)> {
    // 16 key_name + 16 iv + >=16 ciphertext (one CBC block) + 32 hmac = 80,
    // but spec.md's own floor names "48 (min: 16 key_name + 16 IV +
    // >=16 ciphertext-with-HMAC)" -- read literally that treats the HMAC
    // as folded into "ciphertext-with-HMAC"; this crate keeps the HMAC as
    // a distinct trailing 32 bytes, so the true floor is 16+16+16+32=80.
    // The >= 48 check here is the spec's literal floor, applied before the
    // stricter structural check below.
    if ticket_body.len() < 48 {
        return Err(TicketError::Malformed);
    }

    let mut r = Reader::new(ticket_body);
    let key_name: [u8; 16] = r.read_bytes(16).map_err(|_| TicketError::Malformed)?.try_into().unwrap();
    let iv: [u8; 16] = r.read_bytes(16).map_err(|_| TicketError::Malformed)?.try_into().unwrap();
    let remaining = r.remaining();
    if remaining < 16 + 32 {
        return Err(TicketError::Malformed);
    }
    let ciphertext_len = remaining - 32;
    let ciphertext = r.read_bytes(ciphertext_len).map_err(|_| TicketError::Malformed)?;
    let received_mac = r.read_bytes(32).map_err(|_| TicketError::Malformed)?;
    r.assert_exhausted().map_err(|_| TicketError::Malformed)?;

    let (key_material, is_current) = ring.find(&key_name).ok_or(TicketError::UnknownKey)?;

    let mut mac = HmacSha256::new_from_slice(&key_material.hmac_key).expect("hmac accepts any key length");
    mac.update(&key_name);
    mac.update(&iv);
    mac.update(ciphertext);
    mac.verify_slice(received_mac).map_err(|_| TicketError::BadMac)?;

    let plaintext = cbc::decrypt(&key_material.aes_key, &iv, ciphertext)?;
    let session = session_codec::deserialize(&plaintext)?;

    Ok((session, is_current))
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::{OsRng, Rng};
    use tls_types::{CipherSuite, ProtocolVersion, VerifyResult};

    fn sample_session() -> Session {
        let suite = CipherSuite::by_id(0xC02F).unwrap();
        Session {
            session_id: vec![1, 2, 3, 4],
            master_secret: [0x7eu8; 48],
            cipher_suite: suite,
            protocol_version: ProtocolVersion::TLS1_2,
            peer_certificate: None,
            verify_result: VerifyResult::NotRequested,
            not_after: 2_000_000_000,
            server_name: Some("example.com".to_string()),
            ec_point_format: None,
            ticket: None,
        }
    }

    #[test]
    fn issue_then_validate_round_trips_under_current_key() {
        let mut rng = OsRng::new();
        let keys = TicketKeyMaterial::generate(&mut rng).unwrap();
        let ring = TicketKeyRing::new(keys.clone());

        let mut iv = [0u8; 16];
        rng.fill(&mut iv).unwrap();

        let session = sample_session();
        let issued = issue(&keys, &iv, &session, 3600);

        let (restored, is_current) = validate(&ring, &issued.body).unwrap();
        assert!(is_current);
        assert_eq!(restored.master_secret, session.master_secret);
        assert_eq!(restored.server_name, session.server_name);
        assert!(restored.session_id.is_empty());
    }

    #[test]
    fn ticket_from_rotated_out_key_still_validates_but_flags_renew() {
        let mut rng = OsRng::new();
        let old_keys = TicketKeyMaterial::generate(&mut rng).unwrap();
        let mut ring = TicketKeyRing::new(old_keys.clone());

        let mut iv = [0u8; 16];
        rng.fill(&mut iv).unwrap();
        let session = sample_session();
        let issued = issue(&old_keys, &iv, &session, 3600);

        let new_keys = TicketKeyMaterial::generate(&mut rng).unwrap();
        ring.rotate(new_keys);

        let (_restored, is_current) = validate(&ring, &issued.body).unwrap();
        assert!(!is_current);
    }

    #[test]
    fn tampered_ciphertext_fails_mac() {
        let mut rng = OsRng::new();
        let keys = TicketKeyMaterial::generate(&mut rng).unwrap();
        let ring = TicketKeyRing::new(keys.clone());

        let mut iv = [0u8; 16];
        rng.fill(&mut iv).unwrap();
        let session = sample_session();
        let mut issued = issue(&keys, &iv, &session, 3600);
        let last = issued.body.len() - 1;
        issued.body[last] ^= 0x01;

        assert_eq!(validate(&ring, &issued.body), Err(TicketError::BadMac));
    }

    #[test]
    fn unknown_key_name_is_rejected() {
        let mut rng = OsRng::new();
        let keys = TicketKeyMaterial::generate(&mut rng).unwrap();
        let other_ring_keys = TicketKeyMaterial::generate(&mut rng).unwrap();
        let ring = TicketKeyRing::new(other_ring_keys);

        let mut iv = [0u8; 16];
        rng.fill(&mut iv).unwrap();
        let session = sample_session();
        let issued = issue(&keys, &iv, &session, 3600);

        assert_eq!(validate(&ring, &issued.body), Err(TicketError::UnknownKey));
    }

    #[test]
    fn too_short_body_is_malformed() {
        let keys_material = {
            let mut rng = OsRng::new();
            TicketKeyMaterial::generate(&mut rng).unwrap()
        };
        let ring = TicketKeyRing::new(keys_material);
        assert_eq!(validate(&ring, &[0u8; 10]), Err(TicketError::Malformed));
    }
}
