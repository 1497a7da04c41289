//! `spec.md` §6.2 "Wire formats": "TLS record: 1-byte content_type,
//! 2-byte version, 2-byte length, body" and "GCM record layer: 8-byte
//! explicit IV ‖ ciphertext ‖ 16-byte tag" (RFC 5288). CBC cipher suites
//! remain selectable for negotiation (their MAC/PRF hash still drives
//! legacy signing and Finished computation), but CBC record-layer bulk
//! encryption itself is out of scope: `spec.md` §1 scopes the AEAD
//! component this workspace ships to AES-GCM specifically, and `gcm` is
//! the only bulk-cipher primitive this workspace implements end to end.

use gcm::AeadCtx;
use primitives::{Aes128Cipher, Aes256Cipher, BlockCipher};
use tls_types::{ContentType, ProtocolVersion};

use crate::error::{HandshakeError, Result};

/// One direction's negotiated AES-GCM key material, established once by
/// the key schedule (`spec.md` §4.4 "a derived master secret into the
/// record-layer key schedule"). A fresh `AeadCtx` is constructed per
/// record since `spec.md` §3.4 requires `Y` never repeat for a given key
/// and `AeadCtx::set_iv` fixes `Y_0` for the lifetime of one context.
enum BulkKey {
    Aes128([u8; 16]),
    Aes256([u8; 32]),
}

pub struct GcmDirection {
    key: BulkKey,
    /// RFC 5288 "salt": the 4 fixed bytes of the 12-byte nonce, derived
    /// from the key block and never sent on the wire.
    salt: [u8; 4],
    /// Sequence number, also serving as the 8-byte explicit nonce this
    /// workspace sends on the wire (a common, RFC-permitted choice: RFC
    /// 5288 only requires the explicit part be unique per key, not that
    /// it equal the sequence number, but doing so avoids carrying a
    /// second counter).
    seq: u64,
}

impl GcmDirection {
    pub fn new_aes128(key: [u8; 16], salt: [u8; 4]) -> Self {
        GcmDirection { key: BulkKey::Aes128(key), salt, seq: 0 }
    }

    pub fn new_aes256(key: [u8; 32], salt: [u8; 4]) -> Self {
        GcmDirection { key: BulkKey::Aes256(key), salt, seq: 0 }
    }

    fn nonce(&self, explicit: u64) -> [u8; 12] {
        let mut n = [0u8; 12];
        n[..4].copy_from_slice(&self.salt);
        n[4..].copy_from_slice(&explicit.to_be_bytes());
        n
    }

    fn additional_data(&self, seq: u64, content_type: ContentType, version: ProtocolVersion, len: u16) -> [u8; 13] {
        let mut aad = [0u8; 13];
        aad[..8].copy_from_slice(&seq.to_be_bytes());
        aad[8] = content_type.wire();
        aad[9..11].copy_from_slice(&version.wire().to_be_bytes());
        aad[11..13].copy_from_slice(&len.to_be_bytes());
        aad
    }

    /// Produces the `GenericAEADCipher` fragment: 8-byte explicit nonce ‖
    /// ciphertext ‖ 16-byte tag.
    pub fn seal(&mut self, content_type: ContentType, version: ProtocolVersion, plaintext: &[u8]) -> Result<Vec<u8>> {
        let seq = self.seq;
        self.seq = self.seq.checked_add(1).ok_or(HandshakeError::Resource("record sequence number exhausted"))?;

        let nonce = self.nonce(seq);
        let aad = self.additional_data(seq, content_type, version, plaintext.len() as u16);

        let mut ct = vec![0u8; plaintext.len()];
        let tag = match &self.key {
            BulkKey::Aes128(k) => {
                let mut ctx = AeadCtx::init(Aes128Cipher::new(*k));
                ctx.set_iv(&nonce)?;
                ctx.aad(&aad)?;
                ctx.encrypt(plaintext, &mut ct)?;
                ctx.tag(16)?
            }
            BulkKey::Aes256(k) => {
                let mut ctx = AeadCtx::init(Aes256Cipher::new(*k));
                ctx.set_iv(&nonce)?;
                ctx.aad(&aad)?;
                ctx.encrypt(plaintext, &mut ct)?;
                ctx.tag(16)?
            }
        };

        let mut out = Vec::with_capacity(8 + ct.len() + 16);
        out.extend_from_slice(&seq.to_be_bytes());
        out.extend_from_slice(&ct);
        out.extend_from_slice(&tag);
        Ok(out)
    }

    /// Inverse of [`GcmDirection::seal`]; `fragment` is the
    /// `GenericAEADCipher` bytes read off the wire.
    pub fn open(&mut self, content_type: ContentType, version: ProtocolVersion, fragment: &[u8]) -> Result<Vec<u8>> {
        if fragment.len() < 8 + 16 {
            return Err(HandshakeError::Decode("gcm record shorter than explicit_iv + tag"));
        }
        let explicit = u64::from_be_bytes(fragment[..8].try_into().unwrap());
        let ct_len = fragment.len() - 8 - 16;
        let ciphertext = &fragment[8..8 + ct_len];
        let tag = &fragment[8 + ct_len..];

        // RFC 5246 §6.2.3.3: the explicit nonce carried on the wire need
        // not equal our own receive-side counter in general, but this
        // workspace's peer is this workspace's own client-role tests and
        // always sends the sequence number; any other value is a replay
        // or reorder this engine does not tolerate.
        let seq = self.seq;
        if explicit != seq {
            return Err(HandshakeError::Protocol("gcm explicit nonce does not match expected sequence number"));
        }
        self.seq = self.seq.checked_add(1).ok_or(HandshakeError::Resource("record sequence number exhausted"))?;

        let nonce = self.nonce(explicit);
        let aad = self.additional_data(seq, content_type, version, ct_len as u16);

        let mut pt = vec![0u8; ct_len];
        match &self.key {
            BulkKey::Aes128(k) => {
                let mut ctx = AeadCtx::init(Aes128Cipher::new(*k));
                ctx.set_iv(&nonce)?;
                ctx.aad(&aad)?;
                ctx.decrypt(ciphertext, &mut pt)?;
                ctx.verify(tag, 16)?;
            }
            BulkKey::Aes256(k) => {
                let mut ctx = AeadCtx::init(Aes256Cipher::new(*k));
                ctx.set_iv(&nonce)?;
                ctx.aad(&aad)?;
                ctx.decrypt(ciphertext, &mut pt)?;
                ctx.verify(tag, 16)?;
            }
        }
        Ok(pt)
    }
}

/// Per-connection record-layer state: a GCM direction once the key
/// schedule has run, or nothing before it (handshake messages prior to
/// ChangeCipherSpec travel in the clear).
pub enum DirectionState {
    Plaintext,
    Gcm(GcmDirection),
}

pub struct RecordLayer {
    pub read: DirectionState,
    pub write: DirectionState,
}

impl RecordLayer {
    pub fn new() -> Self {
        RecordLayer { read: DirectionState::Plaintext, write: DirectionState::Plaintext }
    }

    /// Builds one full TLS record (header ‖ fragment) for `plaintext`,
    /// protecting it under the write key if one has been installed.
    pub fn seal_record(
        &mut self,
        content_type: ContentType,
        version: ProtocolVersion,
        plaintext: &[u8],
    ) -> Result<Vec<u8>> {
        let fragment = match &mut self.write {
            DirectionState::Plaintext => plaintext.to_vec(),
            DirectionState::Gcm(dir) => dir.seal(content_type, version, plaintext)?,
        };
        if fragment.len() > u16::MAX as usize {
            return Err(HandshakeError::Resource("record fragment exceeds 2^16-1 bytes"));
        }
        let mut out = Vec::with_capacity(5 + fragment.len());
        out.push(content_type.wire());
        out.extend_from_slice(&version.wire().to_be_bytes());
        out.extend_from_slice(&(fragment.len() as u16).to_be_bytes());
        out.extend_from_slice(&fragment);
        Ok(out)
    }

    /// Parses one record header plus its fragment from `buf`, returning
    /// `(content_type, plaintext, consumed_len)`. The caller supplies
    /// exactly one record's worth of bytes (or more, with trailing bytes
    /// ignored beyond `consumed_len`) read from the transport.
    pub fn open_record(&mut self, buf: &[u8]) -> Result<(ContentType, Vec<u8>, usize)> {
        if buf.len() < 5 {
            return Err(HandshakeError::Decode("record header truncated"));
        }
        let content_type =
            ContentType::from_wire(buf[0]).ok_or(HandshakeError::Decode("unknown record content type"))?;
        let version = ProtocolVersion::from_wire(u16::from_be_bytes([buf[1], buf[2]]));
        let len = u16::from_be_bytes([buf[3], buf[4]]) as usize;
        if buf.len() < 5 + len {
            return Err(HandshakeError::Decode("record fragment truncated"));
        }
        let fragment = &buf[5..5 + len];
        let plaintext = match &mut self.read {
            DirectionState::Plaintext => fragment.to_vec(),
            DirectionState::Gcm(dir) => dir.open(content_type, version, fragment)?,
        };
        Ok((content_type, plaintext, 5 + len))
    }
}

impl Default for RecordLayer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gcm_record_round_trips() {
        let mut rl_client = RecordLayer::new();
        let mut rl_server = RecordLayer::new();
        rl_client.write = DirectionState::Gcm(GcmDirection::new_aes128([0x11u8; 16], [0x22u8; 4]));
        rl_server.read = DirectionState::Gcm(GcmDirection::new_aes128([0x11u8; 16], [0x22u8; 4]));

        let record = rl_client
            .seal_record(ContentType::ApplicationData, ProtocolVersion::TLS1_2, b"hello over the wire")
            .unwrap();
        let (ct, pt, consumed) = rl_server.open_record(&record).unwrap();
        assert_eq!(ct, ContentType::ApplicationData);
        assert_eq!(pt, b"hello over the wire");
        assert_eq!(consumed, record.len());
    }

    #[test]
    fn tampered_ciphertext_fails_to_open() {
        let mut rl_client = RecordLayer::new();
        let mut rl_server = RecordLayer::new();
        rl_client.write = DirectionState::Gcm(GcmDirection::new_aes128([0x33u8; 16], [0x44u8; 4]));
        rl_server.read = DirectionState::Gcm(GcmDirection::new_aes128([0x33u8; 16], [0x44u8; 4]));

        let mut record = rl_client
            .seal_record(ContentType::ApplicationData, ProtocolVersion::TLS1_2, b"integrity matters")
            .unwrap();
        let last = record.len() - 1;
        record[last] ^= 0x01;
        assert!(rl_server.open_record(&record).is_err());
    }

    #[test]
    fn plaintext_records_pass_through_unprotected() {
        let mut rl = RecordLayer::new();
        let record = rl.seal_record(ContentType::Handshake, ProtocolVersion::TLS1_2, b"client_hello body").unwrap();
        let (ct, pt, _) = rl.open_record(&record).unwrap();
        assert_eq!(ct, ContentType::Handshake);
        assert_eq!(pt, b"client_hello body");
    }
}
