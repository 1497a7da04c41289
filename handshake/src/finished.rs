//! RFC 5246 §7.4.9 `Finished`: `verify_data = PRF(master_secret,
//! finished_label, Hash(handshake_messages))[0..12]`, where `Hash` is the
//! negotiated PRF hash for TLS 1.2 and the MD5‖SHA-1 concatenation for
//! earlier versions (RFC 2246 §7.4.9). Kept as a standalone module rather
//! than folded into `key_schedule` since it consumes the running
//! transcript rather than the two hellos' randoms.

use primitives::{HashAlgorithm, LegacyMd5Sha1};

use crate::key_schedule::MASTER_SECRET_LEN;
use crate::prf;

pub const VERIFY_DATA_LEN: usize = 12;
pub const CLIENT_LABEL: &[u8] = b"client finished";
pub const SERVER_LABEL: &[u8] = b"server finished";

fn transcript_hash(is_tls12: bool, prf_hash: HashAlgorithm, transcript: &[u8]) -> Vec<u8> {
    if is_tls12 {
        prf_hash.digest(transcript)
    } else {
        let mut ctx = LegacyMd5Sha1::new();
        ctx.update(transcript);
        ctx.finalize().to_vec()
    }
}

/// `label` is [`CLIENT_LABEL`] or [`SERVER_LABEL`]; `transcript` is every
/// handshake message exchanged so far, in order, with no record framing.
pub fn compute_finished(
    is_tls12: bool,
    prf_hash: HashAlgorithm,
    master_secret: &[u8; MASTER_SECRET_LEN],
    label: &[u8],
    transcript: &[u8],
) -> [u8; VERIFY_DATA_LEN] {
    let seed = transcript_hash(is_tls12, prf_hash, transcript);
    let out = prf::prf(is_tls12, prf_hash, master_secret, label, &seed, VERIFY_DATA_LEN);
    let mut verify_data = [0u8; VERIFY_DATA_LEN];
    verify_data.copy_from_slice(&out);
    verify_data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_and_server_labels_diverge() {
        let master_secret = [0x5au8; MASTER_SECRET_LEN];
        let transcript = b"client_hello..server_hello..certificate..";
        let client = compute_finished(true, HashAlgorithm::Sha256, &master_secret, CLIENT_LABEL, transcript);
        let server = compute_finished(true, HashAlgorithm::Sha256, &master_secret, SERVER_LABEL, transcript);
        assert_ne!(client, server);
    }

    #[test]
    fn changing_transcript_changes_verify_data() {
        let master_secret = [0x11u8; MASTER_SECRET_LEN];
        let a = compute_finished(true, HashAlgorithm::Sha256, &master_secret, CLIENT_LABEL, b"one transcript");
        let b = compute_finished(true, HashAlgorithm::Sha256, &master_secret, CLIENT_LABEL, b"another transcript");
        assert_ne!(a, b);
    }

    #[test]
    fn legacy_prf_path_produces_twelve_bytes() {
        let master_secret = [0x22u8; MASTER_SECRET_LEN];
        let out = compute_finished(false, HashAlgorithm::Sha256, &master_secret, CLIENT_LABEL, b"legacy transcript");
        assert_eq!(out.len(), VERIFY_DATA_LEN);
    }
}
