//! RFC 5246 §5 "HMAC and the Pseudorandom Function". HMAC itself is
//! explicitly listed as an external collaborator (`spec.md` §1), so this
//! module reaches for the `hmac` crate directly the same way the
//! `ticket` crate does for its HMAC-SHA-256 tag, rather than layering a
//! hand-rolled HMAC over `primitives::HashCtx`.

use hmac::{Hmac, Mac};
use md5::Md5;
use sha1::Sha1;
use sha2::{Sha256, Sha384};

use primitives::HashAlgorithm;

/// Dispatches one HMAC call to the concrete digest `alg` names. Kept as a
/// small enum match rather than a generic over the four digest types so
/// callers can select the hash at runtime (the PRF hash comes from the
/// negotiated cipher suite).
fn hmac_dispatch(alg: HashAlgorithm, key: &[u8], data: &[u8]) -> Vec<u8> {
    match alg {
        HashAlgorithm::Md5 => {
            let mut mac = Hmac::<Md5>::new_from_slice(key).expect("hmac accepts any key length");
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        HashAlgorithm::Sha1 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(key).expect("hmac accepts any key length");
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        HashAlgorithm::Sha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("hmac accepts any key length");
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        HashAlgorithm::Sha384 => {
            let mut mac = Hmac::<Sha384>::new_from_slice(key).expect("hmac accepts any key length");
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        HashAlgorithm::Sha512 => unreachable!("no cipher suite in this workspace negotiates a SHA-512 PRF"),
    }
}

/// RFC 5246 §5: `P_hash(secret, seed) = HMAC_hash(secret, A(1) ++ seed)
/// ++ HMAC_hash(secret, A(2) ++ seed) ++ ...`, `A(0) = seed`, `A(i) =
/// HMAC_hash(secret, A(i-1))`.
fn p_hash(alg: HashAlgorithm, secret: &[u8], seed: &[u8], out_len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(out_len);
    let mut a = seed.to_vec();
    while out.len() < out_len {
        a = hmac_dispatch(alg, secret, &a);
        let mut input = a.clone();
        input.extend_from_slice(seed);
        out.extend(hmac_dispatch(alg, secret, &input));
    }
    out.truncate(out_len);
    out
}

/// TLS 1.2 PRF (RFC 5246 §5): `PRF(secret, label, seed) = P_<hash>(secret,
/// label ++ seed)`, hash selected by the negotiated cipher suite's
/// `prf_hash` field (`spec.md` §3.3).
pub fn prf_tls12(hash: HashAlgorithm, secret: &[u8], label: &[u8], seed: &[u8], out_len: usize) -> Vec<u8> {
    let mut full_seed = Vec::with_capacity(label.len() + seed.len());
    full_seed.extend_from_slice(label);
    full_seed.extend_from_slice(seed);
    p_hash(hash, secret, &full_seed, out_len)
}

/// Pre-1.2 PRF (RFC 2246 §5 / RFC 4346 §5): `PRF(secret, label, seed) =
/// P_MD5(S1, label ++ seed) XOR P_SHA-1(S2, label ++ seed)`, where `S1`
/// and `S2` are the first/last `ceil(len/2)` bytes of `secret`
/// (overlapping by one byte when `len` is odd).
pub fn prf_legacy(secret: &[u8], label: &[u8], seed: &[u8], out_len: usize) -> Vec<u8> {
    let half = secret.len().div_ceil(2);
    let s1 = &secret[..half];
    let s2 = &secret[secret.len() - half..];

    let mut full_seed = Vec::with_capacity(label.len() + seed.len());
    full_seed.extend_from_slice(label);
    full_seed.extend_from_slice(seed);

    let md5_stream = p_hash(HashAlgorithm::Md5, s1, &full_seed, out_len);
    let sha1_stream = p_hash(HashAlgorithm::Sha1, s2, &full_seed, out_len);

    md5_stream.iter().zip(sha1_stream.iter()).map(|(a, b)| a ^ b).collect()
}

/// Dispatches to the legacy or TLS 1.2 PRF depending on the negotiated
/// protocol version, per `spec.md` §4.4 "Finished": both PRFs compute the
/// same logical value, just with a different hash construction.
pub fn prf(is_tls12: bool, hash: HashAlgorithm, secret: &[u8], label: &[u8], seed: &[u8], out_len: usize) -> Vec<u8> {
    if is_tls12 {
        prf_tls12(hash, secret, label, seed, out_len)
    } else {
        prf_legacy(secret, label, seed, out_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tls12_prf_is_deterministic_and_matches_length() {
        let secret = b"master secret bytes go here 1234";
        let out = prf_tls12(HashAlgorithm::Sha256, secret, b"key expansion", b"seedseed", 40);
        assert_eq!(out.len(), 40);
        let out2 = prf_tls12(HashAlgorithm::Sha256, secret, b"key expansion", b"seedseed", 40);
        assert_eq!(out, out2);
    }

    #[test]
    fn legacy_prf_xors_two_independent_streams() {
        let secret = b"0123456789abcdef";
        let out = prf_legacy(secret, b"client finished", b"transcript", 12);
        assert_eq!(out.len(), 12);
        // Changing either half of the secret must change the output.
        let mut tampered = secret.to_vec();
        tampered[0] ^= 0xff;
        let out2 = prf_legacy(&tampered, b"client finished", b"transcript", 12);
        assert_ne!(out, out2);
    }

    #[test]
    fn different_labels_produce_different_output() {
        let secret = b"master secret bytes go here 1234";
        let a = prf_tls12(HashAlgorithm::Sha256, secret, b"client finished", b"seed", 12);
        let b = prf_tls12(HashAlgorithm::Sha256, secret, b"server finished", b"seed", 12);
        assert_ne!(a, b);
    }
}
