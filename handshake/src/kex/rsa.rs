//! `spec.md` §4.4 "RSA" key exchange: constant-time PKCS#1 v1.5 unpadding
//! and substitution, guarding against the Bleichenbacher and
//! Klima-Pokorny-Rosa oracles. `primitives::RsaPrivateKey::raw_decrypt`
//! does only `c^d mod n`; everything below is protocol logic this crate
//! owns rather than a primitive (`spec.md` §4.4 "RSA").

use primitives::{ctutil, Rng, RsaPrivateKey};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use tls_types::ProtocolVersion;

use crate::error::Result;

pub const PREMASTER_LEN: usize = 48;

/// Decrypts `ciphertext` (the `EncryptedPreMasterSecret`), returning a
/// 48-byte premaster secret that is *always* well-formed: on any padding,
/// length, or version mismatch the returned bytes are a freshly generated
/// random buffer rather than an error, per `spec.md` §4.4's anti-oracle
/// design — "generate a 48-byte random rand_pms unconditionally ... for
/// every premaster byte substitute from rand_pms if the mask is zero."
/// `accepted_versions` lets the caller also accept the negotiated version
/// alongside the client-advertised one (`SSL_OP_TLS_ROLLBACK_BUG`-style
/// compatibility, `spec.md` §4.4 "If ... also accept the negotiated
/// version").
pub fn decrypt_premaster(
    key: &RsaPrivateKey,
    accepted_versions: &[ProtocolVersion],
    ciphertext: &[u8],
    rng: &mut dyn Rng,
) -> Result<[u8; PREMASTER_LEN]> {
    let mut rand_pms = [0u8; PREMASTER_LEN];
    rng.fill(&mut rand_pms)?;

    let em = key.raw_decrypt(ciphertext);
    let modulus_len = em.len();

    // PKCS#1 v1.5 block: 00 02 <nonzero padding, >= 8 bytes> 00 <message>.
    let mut good = Choice::from((modulus_len >= 11) as u8);
    good &= em.first().copied().unwrap_or(1).ct_eq(&0u8);
    good &= em.get(1).copied().unwrap_or(0).ct_eq(&2u8);

    // Walk the whole buffer once, locating the first zero separator byte
    // at or after offset 2 without branching on *where* it is: every
    // iteration updates `msg_start` under a mask, so the instructions
    // executed are identical regardless of whether (or where) the
    // separator appears.
    let mut found = Choice::from(0u8);
    let mut msg_start: u32 = 0;
    for i in 2..modulus_len {
        let is_zero = em[i].ct_eq(&0u8);
        let take_this_one = is_zero & !found;
        msg_start = u32::conditional_select(&msg_start, &(i as u32 + 1), take_this_one);
        found |= is_zero;
    }
    good &= found;

    let msg_len = modulus_len as u32 - msg_start;
    good &= Choice::from((msg_len == PREMASTER_LEN as u32) as u8);

    // Always read the fixed trailing 48 bytes rather than a
    // variable-offset slice keyed by `msg_start`, which would itself leak
    // the separator position through the memory access pattern.
    let mut candidate = [0u8; PREMASTER_LEN];
    candidate.copy_from_slice(&em[modulus_len - PREMASTER_LEN..]);

    let mut version_ok = Choice::from(0u8);
    for version in accepted_versions {
        let want = version.wire().to_be_bytes();
        version_ok |= candidate[0].ct_eq(&want[0]) & candidate[1].ct_eq(&want[1]);
    }
    good &= version_ok;

    let mut out = [0u8; PREMASTER_LEN];
    for i in 0..PREMASTER_LEN {
        out[i] = ctutil::ct_select(good, candidate[i], rand_pms[i]);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint_dig::BigUint;

    // A real 512-bit RSA key, large enough to carry a full PKCS#1 v1.5
    // block around a 48-byte message.
    fn toy_key() -> (RsaPrivateKey, Vec<u8>, Vec<u8>) {
        let n = hex::decode(
            "975a26ae08c19270c144cc4cc9d9b92d682259605c21455ce871c51f9c164fc\
             2c64dedc4d3f56dedb034192323b38a829fdfb322373821f7474551c59f672c\
             db",
        )
        .unwrap();
        let e = hex::decode("010001").unwrap();
        let d = hex::decode(
            "80a8eb1ea064e4f6a2e4b80342c7a969d70ef4093ce82f8da62f2892115eca1\
             788c9b4f7055bb1f1591b5842bea0171f6e5826f0197a4ca0715310b280fe1f\
             41",
        )
        .unwrap();
        (RsaPrivateKey::new(&n, &d), n, e)
    }

    fn pkcs1v15_encode(modulus_len: usize, message: &[u8]) -> Vec<u8> {
        let mut em = vec![0u8; modulus_len];
        em[1] = 2;
        let ps_len = modulus_len - 3 - message.len();
        for (i, b) in em[2..2 + ps_len].iter_mut().enumerate() {
            *b = (i as u8 % 255) + 1; // nonzero padding
        }
        em[2 + ps_len] = 0;
        em[3 + ps_len..].copy_from_slice(message);
        em
    }

    fn toy_encrypt(n_bytes: &[u8], e_bytes: &[u8], em: &[u8]) -> Vec<u8> {
        let n = BigUint::from_bytes_be(n_bytes);
        let e = BigUint::from_bytes_be(e_bytes);
        let m = BigUint::from_bytes_be(em);
        m.modpow(&e, &n).to_bytes_be()
    }

    struct FixedRng(u8);
    impl Rng for FixedRng {
        fn fill(&mut self, out: &mut [u8]) -> std::result::Result<(), primitives::RngError> {
            out.fill(self.0);
            Ok(())
        }
    }

    #[test]
    fn well_formed_premaster_is_recovered() {
        let (key, n, e) = toy_key();
        let mut message = [0u8; 48];
        message[0] = 0x03;
        message[1] = 0x03;
        message[2..].fill(0x42);

        let em = pkcs1v15_encode(n.len(), &message);
        let ct = toy_encrypt(&n, &e, &em);

        let mut rng = FixedRng(0xFF);
        let out = decrypt_premaster(&key, &[ProtocolVersion::TLS1_2], &ct, &mut rng).unwrap();
        assert_eq!(out, message);
    }

    #[test]
    fn malformed_ciphertext_yields_synthetic_premaster() {
        let (key, n, _e) = toy_key();
        let garbage = vec![0xAAu8; n.len()];

        let mut rng = FixedRng(0x11);
        let out = decrypt_premaster(&key, &[ProtocolVersion::TLS1_2], &garbage, &mut rng).unwrap();
        assert_eq!(out, [0x11u8; 48]);
    }

    #[test]
    fn wrong_client_version_yields_synthetic_premaster() {
        let (key, n, e) = toy_key();
        let mut message = [0u8; 48];
        message[0] = 0x03;
        message[1] = 0x01; // TLS 1.0, but caller expects 1.2 below
        message[2..].fill(0x99);

        let em = pkcs1v15_encode(n.len(), &message);
        let ct = toy_encrypt(&n, &e, &em);

        let mut rng = FixedRng(0x22);
        let out = decrypt_premaster(&key, &[ProtocolVersion::TLS1_2], &ct, &mut rng).unwrap();
        assert_eq!(out, [0x22u8; 48]);
    }
}
