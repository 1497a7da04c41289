//! `spec.md` §6.1 `BigInt` modular exponentiation, specialized to the one
//! raw RSA operation the handshake engine performs itself: decrypting an
//! `EncryptedPreMasterSecret` with the server's private exponent. PKCS#1
//! v1.5 padding is explicitly out of scope (`spec.md` §1 "PKCS#1 OAEP/PSS
//! padding primitives"), so this module stops at the raw modular
//! exponentiation; the constant-time unpad-and-mask logic `spec.md` §4.4
//! "RSA" describes belongs to the handshake engine, not here, since it is
//! protocol logic rather than a primitive.

use num_bigint_dig::BigUint;

/// An RSA private key reduced to exactly what `c^d mod n` needs. No
/// Chinese Remainder Theorem optimization, no OAEP/PSS — those remain the
/// caller's (or a real RSA crate's) responsibility; this type exists so
/// the handshake engine has something to call that isn't itself a
/// hand-rolled bignum library.
pub struct RsaPrivateKey {
    n: BigUint,
    d: BigUint,
    modulus_len: usize,
}

impl RsaPrivateKey {
    pub fn new(modulus: &[u8], private_exponent: &[u8]) -> Self {
        let n = BigUint::from_bytes_be(modulus);
        RsaPrivateKey { modulus_len: n.to_bytes_be().len(), n, d: BigUint::from_bytes_be(private_exponent) }
    }

    pub fn modulus_len(&self) -> usize {
        self.modulus_len
    }

    /// Raw `c^d mod n`, left-padded with zero bytes to `modulus_len`.
    /// Callers are responsible for PKCS#1 v1.5 unpadding and for doing so
    /// without a data-dependent branch (`spec.md` §4.4 "RSA").
    pub fn raw_decrypt(&self, ciphertext: &[u8]) -> Vec<u8> {
        let c = BigUint::from_bytes_be(ciphertext);
        let m = c.modpow(&self.d, &self.n);
        let mut out = vec![0u8; self.modulus_len];
        let m_bytes = m.to_bytes_be();
        out[self.modulus_len - m_bytes.len()..].copy_from_slice(&m_bytes);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_decrypt_inverts_raw_encrypt() {
        // Toy 16-bit key: n = 3233 = 61*53, e = 17, d = 2753.
        let n = 3233u32.to_be_bytes();
        let e = 17u32;
        let d = 2753u32.to_be_bytes();
        let key = RsaPrivateKey::new(&n, &d);

        let m = BigUint::from(65u32);
        let c = m.modpow(&BigUint::from(e), &BigUint::from_bytes_be(&n));
        let recovered = key.raw_decrypt(&c.to_bytes_be());
        assert_eq!(BigUint::from_bytes_be(&recovered), m);
    }
}
