//! `spec.md` §6.1: `BlockCipher::encrypt(plaintext[16], ciphertext[16], key)`,
//! "must be constant-time in the key". The `aes` crate's software
//! implementation is constant-time by construction (no table lookups keyed
//! by secret data); on targets with AES-NI it additionally promotes to the
//! hardware path, which RustCrypto selects automatically.

use aes::cipher::{BlockDecrypt as _, BlockEncrypt as _, KeyInit};
use aes::{Aes128, Aes256};
use generic_array::GenericArray;
use zeroize::Zeroize;

/// A single-block encryption callback, the only capability the `gcm` crate
/// needs from a key schedule. Implementors own their expanded round keys;
/// `encrypt` never allocates and never branches on secret data.
pub trait BlockCipher {
    fn encrypt(&self, plaintext: &[u8; 16], ciphertext: &mut [u8; 16]);
}

/// Reference AES-128 block cipher, keyed once at construction.
pub struct Aes128Cipher {
    inner: Aes128,
    key: [u8; 16],
}

impl Aes128Cipher {
    pub fn new(key: [u8; 16]) -> Self {
        Aes128Cipher { inner: Aes128::new(GenericArray::from_slice(&key)), key }
    }

    /// Block decryption, needed by the `ticket` crate's AES-128-CBC mode
    /// (`spec.md` §4.5 step 4) but not by the GCM record primitive, which
    /// only ever runs AES in the forward/counter direction. Kept as an
    /// inherent method rather than on `BlockCipher` since `spec.md` §6.1
    /// only names an `encrypt` callback for that trait.
    pub fn decrypt(&self, ciphertext: &[u8; 16], plaintext: &mut [u8; 16]) {
        let mut block = *GenericArray::from_slice(ciphertext);
        self.inner.decrypt_block(&mut block);
        plaintext.copy_from_slice(block.as_slice());
    }
}

impl BlockCipher for Aes128Cipher {
    fn encrypt(&self, plaintext: &[u8; 16], ciphertext: &mut [u8; 16]) {
        let mut block = *GenericArray::from_slice(plaintext);
        self.inner.encrypt_block(&mut block);
        ciphertext.copy_from_slice(block.as_slice());
    }
}

impl Drop for Aes128Cipher {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

/// Reference AES-256 block cipher, used for the GCM suites that negotiate
/// a 256-bit key (e.g. TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384).
pub struct Aes256Cipher {
    inner: Aes256,
    key: [u8; 32],
}

impl Aes256Cipher {
    pub fn new(key: [u8; 32]) -> Self {
        Aes256Cipher { inner: Aes256::new(GenericArray::from_slice(&key)), key }
    }
}

impl BlockCipher for Aes256Cipher {
    fn encrypt(&self, plaintext: &[u8; 16], ciphertext: &mut [u8; 16]) {
        let mut block = *GenericArray::from_slice(plaintext);
        self.inner.encrypt_block(&mut block);
        ciphertext.copy_from_slice(block.as_slice());
    }
}

impl Drop for Aes256Cipher {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // FIPS-197 Appendix B.
    #[test]
    fn aes128_known_answer() {
        let key: [u8; 16] = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap().try_into().unwrap();
        let pt: [u8; 16] = hex::decode("00112233445566778899aabbccddeeff").unwrap().try_into().unwrap();
        let expected: [u8; 16] = hex::decode("69c4e0d86a7b0430d8cdb78070b4c55a").unwrap().try_into().unwrap();

        let cipher = Aes128Cipher::new(key);
        let mut out = [0u8; 16];
        cipher.encrypt(&pt, &mut out);
        assert_eq!(out, expected);
    }

    #[test]
    fn aes128_decrypt_inverts_encrypt() {
        let cipher = Aes128Cipher::new([0x5au8; 16]);
        let pt = [0x11u8; 16];
        let mut ct = [0u8; 16];
        cipher.encrypt(&pt, &mut ct);
        let mut back = [0u8; 16];
        cipher.decrypt(&ct, &mut back);
        assert_eq!(back, pt);
    }
}
