//! Minimal AES-128-CBC with PKCS#7 padding, built directly on the
//! workspace's `primitives::BlockCipher` trait (one block in, one block
//! out) rather than pulling in a second cipher-mode crate — the ticket
//! subsystem is the only consumer of CBC in this workspace and the mode
//! itself is a dozen lines once a block primitive exists.

use primitives::{Aes128Cipher, BlockCipher};

use crate::error::{Result, TicketError};

const BLOCK: usize = 16;

pub fn encrypt(key: &[u8; 16], iv: &[u8; 16], plaintext: &[u8]) -> Vec<u8> {
    let cipher = Aes128Cipher::new(key);
    let pad_len = BLOCK - (plaintext.len() % BLOCK);
    let mut padded = Vec::with_capacity(plaintext.len() + pad_len);
    padded.extend_from_slice(plaintext);
    padded.extend(std::iter::repeat(pad_len as u8).take(pad_len));

    let mut out = Vec::with_capacity(padded.len());
    let mut prev = *iv;
    for block in padded.chunks_exact(BLOCK) {
        let mut xored = [0u8; BLOCK];
        for i in 0..BLOCK {
            xored[i] = block[i] ^ prev[i];
        }
        let mut ct = [0u8; BLOCK];
        cipher.encrypt(&xored, &mut ct);
        out.extend_from_slice(&ct);
        prev = ct;
    }
    out
}

pub fn decrypt(key: &[u8; 16], iv: &[u8; 16], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK != 0 {
        return Err(TicketError::Malformed);
    }
    let cipher = Aes128Cipher::new(key);
    let mut out = Vec::with_capacity(ciphertext.len());
    let mut prev = *iv;
    for block in ciphertext.chunks_exact(BLOCK) {
        let mut pt = [0u8; BLOCK];
        let mut block_arr = [0u8; BLOCK];
        block_arr.copy_from_slice(block);
        cipher.decrypt(&block_arr, &mut pt);
        for i in 0..BLOCK {
            pt[i] ^= prev[i];
        }
        out.extend_from_slice(&pt);
        prev = block_arr;
    }

    let pad_len = *out.last().ok_or(TicketError::Malformed)? as usize;
    if pad_len == 0 || pad_len > BLOCK || pad_len > out.len() {
        return Err(TicketError::Malformed);
    }
    if out[out.len() - pad_len..].iter().any(|&b| b as usize != pad_len) {
        return Err(TicketError::Malformed);
    }
    out.truncate(out.len() - pad_len);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_arbitrary_length_plaintext() {
        let key = [0x11u8; 16];
        let iv = [0x22u8; 16];
        for len in [0usize, 1, 15, 16, 17, 48] {
            let plaintext: Vec<u8> = (0..len as u8).collect();
            let ct = encrypt(&key, &iv, &plaintext);
            let pt = decrypt(&key, &iv, &ct).unwrap();
            assert_eq!(pt, plaintext);
        }
    }

    #[test]
    fn bad_padding_is_rejected() {
        let key = [0x11u8; 16];
        let iv = [0x22u8; 16];
        let mut ct = encrypt(&key, &iv, b"hello world12345");
        *ct.last_mut().unwrap() ^= 0xff;
        assert!(decrypt(&key, &iv, &ct).is_err());
    }
}
