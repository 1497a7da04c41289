//! `spec.md` §4.2: the GF(2¹²⁸) GHASH multiplier and the AES-GCM
//! record-layer AEAD context built on top of it. `AeadCtx` is generic over
//! `primitives::BlockCipher`, the "block-cipher encryption callback"
//! `spec.md` §6.1 names as a consumed interface — this crate never
//! constructs key material itself.

mod ghash;

pub use ghash::{FourBitTable, GhashBackend};

use std::fmt;

use primitives::BlockCipher;
use zeroize::Zeroize;

const GHASH_CHUNK_LIMIT_MESSAGE: u64 = (1u64 << 36) - 32;
const GHASH_CHUNK_LIMIT_AAD_BITS: u64 = 1u64 << 61;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GcmError {
    /// `spec.md` §4.2 "Failure": AAD fed after encrypt/decrypt started.
    AadAfterMessage,
    /// Cumulative AAD or message length would exceed the §3.4 bounds, or
    /// a platform size counter would overflow.
    InvalidLength,
    /// `tag`/`verify` mismatch, or `verify` called with `len > 16`.
    BadTag,
    /// A prior operation on this context already failed; `spec.md` §4.2
    /// "Failure": "once any operation on a context fails, the context is
    /// considered poisoned."
    Poisoned,
}

impl fmt::Display for GcmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GcmError::AadAfterMessage => write!(f, "gcm: aad fed after message processing started"),
            GcmError::InvalidLength => write!(f, "gcm: length exceeds the aead's bound"),
            GcmError::BadTag => write!(f, "gcm: tag verification failed"),
            GcmError::Poisoned => write!(f, "gcm: context poisoned by a prior failure"),
        }
    }
}

impl std::error::Error for GcmError {}

pub type Result<T> = std::result::Result<T, GcmError>;

/// Increments the low 32 bits of a 128-bit counter block, wrapping modulo
/// 2³² as `spec.md` §3.4 requires ("the 32-bit counter field of Y is
/// incremented mod 2³² per 16-byte block").
fn increment_counter(y: &mut [u8; 16]) {
    let mut ctr = u32::from_be_bytes([y[12], y[13], y[14], y[15]]);
    ctr = ctr.wrapping_add(1);
    y[12..16].copy_from_slice(&ctr.to_be_bytes());
}

/// Per-connection AEAD context (`spec.md` §3.4). Owns the block cipher,
/// the precomputed GHASH table, the counter block, and the running GHASH
/// accumulator. One context secures exactly one direction of one
/// connection and is never shared (`spec.md` §5).
pub struct AeadCtx<C: BlockCipher> {
    cipher: C,
    backend: FourBitTable,

    /// Current counter block. Holds `Y_0` until the first keystream block
    /// is produced, at which point it is advanced to `Y_1` and thereafter
    /// always names the next counter to use.
    y: [u8; 16],
    /// `E_K(Y_0)`, cached at `set_iv` time and XORed into the final tag.
    ek0: [u8; 16],
    /// Running GHASH accumulator.
    x: [u8; 16],

    aad_bytes: u64,
    message_bytes: u64,
    /// Bytes already XORed into the pending AAD block (0..16).
    ares: usize,
    /// Bytes already XORed into the pending message block (0..16).
    mres: usize,

    message_started: bool,
    poisoned: bool,
}

impl<C: BlockCipher> AeadCtx<C> {
    /// `spec.md` §4.2 "Precomputation": `H = E_K(0)`, table built from it.
    /// `init` takes the keyed cipher; call `set_iv` before feeding AAD.
    pub fn init(cipher: C) -> Self {
        let zero = [0u8; 16];
        let mut h = [0u8; 16];
        cipher.encrypt(&zero, &mut h);
        let backend = FourBitTable::new(h);

        AeadCtx {
            cipher,
            backend,
            y: [0u8; 16],
            ek0: [0u8; 16],
            x: [0u8; 16],
            aad_bytes: 0,
            message_bytes: 0,
            ares: 0,
            mres: 0,
            message_started: false,
            poisoned: false,
        }
    }

    fn check_live(&self) -> Result<()> {
        if self.poisoned {
            Err(GcmError::Poisoned)
        } else {
            Ok(())
        }
    }

    fn poison<T>(&mut self, err: GcmError) -> Result<T> {
        self.poisoned = true;
        Err(err)
    }

    /// `spec.md` §4.2 "State Machine": fixes `Y_0`. A 12-byte IV is the
    /// common TLS explicit-nonce case (`Y_0 = IV ‖ 0x00000001`); any other
    /// length derives `Y_0` via GHASH-of-IV with the bit length appended,
    /// per the standard GCM construction.
    pub fn set_iv(&mut self, iv: &[u8]) -> Result<()> {
        self.check_live()?;

        let mut y0 = [0u8; 16];
        if iv.len() == 12 {
            y0[..12].copy_from_slice(iv);
            y0[15] = 1;
        } else {
            let mut acc = [0u8; 16];
            for chunk in iv.chunks(16) {
                let mut block = [0u8; 16];
                block[..chunk.len()].copy_from_slice(chunk);
                for i in 0..16 {
                    acc[i] ^= block[i];
                }
                self.backend.gmult(&mut acc);
            }
            let mut len_block = [0u8; 16];
            len_block[8..16].copy_from_slice(&((iv.len() as u64) * 8).to_be_bytes());
            for i in 0..16 {
                acc[i] ^= len_block[i];
            }
            self.backend.gmult(&mut acc);
            y0 = acc;
        }

        self.cipher.encrypt(&y0, &mut self.ek0);
        self.y = y0;
        increment_counter(&mut self.y);
        Ok(())
    }

    /// `spec.md` §4.2 "Operations" — `aad(data)`.
    pub fn aad(&mut self, data: &[u8]) -> Result<()> {
        self.check_live()?;
        if self.message_started {
            return self.poison(GcmError::AadAfterMessage);
        }

        let new_total = self.aad_bytes.checked_add(data.len() as u64);
        match new_total {
            Some(total) if total.saturating_mul(8) <= GHASH_CHUNK_LIMIT_AAD_BITS => {
                self.aad_bytes = total;
            }
            _ => return self.poison(GcmError::InvalidLength),
        }

        let mut offset = 0;
        // top off a pending partial block first
        if self.ares != 0 {
            let take = (16 - self.ares).min(data.len());
            for i in 0..take {
                self.x[self.ares + i] ^= data[i];
            }
            self.ares += take;
            offset = take;
            if self.ares == 16 {
                self.backend.gmult(&mut self.x);
                self.ares = 0;
            }
        }

        let remaining = &data[offset..];
        let full_len = remaining.len() - (remaining.len() % 16);
        if full_len > 0 {
            self.backend.ghash(&mut self.x, &remaining[..full_len]);
        }
        let tail = &remaining[full_len..];
        for (i, &b) in tail.iter().enumerate() {
            self.x[i] ^= b;
        }
        self.ares = tail.len();

        Ok(())
    }

    fn begin_message(&mut self) {
        if !self.message_started {
            if self.ares != 0 {
                self.backend.gmult(&mut self.x);
                self.ares = 0;
            }
            self.message_started = true;
        }
    }

    fn check_message_length(&mut self, additional: usize) -> Result<()> {
        let new_total = self.message_bytes.checked_add(additional as u64);
        match new_total {
            Some(total) if total <= GHASH_CHUNK_LIMIT_MESSAGE => {
                self.message_bytes = total;
                Ok(())
            }
            _ => self.poison(GcmError::InvalidLength),
        }
    }

    /// Feeds `block` (the ciphertext bytes for this call, whether freshly
    /// produced by encryption or passed in for decryption) into the
    /// running GHASH accumulator using the same partial-block bookkeeping
    /// `aad` uses.
    fn ghash_fold_message(&mut self, data: &[u8]) {
        let mut offset = 0;
        if self.mres != 0 {
            let take = (16 - self.mres).min(data.len());
            for i in 0..take {
                self.x[self.mres + i] ^= data[i];
            }
            self.mres += take;
            offset = take;
            if self.mres == 16 {
                self.backend.gmult(&mut self.x);
                self.mres = 0;
            }
        }
        let remaining = &data[offset..];
        let full_len = remaining.len() - (remaining.len() % 16);
        if full_len > 0 {
            self.backend.ghash(&mut self.x, &remaining[..full_len]);
        }
        let tail = &remaining[full_len..];
        for (i, &b) in tail.iter().enumerate() {
            self.x[i] ^= b;
        }
        self.mres = tail.len();
    }

    /// `spec.md` §4.2: "For each 16-byte block, call block(Y, EKi, K),
    /// increment the low 32 bits of Y ..., XOR EKi with the input to
    /// produce output, and for encrypt fold output into X".
    pub fn encrypt(&mut self, input: &[u8], output: &mut [u8]) -> Result<()> {
        self.check_live()?;
        if output.len() != input.len() {
            return self.poison(GcmError::InvalidLength);
        }
        self.check_message_length(input.len())?;
        self.begin_message();

        for (in_chunk, out_chunk) in input.chunks(16).zip(output.chunks_mut(16)) {
            let mut ek = [0u8; 16];
            self.cipher.encrypt(&self.y, &mut ek);
            increment_counter(&mut self.y);
            for i in 0..in_chunk.len() {
                out_chunk[i] = in_chunk[i] ^ ek[i];
            }
        }
        self.ghash_fold_message(output);
        Ok(())
    }

    /// Mirror of `encrypt`: "for decrypt fold input into X" — the ciphertext
    /// (this call's `input`) is what gets hashed, not the recovered
    /// plaintext.
    pub fn decrypt(&mut self, input: &[u8], output: &mut [u8]) -> Result<()> {
        self.check_live()?;
        if output.len() != input.len() {
            return self.poison(GcmError::InvalidLength);
        }
        self.check_message_length(input.len())?;
        self.begin_message();

        self.ghash_fold_message(input);
        for (in_chunk, out_chunk) in input.chunks(16).zip(output.chunks_mut(16)) {
            let mut ek = [0u8; 16];
            self.cipher.encrypt(&self.y, &mut ek);
            increment_counter(&mut self.y);
            for i in 0..in_chunk.len() {
                out_chunk[i] = in_chunk[i] ^ ek[i];
            }
        }
        Ok(())
    }

    /// `spec.md` §4.2: "finalize any partial block, XOR in 64-bit
    /// big-endian AAD bit-length and 64-bit big-endian ciphertext
    /// bit-length, gmult, XOR with EK0, output the first len bytes."
    pub fn tag(&mut self, len: usize) -> Result<Vec<u8>> {
        self.check_live()?;
        if len > 16 {
            return self.poison(GcmError::BadTag);
        }
        self.begin_message();
        if self.mres != 0 {
            self.backend.gmult(&mut self.x);
            self.mres = 0;
        }

        let mut len_block = [0u8; 16];
        len_block[0..8].copy_from_slice(&(self.aad_bytes * 8).to_be_bytes());
        len_block[8..16].copy_from_slice(&(self.message_bytes * 8).to_be_bytes());
        for i in 0..16 {
            self.x[i] ^= len_block[i];
        }
        self.backend.gmult(&mut self.x);

        let mut tag = [0u8; 16];
        for i in 0..16 {
            tag[i] = self.x[i] ^ self.ek0[i];
        }
        Ok(tag[..len].to_vec())
    }

    /// `spec.md` §4.2: constant-time comparison; `-1`/error if `len`
    /// exceeds 16.
    pub fn verify(&mut self, expected: &[u8], len: usize) -> Result<()> {
        if len > 16 || expected.len() != len {
            self.poisoned = true;
            return Err(GcmError::BadTag);
        }
        let computed = self.tag(len)?;
        if primitives::ct_eq(&computed, expected) {
            Ok(())
        } else {
            self.poisoned = true;
            Err(GcmError::BadTag)
        }
    }
}

impl<C: BlockCipher> Drop for AeadCtx<C> {
    fn drop(&mut self) {
        self.y.zeroize();
        self.ek0.zeroize();
        self.x.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::Aes128Cipher;

    fn aes_gcm_encrypt(key: [u8; 16], iv: [u8; 12], aad: &[u8], pt: &[u8]) -> (Vec<u8>, [u8; 16]) {
        let cipher = Aes128Cipher::new(key);
        let mut ctx = AeadCtx::init(cipher);
        ctx.set_iv(&iv).unwrap();
        ctx.aad(aad).unwrap();
        let mut ct = vec![0u8; pt.len()];
        ctx.encrypt(pt, &mut ct).unwrap();
        let tag = ctx.tag(16).unwrap();
        (ct, tag.try_into().unwrap())
    }

    // spec.md §8 scenario E.
    #[test]
    fn known_answer_empty_plaintext_and_aad() {
        let (ct, tag) = aes_gcm_encrypt([0u8; 16], [0u8; 12], &[], &[]);
        assert!(ct.is_empty());
        assert_eq!(hex::encode(tag), "58e2fccefa7e3061367f1d57a4e7455a");
    }

    // spec.md §8 scenario F.
    #[test]
    fn known_answer_single_zero_block() {
        let (ct, tag) = aes_gcm_encrypt([0u8; 16], [0u8; 12], &[], &[0u8; 16]);
        assert_eq!(hex::encode(&ct), "0388dace60b6a392f328c2b971b2fe78");
        assert_eq!(hex::encode(tag), "ab6e47d42cec13bdf53a67b21257bddf");
    }

    #[test]
    fn round_trip_with_aad() {
        let key = [0x42u8; 16];
        let iv = [0x24u8; 12];
        let aad = b"handshake transcript hash goes here";
        let pt = b"application data carried over the record layer";

        let cipher = Aes128Cipher::new(key);
        let mut enc = AeadCtx::init(cipher);
        enc.set_iv(&iv).unwrap();
        enc.aad(aad).unwrap();
        let mut ct = vec![0u8; pt.len()];
        enc.encrypt(pt, &mut ct).unwrap();
        let tag = enc.tag(16).unwrap();

        let cipher = Aes128Cipher::new(key);
        let mut dec = AeadCtx::init(cipher);
        dec.set_iv(&iv).unwrap();
        dec.aad(aad).unwrap();
        let mut recovered = vec![0u8; ct.len()];
        dec.decrypt(&ct, &mut recovered).unwrap();
        dec.verify(&tag, 16).unwrap();
        assert_eq!(recovered, pt);
    }

    #[test]
    fn flipped_ciphertext_bit_fails_verification() {
        let key = [0x11u8; 16];
        let iv = [0x22u8; 12];
        let pt = vec![0xAAu8; 33];

        let cipher = Aes128Cipher::new(key);
        let mut enc = AeadCtx::init(cipher);
        enc.set_iv(&iv).unwrap();
        enc.aad(b"aad").unwrap();
        let mut ct = vec![0u8; pt.len()];
        enc.encrypt(&pt, &mut ct).unwrap();
        let tag = enc.tag(16).unwrap();

        ct[5] ^= 0x01;

        let cipher = Aes128Cipher::new(key);
        let mut dec = AeadCtx::init(cipher);
        dec.set_iv(&iv).unwrap();
        dec.aad(b"aad").unwrap();
        let mut recovered = vec![0u8; ct.len()];
        dec.decrypt(&ct, &mut recovered).unwrap();
        assert!(dec.verify(&tag, 16).is_err());
    }

    #[test]
    fn aad_after_message_started_is_rejected() {
        let cipher = Aes128Cipher::new([0u8; 16]);
        let mut ctx = AeadCtx::init(cipher);
        ctx.set_iv(&[0u8; 12]).unwrap();
        let mut out = [0u8; 16];
        ctx.encrypt(&[0u8; 16], &mut out).unwrap();
        assert_eq!(ctx.aad(b"too late"), Err(GcmError::AadAfterMessage));
    }

    #[test]
    fn context_is_poisoned_after_a_failure() {
        let cipher = Aes128Cipher::new([0u8; 16]);
        let mut ctx = AeadCtx::init(cipher);
        ctx.set_iv(&[0u8; 12]).unwrap();
        let mut out = [0u8; 16];
        ctx.encrypt(&[0u8; 16], &mut out).unwrap();
        let _ = ctx.aad(b"rejected, poisons the context");
        assert_eq!(ctx.tag(16), Err(GcmError::Poisoned));
    }

    #[test]
    fn non_standard_iv_length_is_accepted() {
        let cipher = Aes128Cipher::new([0u8; 16]);
        let mut ctx = AeadCtx::init(cipher);
        // An 8-byte IV forces the GHASH-of-IV derivation path.
        ctx.set_iv(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let mut out = [0u8; 16];
        ctx.encrypt(&[0u8; 16], &mut out).unwrap();
        let tag = ctx.tag(16).unwrap();
        assert_eq!(tag.len(), 16);
    }
}
