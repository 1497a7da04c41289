//! `spec.md` §6.1: `Hash` with update/finalize and a fixed-size digest.
//! Covers the PRF hash (SHA-256/384 for TLS 1.2), the legacy handshake
//! digest (MD5 ‖ SHA-1, used by TLS ≤ 1.1 and pre-1.2 signing), and the
//! per-suite MAC hash for CBC suites.

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};

/// Wire identifier for the hash algorithms `spec.md` §3.5's sigalgs table
/// and §4.4's PRF selection distinguish between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    /// TLS 1.2 `signature_algorithms` hash byte (RFC 5246 §7.4.1.4.1).
    pub fn wire_id(self) -> u8 {
        match self {
            HashAlgorithm::Md5 => 1,
            HashAlgorithm::Sha1 => 2,
            HashAlgorithm::Sha256 => 4,
            HashAlgorithm::Sha384 => 5,
            HashAlgorithm::Sha512 => 6,
        }
    }

    pub fn from_wire_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(HashAlgorithm::Md5),
            2 => Some(HashAlgorithm::Sha1),
            4 => Some(HashAlgorithm::Sha256),
            5 => Some(HashAlgorithm::Sha384),
            6 => Some(HashAlgorithm::Sha512),
            _ => None,
        }
    }

    pub fn output_len(self) -> usize {
        match self {
            HashAlgorithm::Md5 => 16,
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }

    pub fn new_ctx(self) -> HashCtx {
        match self {
            HashAlgorithm::Md5 => HashCtx::Md5(Md5::new()),
            HashAlgorithm::Sha1 => HashCtx::Sha1(Sha1::new()),
            HashAlgorithm::Sha256 => HashCtx::Sha256(Sha256::new()),
            HashAlgorithm::Sha384 => HashCtx::Sha384(Sha384::new()),
            HashAlgorithm::Sha512 => HashCtx::Sha512(Sha512::new()),
        }
    }

    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        let mut ctx = self.new_ctx();
        ctx.update(data);
        ctx.finalize()
    }
}

/// Running hash state. `update` may be called any number of times before
/// `finalize` consumes the context, mirroring the teacher's `Sha256::default()
/// .input(..).result()` pattern generalized across five algorithms.
pub enum HashCtx {
    Md5(Md5),
    Sha1(Sha1),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
}

impl HashCtx {
    pub fn update(&mut self, data: &[u8]) {
        match self {
            HashCtx::Md5(h) => h.update(data),
            HashCtx::Sha1(h) => h.update(data),
            HashCtx::Sha256(h) => h.update(data),
            HashCtx::Sha384(h) => h.update(data),
            HashCtx::Sha512(h) => h.update(data),
        }
    }

    pub fn finalize(self) -> Vec<u8> {
        match self {
            HashCtx::Md5(h) => h.finalize().to_vec(),
            HashCtx::Sha1(h) => h.finalize().to_vec(),
            HashCtx::Sha256(h) => h.finalize().to_vec(),
            HashCtx::Sha384(h) => h.finalize().to_vec(),
            HashCtx::Sha512(h) => h.finalize().to_vec(),
        }
    }
}

/// `spec.md` §4.4 "Signing of ServerKeyExchange": "For TLS < 1.2 with RSA,
/// hash is MD5‖SHA-1 concatenated and signed without a hash OID
/// (NID_md5_sha1)". Also used for the legacy CertificateVerify digest.
#[derive(Default, Clone)]
pub struct LegacyMd5Sha1 {
    md5: Md5,
    sha1: Sha1,
}

impl LegacyMd5Sha1 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, data: &[u8]) {
        self.md5.update(data);
        self.sha1.update(data);
    }

    /// 36-byte digest: 16 bytes of MD5 followed by 20 bytes of SHA-1, the
    /// exact concatenation RFC 5246 §4.7/§7.4.8 (pre-1.2) signs.
    pub fn finalize(self) -> [u8; 36] {
        let mut out = [0u8; 36];
        out[..16].copy_from_slice(&self.md5.finalize());
        out[16..].copy_from_slice(&self.sha1.finalize());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_answer() {
        let digest = HashAlgorithm::Sha256.digest(b"abc");
        assert_eq!(
            hex::encode(digest),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn legacy_md5_sha1_is_36_bytes() {
        let mut ctx = LegacyMd5Sha1::new();
        ctx.update(b"client_hello..server_hello..");
        let digest = ctx.finalize();
        assert_eq!(digest.len(), 36);
    }
}
