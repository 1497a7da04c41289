//! `spec.md` §3.3 "Cipher Suite": "a 16-bit wire identifier, a key-exchange
//! class ..., an authentication class ..., a bulk-cipher class ..., a
//! MAC/PRF hash, and feature flags". Realized here as a `const` descriptor
//! table indexed by wire id, mirroring how the teacher's `common-types`
//! crate centralizes shared descriptive data rather than scattering it
//! across call sites.

use primitives::HashAlgorithm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyExchange {
    Rsa,
    Dhe,
    Ecdhe,
    Gost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    Rsa,
    Dss,
    Ecdsa,
    Anonymous,
    Gost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkCipher {
    /// CBC block cipher with a separate MAC; `key_len` in bytes.
    Cbc { key_len: usize, mac: HashAlgorithm },
    /// AES-GCM; `key_len` in bytes. `spec.md` §1 scopes the AEAD component
    /// to GCM, so this is the only AEAD variant in the table.
    Gcm { key_len: usize },
}

impl BulkCipher {
    pub fn key_len(self) -> usize {
        match self {
            BulkCipher::Cbc { key_len, .. } => key_len,
            BulkCipher::Gcm { key_len } => key_len,
        }
    }

    pub fn is_aead(self) -> bool {
        matches!(self, BulkCipher::Gcm { .. })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CipherSuite {
    pub id: u16,
    pub name: &'static str,
    pub kx: KeyExchange,
    pub auth: AuthMethod,
    pub bulk: BulkCipher,
    pub prf_hash: HashAlgorithm,
    /// Suite only exists in TLS 1.2 wire form (every AEAD suite and every
    /// suite whose PRF hash is not SHA-1/MD5).
    pub tls12_only: bool,
    pub requires_ec: bool,
}

impl CipherSuite {
    pub fn by_id(id: u16) -> Option<&'static CipherSuite> {
        CIPHER_SUITES.iter().find(|s| s.id == id)
    }

    pub fn uses_aead(&self) -> bool {
        self.bulk.is_aead()
    }
}

/// The suites this workspace's reference key-exchange/signature
/// implementations (`primitives::P256Group`, AES-128/256, SHA-256/384)
/// can actually carry end to end, plus the two GOST ids §4.3 names for the
/// CryptoPro compatibility blob (described, not implemented — no GOST
/// primitive ships in this workspace; `spec.md` §1 lists GOST hashing/VKO
/// as an external collaborator with no shipped default).
pub static CIPHER_SUITES: &[CipherSuite] = &[
    CipherSuite {
        id: 0xC02F,
        name: "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256",
        kx: KeyExchange::Ecdhe,
        auth: AuthMethod::Rsa,
        bulk: BulkCipher::Gcm { key_len: 16 },
        prf_hash: HashAlgorithm::Sha256,
        tls12_only: true,
        requires_ec: true,
    },
    CipherSuite {
        id: 0xC030,
        name: "TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384",
        kx: KeyExchange::Ecdhe,
        auth: AuthMethod::Rsa,
        bulk: BulkCipher::Gcm { key_len: 32 },
        prf_hash: HashAlgorithm::Sha384,
        tls12_only: true,
        requires_ec: true,
    },
    CipherSuite {
        id: 0x009E,
        name: "TLS_DHE_RSA_WITH_AES_128_GCM_SHA256",
        kx: KeyExchange::Dhe,
        auth: AuthMethod::Rsa,
        bulk: BulkCipher::Gcm { key_len: 16 },
        prf_hash: HashAlgorithm::Sha256,
        tls12_only: true,
        requires_ec: false,
    },
    CipherSuite {
        id: 0x002F,
        name: "TLS_RSA_WITH_AES_128_CBC_SHA",
        kx: KeyExchange::Rsa,
        auth: AuthMethod::Rsa,
        bulk: BulkCipher::Cbc { key_len: 16, mac: HashAlgorithm::Sha1 },
        prf_hash: HashAlgorithm::Sha256,
        tls12_only: false,
        requires_ec: false,
    },
    CipherSuite {
        id: 0x003C,
        name: "TLS_RSA_WITH_AES_128_CBC_SHA256",
        kx: KeyExchange::Rsa,
        auth: AuthMethod::Rsa,
        bulk: BulkCipher::Cbc { key_len: 16, mac: HashAlgorithm::Sha256 },
        prf_hash: HashAlgorithm::Sha256,
        tls12_only: true,
        requires_ec: false,
    },
    CipherSuite {
        id: 0x0035,
        name: "TLS_RSA_WITH_AES_256_CBC_SHA",
        kx: KeyExchange::Rsa,
        auth: AuthMethod::Rsa,
        bulk: BulkCipher::Cbc { key_len: 32, mac: HashAlgorithm::Sha1 },
        prf_hash: HashAlgorithm::Sha256,
        tls12_only: false,
        requires_ec: false,
    },
    // GOST 2001 suites; `spec.md` §4.3 names the CryptoPro compatibility
    // blob condition for exactly these two ids. No GOST cipher/signature
    // primitive ships in this workspace, so these entries exist for the
    // extension engine's emission rule, not for an end-to-end handshake.
    CipherSuite {
        id: 0x0080,
        name: "TLS_GOSTR341094_WITH_28147_CNT_IMIT",
        kx: KeyExchange::Gost,
        auth: AuthMethod::Gost,
        bulk: BulkCipher::Cbc { key_len: 32, mac: HashAlgorithm::Sha1 },
        prf_hash: HashAlgorithm::Sha1,
        tls12_only: false,
        requires_ec: false,
    },
    CipherSuite {
        id: 0x0081,
        name: "TLS_GOSTR341001_WITH_28147_CNT_IMIT",
        kx: KeyExchange::Gost,
        auth: AuthMethod::Gost,
        bulk: BulkCipher::Cbc { key_len: 32, mac: HashAlgorithm::Sha1 },
        prf_hash: HashAlgorithm::Sha1,
        tls12_only: false,
        requires_ec: false,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_a_suite_resolves() {
        let suite = CipherSuite::by_id(0xC02F).unwrap();
        assert_eq!(suite.kx, KeyExchange::Ecdhe);
        assert!(suite.uses_aead());
        assert!(suite.requires_ec);
    }

    #[test]
    fn unknown_id_is_none() {
        assert!(CipherSuite::by_id(0xFFFF).is_none());
    }
}
