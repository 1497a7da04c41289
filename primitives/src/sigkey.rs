//! `spec.md` §4.4 "Signing of ServerKeyExchange" and "CertificateVerify":
//! the server signs a transcript digest with its certificate's private
//! key, and verifies the client's signature the same way. RSA/DSA/ECDSA
//! signing and verification primitives are explicitly out of scope
//! (`spec.md` §1), so — exactly like `CertStore` — this module ships only
//! the trait boundary; callers supply a real signing backend (e.g. an
//! HSM, `rsa`/`p256`/`ring`, or a PKCS#11 session).

use std::fmt;

use crate::hash::HashAlgorithm;

/// RFC 5246 §7.4.1.4.1 `SignatureAlgorithm` wire values this engine can
/// select among, mirroring `tls_types::cipher_suite::AuthMethod` but as
/// the signature-scheme identifier sigalgs negotiation actually carries
/// (GOST excluded: no GOST signer ships or is named as a consumer here).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureScheme {
    Rsa,
    Dsa,
    Ecdsa,
}

impl SignatureScheme {
    pub fn wire_id(self) -> u8 {
        match self {
            SignatureScheme::Rsa => 1,
            SignatureScheme::Dsa => 2,
            SignatureScheme::Ecdsa => 3,
        }
    }

    pub fn from_wire_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(SignatureScheme::Rsa),
            2 => Some(SignatureScheme::Dsa),
            3 => Some(SignatureScheme::Ecdsa),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignError;

impl fmt::Display for SignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sigkey: signing operation failed")
    }
}

impl std::error::Error for SignError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyError;

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sigkey: signature verification failed")
    }
}

impl std::error::Error for VerifyError {}

/// The server's certificate-bound signing key. `spec.md` §4.4: "the hash
/// is chosen from the client's sigalgs list intersected with the key's
/// capabilities" — `supported_hashes` is what the intersection runs
/// against; `preferred_hash` is the tie-break `spec.md` names ("the
/// certificate's digest preference").
pub trait ServerSigningKey {
    fn scheme(&self) -> SignatureScheme;
    fn supported_hashes(&self) -> &[HashAlgorithm];
    fn preferred_hash(&self) -> HashAlgorithm;

    /// Signs a pre-hashed digest (TLS 1.2 sigalgs path) or the raw
    /// 36-byte MD5‖SHA-1 concatenation (legacy path, `hash ==
    /// HashAlgorithm::Md5` is this engine's convention for "no hash OID").
    fn sign(&self, hash: HashAlgorithm, digest: &[u8]) -> Result<Vec<u8>, SignError>;
}

/// The client certificate's public key, used only to verify
/// CertificateVerify. Kept distinct from `ServerSigningKey` since a
/// server never needs to produce a signature with it.
pub trait PeerVerifyKey {
    fn scheme(&self) -> SignatureScheme;
    fn verify(&self, hash: HashAlgorithm, digest: &[u8], signature: &[u8]) -> Result<(), VerifyError>;
}
