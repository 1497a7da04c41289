//! `spec.md` §6.1: `CertStore::verify(chain, purpose, current_time) →
//! VerifyResult`. ASN.1/X.509 parsing and chain verification are explicitly
//! out of scope (`spec.md` §1), so this module ships only the trait —
//! callers must supply their own implementation (e.g. backed by `webpki`,
//! `rustls-webpki`, or an in-house X.509 stack).

use std::fmt;

/// Opaque outcome of certificate-chain verification. `spec.md` §3.2 stores
/// this alongside a session ("peer certificate, verify_result"); the
/// handshake engine never inspects its internals beyond `is_ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyResult {
    Ok,
    Expired,
    UnknownCa,
    Revoked,
    NameMismatch,
    Other,
}

impl VerifyResult {
    pub fn is_ok(self) -> bool {
        matches!(self, VerifyResult::Ok)
    }
}

impl fmt::Display for VerifyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyResult::Ok => write!(f, "ok"),
            VerifyResult::Expired => write!(f, "certificate expired"),
            VerifyResult::UnknownCa => write!(f, "unknown certificate authority"),
            VerifyResult::Revoked => write!(f, "certificate revoked"),
            VerifyResult::NameMismatch => write!(f, "name mismatch"),
            VerifyResult::Other => write!(f, "verification failed"),
        }
    }
}

/// A DER-encoded certificate chain, leaf first.
pub type CertChain<'a> = &'a [&'a [u8]];

pub trait CertStore {
    fn verify(&self, chain: CertChain<'_>, purpose: &str, current_time_secs: u64) -> VerifyResult;
}
