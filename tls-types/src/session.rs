//! `spec.md` §3.2 "Session": the resumable state a handshake either
//! creates or restores. Shared by in-memory session-cache lookup and by
//! session-ticket decoding, so it lives here rather than in either
//! consumer crate.

use std::sync::Arc;

use zeroize::Zeroize;

use crate::cipher_suite::CipherSuite;
use crate::version::ProtocolVersion;

/// `spec.md` §3.1 Certificate Verification Result: "the outcome of chain
/// verification, kept distinct from whether the peer sent a certificate
/// at all."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyResult {
    NotRequested,
    NoCertificate,
    Verified,
    Failed,
}

/// EC point format / curve negotiation outcome, recorded on the session
/// because a resumed handshake skips extension renegotiation and must
/// reuse whatever the original handshake settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcPointFormat {
    Uncompressed,
    AnsiX962CompressedPrime,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: Vec<u8>,
    pub master_secret: [u8; 48],
    pub cipher_suite: &'static CipherSuite,
    pub protocol_version: ProtocolVersion,
    pub peer_certificate: Option<Vec<u8>>,
    pub verify_result: VerifyResult,
    /// Unix timestamp (seconds) after which this session must not be
    /// resumed. `spec.md` §3.2 "absolute lifetime, independent of ticket
    /// lifetime hints".
    pub not_after: u64,
    pub server_name: Option<String>,
    pub ec_point_format: Option<EcPointFormat>,
    /// Opaque ticket blob last issued for this session, if any; re-sent
    /// verbatim on resumption so the client need not re-request one.
    pub ticket: Option<Vec<u8>>,
}

impl Session {
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.not_after
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.master_secret.zeroize();
    }
}

/// Sessions are looked up by an immutable key and handed out to
/// potentially many connections sharing a resumed session; `spec.md` §5
/// names the cache as an `Arc`-shared table rather than owning the
/// session per-connection.
pub type SharedSession = Arc<Session>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher_suite::CipherSuite;

    #[test]
    fn expiry_is_inclusive_of_not_after() {
        let suite = CipherSuite::by_id(0xC02F).unwrap();
        let session = Session {
            session_id: vec![1, 2, 3],
            master_secret: [7u8; 48],
            cipher_suite: suite,
            protocol_version: ProtocolVersion::TLS1_2,
            peer_certificate: None,
            verify_result: VerifyResult::NotRequested,
            not_after: 1000,
            server_name: None,
            ec_point_format: None,
            ticket: None,
        };
        assert!(!session.is_expired(999));
        assert!(session.is_expired(1000));
    }
}
