//! Root facade crate: `spec.md` §2 "Data flows from the transport ...
//! through the record layer into the handshake state machine". Every
//! protocol mechanic lives in a leaf crate (`wire`, `gcm`, `extensions`,
//! `handshake`, `ticket`); this crate is the one place that owns a
//! transport (`Read + Write`) and sequences those mechanics into the
//! server flight of RFC 5246 §7.3/§7.4 and RFC 6347 §4.2. Grounded in the
//! teacher's `brontide` crate, which plays the same role for the Noise
//! handshake: a small `lib.rs` re-exporting a `Machine`-equivalent type
//! (here, `ServerConnection`) and leaving the cryptographic heavy lifting
//! to sibling crates.

mod alert;
mod certificate;
mod config;
mod connection;
mod session_cache;

pub use alert::build_alert_record;
pub use certificate::{
    build_certificate_body, build_certificate_request_body, parse_certificate_body, parse_certificate_verify_body,
    sign_server_key_exchange, verify_certificate_verify, ParsedCertificateVerify,
};
pub use config::{ClientAuthConfig, DheGroup, ServerConfig};
pub use connection::{PriorHandshake, ServerConnection};
pub use session_cache::InMemorySessionCache;

// Re-exported so a caller can build a `ServerConfig` and drive a
// `ServerConnection` without depending on the leaf crates directly.
pub use handshake::{HandshakeError, Result, SessionCache};
pub use primitives::{
    BlockCipher, CertStore, DhParams, EcGroup, HashAlgorithm, NamedCurve, P256Group, PeerVerifyKey, Rng,
    RsaPrivateKey, ServerSigningKey, SignatureScheme, VerifyError,
};
pub use ticket::TicketKeyRing;
pub use tls_types::{AlertDescription, AlertLevel, CipherSuite, ProtocolVersion, Session, SharedSession, VerifyResult};
