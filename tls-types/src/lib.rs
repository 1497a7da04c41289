//! Shared wire-level vocabulary used by every other crate in the
//! workspace: protocol versions, content/handshake type tags, alert
//! codes, the cipher suite table, and the resumable session record.

mod alert;
mod cipher_suite;
mod session;
mod version;

pub use alert::{AlertDescription, AlertLevel, ContentType, HandshakeType};
pub use cipher_suite::{AuthMethod, BulkCipher, CipherSuite, KeyExchange, CIPHER_SUITES};
pub use session::{EcPointFormat, Session, SharedSession, VerifyResult};
pub use version::ProtocolVersion;
