//! `spec.md` §7 "Error Handling Design": errors are grouped into kinds
//! with different disposition, and "the state machine folds them into
//! alert codes at a single boundary" (`spec.md` §9). `HandshakeError`
//! carries the kind; [`HandshakeError::alert`] is that single boundary.

use std::fmt;
use std::io;

use tls_types::{AlertDescription, AlertLevel};

#[derive(Debug)]
pub enum HandshakeError {
    /// Short message, bad length, unknown enum value.
    Decode(&'static str),
    /// Unexpected message type, version mismatch, absent
    /// `renegotiation_info` on a renegotiation.
    Protocol(&'static str),
    /// Bad MAC, tag mismatch, bad signature, bad padding. `spec.md` §7:
    /// "masked in timing (constant-time compares)" — callers that reach
    /// this variant have already gone through a constant-time compare;
    /// the variant itself carries no secret-dependent information.
    Crypto(&'static str),
    /// No shared cipher, no shared curve, certificate rejected.
    Policy(&'static str),
    /// Allocation failure, RNG depletion, a collaborator trait returning
    /// an opaque failure.
    Resource(&'static str),
    /// The underlying transport would block; the caller should retry
    /// once more data is available. State is preserved; `spec.md` §5
    /// "the state machine is re-entrant on the same connection and
    /// resumes from the stored sub-state."
    WouldBlock,
    /// The peer's own fatal alert, or a bare transport I/O failure.
    Io(io::Error),
}

impl HandshakeError {
    /// `spec.md` §9 "the state machine folds them into alert codes at a
    /// single boundary." Returns `None` for `WouldBlock`, which never
    /// reaches the wire.
    pub fn alert(&self) -> Option<(AlertLevel, AlertDescription)> {
        let desc = match self {
            HandshakeError::Decode(_) => AlertDescription::DecodeError,
            HandshakeError::Protocol(_) => AlertDescription::HandshakeFailure,
            HandshakeError::Crypto(_) => AlertDescription::DecryptError,
            HandshakeError::Policy(_) => AlertDescription::HandshakeFailure,
            HandshakeError::Resource(_) => AlertDescription::InternalError,
            HandshakeError::WouldBlock => return None,
            HandshakeError::Io(_) => return None,
        };
        Some((desc.default_level(), desc))
    }
}

impl fmt::Display for HandshakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandshakeError::Decode(msg) => write!(f, "handshake: decode error: {}", msg),
            HandshakeError::Protocol(msg) => write!(f, "handshake: protocol error: {}", msg),
            HandshakeError::Crypto(msg) => write!(f, "handshake: cryptographic error: {}", msg),
            HandshakeError::Policy(msg) => write!(f, "handshake: policy error: {}", msg),
            HandshakeError::Resource(msg) => write!(f, "handshake: resource error: {}", msg),
            HandshakeError::WouldBlock => write!(f, "handshake: would block"),
            HandshakeError::Io(e) => write!(f, "handshake: io error: {}", e),
        }
    }
}

impl std::error::Error for HandshakeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HandshakeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for HandshakeError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::WouldBlock {
            HandshakeError::WouldBlock
        } else {
            HandshakeError::Io(e)
        }
    }
}

impl From<wire::WireError> for HandshakeError {
    fn from(_: wire::WireError) -> Self {
        HandshakeError::Decode("wire codec")
    }
}

impl From<extensions::ExtensionError> for HandshakeError {
    fn from(e: extensions::ExtensionError) -> Self {
        match e {
            extensions::ExtensionError::Decode => HandshakeError::Decode("extension block"),
            extensions::ExtensionError::MissingRenegotiationInfo => {
                HandshakeError::Protocol("renegotiation_info required but absent")
            }
        }
    }
}

impl From<gcm::GcmError> for HandshakeError {
    fn from(_: gcm::GcmError) -> Self {
        HandshakeError::Crypto("record layer aead failure")
    }
}

impl From<primitives::RngError> for HandshakeError {
    fn from(_: primitives::RngError) -> Self {
        HandshakeError::Resource("rng depleted")
    }
}

pub type Result<T> = std::result::Result<T, HandshakeError>;
