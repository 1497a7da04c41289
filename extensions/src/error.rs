use std::fmt;

/// `spec.md` §4.3: "A zero-length signature_algorithms or any length that
/// does not match the inner body length is a decode error" and "Duplicate
/// recognized extensions on the same message are a fatal decode error."
/// Both collapse into `Decode` here; the handshake crate maps it onto
/// `decode_error` per spec.md §7's error-kind table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionError {
    Decode,
    /// §4.3 "If renegotiate is absent on a renegotiation, the handshake
    /// fails with HANDSHAKE_FAILURE" — surfaced distinctly since it maps
    /// to a different alert than a plain decode failure.
    MissingRenegotiationInfo,
}

impl fmt::Display for ExtensionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtensionError::Decode => write!(f, "extensions: malformed extension block"),
            ExtensionError::MissingRenegotiationInfo => {
                write!(f, "extensions: renegotiation_info required but absent")
            }
        }
    }
}

impl std::error::Error for ExtensionError {}

impl From<wire::WireError> for ExtensionError {
    fn from(_: wire::WireError) -> Self {
        ExtensionError::Decode
    }
}

pub type Result<T> = std::result::Result<T, ExtensionError>;
