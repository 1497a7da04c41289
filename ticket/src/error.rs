use std::fmt;

/// `spec.md` §4.5: failure modes of ticket encrypt/decrypt. Distinct from
/// `TicketOutcome` (`outcome.rs`) — a `Malformed`/`BadMac` ticket is not a
/// protocol error, it just means "fall back to a full handshake"
/// (`spec.md` §7 "Local recovery": "undecryptable session ticket falls
/// back to a full handshake with a fresh session").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketError {
    /// Too short to contain key_name + IV + at least one CBC block + MAC,
    /// or a CBC padding byte failed to validate.
    Malformed,
    /// HMAC over (key_name ‖ iv ‖ ciphertext) did not match.
    BadMac,
    /// `key_name` does not match the current or previous key in the ring,
    /// and no callback accepted it.
    UnknownKey,
}

impl fmt::Display for TicketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketError::Malformed => write!(f, "ticket: malformed ciphertext"),
            TicketError::BadMac => write!(f, "ticket: hmac verification failed"),
            TicketError::UnknownKey => write!(f, "ticket: unrecognized key_name"),
        }
    }
}

impl std::error::Error for TicketError {}

pub type Result<T> = std::result::Result<T, TicketError>;
