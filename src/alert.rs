//! `spec.md` §4.4 "Failure model": "A fatal alert causes the machine to
//! emit an `Alert(fatal, code)` record". The wire body is just the two
//! bytes RFC 5246 §7.2 defines; everything else (which description maps
//! to which `HandshakeError` variant) lives in `handshake::error`.

use tls_types::{AlertDescription, AlertLevel};

/// The two-byte `Alert` record body: level ‖ description.
pub fn build_alert_record(level: AlertLevel, description: AlertDescription) -> [u8; 2] {
    [level.wire(), description.wire()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_level_then_description() {
        let body = build_alert_record(AlertLevel::Fatal, AlertDescription::HandshakeFailure);
        assert_eq!(body, [2, 40]);
    }
}
