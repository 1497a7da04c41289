//! Wire-level protocol version, shared by both the TLS and DTLS record
//! layers. `spec.md` §6.2: "TLS record: 1-byte content_type, 2-byte
//! version, 2-byte length, body." DTLS negotiates a "higher" version by
//! numerically decreasing 1's-complement wire values (RFC 6347 §4.1); the
//! helper methods below hide that inversion from callers.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProtocolVersion {
    pub major: u8,
    pub minor: u8,
}

impl ProtocolVersion {
    pub const SSL3: Self = ProtocolVersion { major: 3, minor: 0 };
    pub const TLS1_0: Self = ProtocolVersion { major: 3, minor: 1 };
    pub const TLS1_1: Self = ProtocolVersion { major: 3, minor: 2 };
    pub const TLS1_2: Self = ProtocolVersion { major: 3, minor: 3 };
    pub const DTLS1_0: Self = ProtocolVersion { major: 254, minor: 255 };
    pub const DTLS1_2: Self = ProtocolVersion { major: 254, minor: 253 };

    pub fn wire(self) -> u16 {
        u16::from_be_bytes([self.major, self.minor])
    }

    pub fn from_wire(v: u16) -> Self {
        let [major, minor] = v.to_be_bytes();
        ProtocolVersion { major, minor }
    }

    pub fn is_dtls(self) -> bool {
        self.major == 254
    }

    /// `spec.md` §4.4 ClientHello processing: "for DTLS select highest
    /// mutually supported variant". Because DTLS wire values decrease as
    /// the protocol version increases, "highest" is numerically smallest.
    pub fn is_at_least(self, floor: ProtocolVersion) -> bool {
        debug_assert_eq!(self.is_dtls(), floor.is_dtls());
        if self.is_dtls() {
            self <= floor
        } else {
            self >= floor
        }
    }

    pub fn min_with(self, other: ProtocolVersion) -> ProtocolVersion {
        if self.is_dtls() {
            if self >= other { self } else { other }
        } else if self <= other {
            self
        } else {
            other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tls_wire_values_match_rfc5246() {
        assert_eq!(ProtocolVersion::TLS1_2.wire(), 0x0303);
        assert_eq!(ProtocolVersion::TLS1_0.wire(), 0x0301);
    }

    #[test]
    fn dtls_floor_check_is_reversed() {
        assert!(ProtocolVersion::DTLS1_0.is_at_least(ProtocolVersion::DTLS1_2) == false);
        assert!(ProtocolVersion::DTLS1_2.is_at_least(ProtocolVersion::DTLS1_0));
    }
}
