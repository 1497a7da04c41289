//! `spec.md` §4.3 extension table. Wire ids are the IANA TLS ExtensionType
//! registry values the table names by name; kept as plain `u16` constants
//! rather than an exhaustive enum since unknown ids must parse (and be
//! silently ignored) rather than fail to match a variant.

pub const SERVER_NAME: u16 = 0;
pub const STATUS_REQUEST: u16 = 5;
pub const ELLIPTIC_CURVES: u16 = 10;
pub const EC_POINT_FORMATS: u16 = 11;
pub const SIGNATURE_ALGORITHMS: u16 = 13;
pub const USE_SRTP: u16 = 14;
pub const ALPN: u16 = 16;
pub const SESSION_TICKET: u16 = 35;
pub const RENEGOTIATION_INFO: u16 = 0xff01;
pub const NEXT_PROTO_NEG: u16 = 13172; // 0x3374, pre-standard NPN
pub const PADDING: u16 = 21;

/// §4.3 "server_name: First entry of type 0 carries UTF-8 hostname".
pub const SERVER_NAME_TYPE_HOST_NAME: u8 = 0;
