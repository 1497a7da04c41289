//! ServerHello extension emission, `spec.md` §4.3 second half.

use wire::Writer;

use crate::types;

/// Exact bytes OpenSSL-family servers emit for the CryptoPro compatibility
/// workaround, grounded in `original_source/ssl/t1_lib.c`'s
/// `cryptopro_ext` table (type 0xfde8, 32-byte OID blob).
const CRYPTOPRO_EXT: [u8; 36] = [
    0xfd, 0xe8, 0x00, 0x20, 0x30, 0x1e, 0x30, 0x08, 0x06, 0x06, 0x2a, 0x85, 0x03, 0x02, 0x02, 0x09,
    0x30, 0x08, 0x06, 0x06, 0x2a, 0x85, 0x03, 0x02, 0x02, 0x16, 0x30, 0x08, 0x06, 0x06, 0x2a, 0x85,
    0x03, 0x02, 0x02, 0x17,
];

/// Everything the handshake state machine needs to decide before emitting
/// ServerHello's extension block; a plain data struct so the caller
/// composes it from negotiation outcomes without this crate reaching back
/// into `handshake` state.
#[derive(Debug, Clone, Default)]
pub struct ServerHelloExtensions<'a> {
    /// Acknowledge SNI with an empty response, iff the client sent one.
    pub sni_acknowledged: bool,
    /// `client_verify_data ++ server_verify_data` from the prior
    /// handshake, present iff this is (re)negotiation with secure
    /// renegotiation support, empty on an initial handshake.
    pub renegotiation_info: Option<&'a [u8]>,
    pub ec_point_formats: bool,
    pub new_session_ticket: bool,
    pub status_request: bool,
    pub use_srtp_profile: Option<u16>,
    /// Server's NPN advertisement list; suppressed by the caller already
    /// choosing ALPN (§4.3 "ignored if ALPN selected").
    pub npn_protocols: Option<&'a [&'a [u8]]>,
    pub alpn_selected: Option<&'a [u8]>,
    pub cryptopro_workaround: bool,
    /// Push the ServerHello extension block length past the 256-511
    /// "danger zone" some middleboxes mishandle. Caller supplies the
    /// length of everything already written before padding is considered.
    pub pad_to_avoid_danger_zone: bool,
}

impl<'a> ServerHelloExtensions<'a> {
    pub fn write(&self, w: &mut Writer) {
        let mut body = w.begin_u16();

        if self.sni_acknowledged {
            body.put_u16(types::SERVER_NAME);
            body.put_u16(0);
        }

        if let Some(reneg) = self.renegotiation_info {
            body.put_u16(types::RENEGOTIATION_INFO);
            {
                let mut ext = body.begin_u16();
                ext.begin_u8().put_bytes(reneg);
            }
        }

        if self.ec_point_formats {
            body.put_u16(types::EC_POINT_FORMATS);
            {
                let mut ext = body.begin_u16();
                // uncompressed only; this workspace's default EcGroup
                // implementation never emits compressed points.
                ext.begin_u8().put_u8(0);
            }
        }

        if self.new_session_ticket {
            body.put_u16(types::SESSION_TICKET);
            body.put_u16(0);
        }

        if self.status_request {
            body.put_u16(types::STATUS_REQUEST);
            body.put_u16(0);
        }

        if let Some(profile) = self.use_srtp_profile {
            body.put_u16(types::USE_SRTP);
            {
                let mut ext = body.begin_u16();
                ext.begin_u16().put_u16(profile);
                ext.begin_u8();
            }
        }

        if let Some(protos) = self.npn_protocols {
            if self.alpn_selected.is_none() {
                body.put_u16(types::NEXT_PROTO_NEG);
                {
                    let mut ext = body.begin_u16();
                    for p in protos {
                        ext.begin_u8().put_bytes(p);
                    }
                }
            }
        }

        if let Some(selected) = self.alpn_selected {
            if !selected.is_empty() {
                body.put_u16(types::ALPN);
                {
                    let mut ext = body.begin_u16();
                    let mut list = ext.begin_u16();
                    list.begin_u8().put_bytes(selected);
                }
            }
        }

        if self.cryptopro_workaround {
            body.put_bytes(&CRYPTOPRO_EXT);
        }

        if self.pad_to_avoid_danger_zone {
            let so_far = body.len();
            if let Some(padding) = danger_zone_padding(so_far) {
                body.put_u16(types::PADDING);
                {
                    let mut ext = body.begin_u16();
                    ext.put_bytes(&vec![0u8; padding]);
                }
            }
        }
    }
}

/// §4.3: "If the total extension block would leave the ClientHello in the
/// 256-511 byte 'danger zone' for known F5 terminators, a padding
/// extension is appended to push the length >= 512." Returns the number
/// of zero padding bytes to carry inside the padding extension body, or
/// `None` if no padding is needed. `current_len` is the extension block
/// length written so far, *before* accounting for the 4-byte header the
/// padding extension itself would add.
fn danger_zone_padding(current_len: usize) -> Option<usize> {
    const HEADER: usize = 4;
    if current_len < 256 || current_len >= 512 {
        return None;
    }
    let target = 512usize.saturating_sub(HEADER);
    Some(target.saturating_sub(current_len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_extensions_write_zero_length_block() {
        let exts = ServerHelloExtensions::default();
        let mut w = Writer::new();
        exts.write(&mut w);
        let buf = w.finish();
        assert_eq!(&buf[..2], &[0x00, 0x00]);
    }

    #[test]
    fn alpn_and_cryptopro_emit() {
        let exts = ServerHelloExtensions {
            alpn_selected: Some(b"h2"),
            cryptopro_workaround: true,
            ..Default::default()
        };
        let mut w = Writer::new();
        exts.write(&mut w);
        let buf = w.finish();
        assert!(buf.len() > 2);
        assert!(buf.ends_with(&CRYPTOPRO_EXT));
    }

    #[test]
    fn danger_zone_padding_targets_512() {
        assert_eq!(danger_zone_padding(300), Some(512 - 4 - 300));
        assert_eq!(danger_zone_padding(100), None);
        assert_eq!(danger_zone_padding(600), None);
    }
}
