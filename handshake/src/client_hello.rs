//! `spec.md` §4.4 "ClientHello processing" and "Cipher selection".

use extensions::ParsedExtensions;
use tls_types::{CipherSuite, ProtocolVersion};
use wire::Reader;

use crate::error::{HandshakeError, Result};

pub struct ClientHello {
    pub client_version: ProtocolVersion,
    pub random: [u8; 32],
    pub session_id: Vec<u8>,
    /// DTLS only: present (possibly empty) after the server has already
    /// required a cookie exchange (`spec.md` §4.4 "verify via callback or
    /// exact byte match").
    pub cookie: Option<Vec<u8>>,
    pub cipher_suites: Vec<u16>,
    pub compression_methods: Vec<u8>,
    pub extensions: ParsedExtensions,
}

impl ClientHello {
    /// `body` is the ClientHello handshake message body (after the
    /// 1-byte type + 3-byte length header has already been stripped).
    pub fn parse(body: &[u8], is_dtls: bool) -> Result<ClientHello> {
        let mut r = Reader::new(body);

        let client_version = ProtocolVersion::from_wire(r.read_u16()?);

        let random_bytes = r.read_bytes(32)?;
        let mut random = [0u8; 32];
        random.copy_from_slice(random_bytes);

        let session_id = r.read_u8_prefixed_bytes()?;
        if session_id.len() > 32 {
            return Err(HandshakeError::Decode("session_id longer than 32 bytes"));
        }
        let session_id = session_id.to_vec();

        let cookie = if is_dtls { Some(r.read_u8_prefixed_bytes()?.to_vec()) } else { None };

        let mut suite_list = r.read_u16_prefixed()?;
        if suite_list.is_empty() {
            return Err(HandshakeError::Decode("empty cipher_suites list"));
        }
        let mut cipher_suites = Vec::new();
        while !suite_list.is_empty() {
            cipher_suites.push(suite_list.read_u16()?);
        }

        let compression_methods = r.read_u8_prefixed_bytes()?;
        if compression_methods.is_empty() || !compression_methods.contains(&0) {
            return Err(HandshakeError::Decode("compression_methods must include null (0)"));
        }
        let compression_methods = compression_methods.to_vec();

        // The extensions block is optional: a ClientHello with nothing
        // left after compression_methods simply has no extensions.
        let extensions = if r.is_empty() {
            ParsedExtensions::default()
        } else {
            let ext_body = r.read_u16_prefixed_bytes()?;
            ParsedExtensions::parse(ext_body)?
        };
        r.assert_exhausted()?;

        Ok(ClientHello { client_version, random, session_id, cookie, cipher_suites, compression_methods, extensions })
    }
}

/// `spec.md` §4.4 "Cipher selection": "intersect the client's list with
/// the server's configured list under either client or server preference
/// (option-controlled)."
pub fn select_cipher_suite(
    offered: &[u16],
    configured: &[&'static CipherSuite],
    server_preference: bool,
) -> Option<&'static CipherSuite> {
    if server_preference {
        configured.iter().copied().find(|s| offered.contains(&s.id))
    } else {
        offered.iter().find_map(|id| configured.iter().copied().find(|s| s.id == *id))
    }
}
