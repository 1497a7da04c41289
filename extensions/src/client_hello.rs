//! ClientHello extension-block parsing, `spec.md` §4.3.

use std::collections::HashSet;

use wire::Reader;

use crate::error::{ExtensionError, Result};
use crate::types;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureAlgorithm {
    pub hash: u8,
    pub signature: u8,
}

#[derive(Debug, Clone, Default)]
pub struct ParsedExtensions {
    pub server_name: Option<String>,
    pub ec_point_formats: Option<Vec<u8>>,
    pub elliptic_curves: Option<Vec<u16>>,
    /// `None` = extension absent. `Some(body)` = present, `body` empty iff
    /// the client sent no ticket and just wants one issued.
    pub session_ticket: Option<Vec<u8>>,
    pub signature_algorithms: Option<Vec<SignatureAlgorithm>>,
    pub status_request: bool,
    pub next_proto_neg: bool,
    pub alpn_protocols: Option<Vec<Vec<u8>>>,
    /// Raw `renegotiated_connection` body (§6.2: client_verify_data on an
    /// initial handshake is always empty, non-empty on renegotiation).
    pub renegotiation_info: Option<Vec<u8>>,
    pub use_srtp_profiles: Option<Vec<u16>>,
}

impl ParsedExtensions {
    /// Parses the body of the ClientHello extensions block (the bytes
    /// *inside* the outer u16 length, which the caller has already
    /// stripped off while walking the handshake message).
    pub fn parse(body: &[u8]) -> Result<ParsedExtensions> {
        let mut out = ParsedExtensions::default();
        let mut seen: HashSet<u16> = HashSet::new();
        let mut r = Reader::new(body);

        while !r.is_empty() {
            let ext_type = r.read_u16()?;
            let mut ext = r.read_u16_prefixed()?;

            // Unknown extensions are silently ignored, including repeats.
            let recognized = matches!(
                ext_type,
                types::SERVER_NAME
                    | types::STATUS_REQUEST
                    | types::ELLIPTIC_CURVES
                    | types::EC_POINT_FORMATS
                    | types::SIGNATURE_ALGORITHMS
                    | types::USE_SRTP
                    | types::ALPN
                    | types::SESSION_TICKET
                    | types::RENEGOTIATION_INFO
                    | types::NEXT_PROTO_NEG
            );
            if recognized && !seen.insert(ext_type) {
                return Err(ExtensionError::Decode);
            }

            match ext_type {
                types::SERVER_NAME => out.server_name = Some(parse_server_name(&mut ext)?),
                types::STATUS_REQUEST => {
                    // Type byte + responder-id list + extensions; contents
                    // beyond "present" are not consumed by this engine.
                    out.status_request = true;
                }
                types::ELLIPTIC_CURVES => out.elliptic_curves = Some(parse_u16_list(&mut ext)?),
                types::EC_POINT_FORMATS => {
                    out.ec_point_formats = Some(parse_u8_prefixed_list(&mut ext)?)
                }
                types::SESSION_TICKET => out.session_ticket = Some(ext.rest().to_vec()),
                types::SIGNATURE_ALGORITHMS => {
                    out.signature_algorithms = Some(parse_sigalgs(&mut ext)?)
                }
                types::NEXT_PROTO_NEG => out.next_proto_neg = true,
                types::ALPN => out.alpn_protocols = Some(parse_alpn(&mut ext)?),
                types::RENEGOTIATION_INFO => {
                    let body = ext.read_u8_prefixed_bytes()?.to_vec();
                    ext.assert_exhausted()?;
                    out.renegotiation_info = Some(body);
                }
                types::USE_SRTP => out.use_srtp_profiles = Some(parse_use_srtp(&mut ext)?),
                _ => {
                    log::trace!("extensions: ignoring unknown extension type {}", ext_type);
                }
            }
        }

        // §4.3: "if the client also sent both" ALPN and NPN, prefer ALPN
        // silently (spec.md §9 Open Question, preserved as-is).
        if out.alpn_protocols.is_some() {
            out.next_proto_neg = false;
        }

        Ok(out)
    }
}

fn parse_server_name(ext: &mut Reader<'_>) -> Result<String> {
    let mut list = ext.read_u16_prefixed()?;
    let name_type = list.read_u8()?;
    let name = list.read_u16_prefixed_bytes()?;
    if name_type != types::SERVER_NAME_TYPE_HOST_NAME || name.is_empty() || name.len() > 255 {
        return Err(ExtensionError::Decode);
    }
    if name.contains(&0) {
        return Err(ExtensionError::Decode);
    }
    let name = std::str::from_utf8(name).map_err(|_| ExtensionError::Decode)?;
    // Only the first entry is used; remaining entries (if any) are
    // ignored per §4.3 "First entry of type 0 carries ...".
    Ok(name.to_string())
}

fn parse_u16_list(ext: &mut Reader<'_>) -> Result<Vec<u16>> {
    let mut list = ext.read_u16_prefixed()?;
    let mut out = Vec::new();
    while !list.is_empty() {
        out.push(list.read_u16()?);
    }
    Ok(out)
}

fn parse_u8_prefixed_list(ext: &mut Reader<'_>) -> Result<Vec<u8>> {
    let bytes = ext.read_u8_prefixed_bytes()?;
    ext.assert_exhausted()?;
    Ok(bytes.to_vec())
}

fn parse_sigalgs(ext: &mut Reader<'_>) -> Result<Vec<SignatureAlgorithm>> {
    let mut list = ext.read_u16_prefixed()?;
    if list.is_empty() {
        return Err(ExtensionError::Decode);
    }
    let mut out = Vec::new();
    while !list.is_empty() {
        let hash = list.read_u8()?;
        let signature = list.read_u8()?;
        out.push(SignatureAlgorithm { hash, signature });
    }
    Ok(out)
}

fn parse_alpn(ext: &mut Reader<'_>) -> Result<Vec<Vec<u8>>> {
    let mut list = ext.read_u16_prefixed()?;
    let mut out = Vec::new();
    while !list.is_empty() {
        let proto = list.read_u8_prefixed_bytes()?;
        if proto.is_empty() {
            return Err(ExtensionError::Decode);
        }
        out.push(proto.to_vec());
    }
    if out.is_empty() {
        return Err(ExtensionError::Decode);
    }
    Ok(out)
}

fn parse_use_srtp(ext: &mut Reader<'_>) -> Result<Vec<u16>> {
    let mut list = ext.read_u16_prefixed()?;
    if list.is_empty() || list.remaining() % 2 != 0 {
        return Err(ExtensionError::Decode);
    }
    let mut profiles = Vec::new();
    while !list.is_empty() {
        profiles.push(list.read_u16()?);
    }
    // MKI: an opaque u8-prefixed blob follows the profile list; not
    // interpreted beyond consuming it so the cursor is fully exhausted.
    let _mki = ext.read_u8_prefixed_bytes()?;
    ext.assert_exhausted()?;
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wire::Writer;

    fn empty_extension(ty: u16) -> Vec<u8> {
        let mut w = Writer::new();
        w.put_u16(ty);
        w.put_u16(0);
        w.finish()
    }

    fn server_name_extension(name: &[u8]) -> Vec<u8> {
        let mut w = Writer::new();
        w.put_u16(types::SERVER_NAME);
        {
            let mut body = w.begin_u16();
            let mut list = body.begin_u16();
            list.put_u8(0);
            list.begin_u16().put_bytes(name);
        }
        w.finish()
    }

    fn alpn_extension(proto: &[u8]) -> Vec<u8> {
        let mut w = Writer::new();
        w.put_u16(types::ALPN);
        {
            let mut body = w.begin_u16();
            let mut list = body.begin_u16();
            list.begin_u8().put_bytes(proto);
        }
        w.finish()
    }

    #[test]
    fn parses_server_name() {
        let buf = server_name_extension(b"example");
        let parsed = ParsedExtensions::parse(&buf).unwrap();
        assert_eq!(parsed.server_name.as_deref(), Some("example"));
    }

    #[test]
    fn duplicate_recognized_extension_is_decode_error() {
        let mut buf = empty_extension(types::STATUS_REQUEST);
        buf.extend(empty_extension(types::STATUS_REQUEST));
        assert_eq!(ParsedExtensions::parse(&buf), Err(ExtensionError::Decode));
    }

    #[test]
    fn alpn_present_suppresses_npn() {
        let mut buf = empty_extension(types::NEXT_PROTO_NEG);
        buf.extend(alpn_extension(b"h2"));
        let parsed = ParsedExtensions::parse(&buf).unwrap();
        assert!(!parsed.next_proto_neg);
        assert_eq!(parsed.alpn_protocols.unwrap(), vec![b"h2".to_vec()]);
    }

    #[test]
    fn unknown_extension_is_ignored() {
        let mut w = Writer::new();
        w.put_u16(0xABCD);
        w.begin_u16().put_bytes(b"whatever");
        let buf = w.finish();
        let parsed = ParsedExtensions::parse(&buf).unwrap();
        assert!(parsed.server_name.is_none());
    }
}
