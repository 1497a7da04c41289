//! `spec.md` §4.4 "ServerHello emission".

use extensions::ServerHelloExtensions;
use primitives::Rng;
use tls_types::ProtocolVersion;
use wire::Writer;

use crate::error::Result;

/// RFC 8446 §4.1.3's downgrade canary, reused here as the "rollback
/// countermeasure" `spec.md` §4.4 describes: the last 8 bytes of
/// server_random are overwritten with this value whenever the negotiated
/// version is lower than the highest version this server would otherwise
/// offer. Suffix `0x01` marks a downgrade to TLS 1.1 or below from a
/// server whose ceiling is TLS 1.2; this workspace never negotiates TLS
/// 1.3, so the `0x00` ("downgrade from 1.3") suffix never applies.
const DOWNGRADE_CANARY_TLS12_CEILING: [u8; 8] = [0x44, 0x4F, 0x57, 0x4E, 0x47, 0x52, 0x44, 0x01];

/// Builds server_random: GMT Unix seconds in the first 4 bytes followed by
/// 28 cryptographically random bytes, with the rollback canary spliced in
/// over the last 8 bytes when `downgrade` is set.
pub fn make_server_random(rng: &mut dyn Rng, now_unix_secs: u32, downgrade: bool) -> Result<[u8; 32]> {
    let mut random = [0u8; 32];
    random[..4].copy_from_slice(&now_unix_secs.to_be_bytes());
    rng.fill(&mut random[4..])?;
    if downgrade {
        random[24..].copy_from_slice(&DOWNGRADE_CANARY_TLS12_CEILING);
    }
    Ok(random)
}

/// `downgrade` is true when `negotiated < server_max`: the server supports
/// a higher version than the one this handshake settled on.
pub fn is_downgrade(negotiated: ProtocolVersion, server_max: ProtocolVersion) -> bool {
    negotiated != server_max && negotiated.min_with(server_max) == negotiated
}

/// Builds the ServerHello message body (everything after the 1-byte type
/// + 3-byte length handshake header, which `crate::message` adds).
#[allow(clippy::too_many_arguments)]
pub fn build_server_hello_body(
    server_version: ProtocolVersion,
    server_random: &[u8; 32],
    session_id: &[u8],
    cipher_suite_id: u16,
    extensions: &ServerHelloExtensions<'_>,
) -> Vec<u8> {
    let mut w = Writer::new();
    w.put_u16(server_version.wire());
    w.put_bytes(server_random);
    w.begin_u8().put_bytes(session_id);
    w.put_u16(cipher_suite_id);
    w.put_u8(0); // compression_method = null
    extensions.write(&mut w);
    w.finish()
}
