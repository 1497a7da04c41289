//! `spec.md` §4.4 "full handshake continues": Certificate, CertificateRequest,
//! and CertificateVerify message bodies. ASN.1/X.509 parsing is explicitly
//! out of scope (`spec.md` §1), so every certificate here is an opaque DER
//! blob; this module only owns the TLS framing around those blobs and the
//! signature glue that ties a transcript digest to `primitives::sigkey`.

use primitives::{HashAlgorithm, LegacyMd5Sha1, PeerVerifyKey, ServerSigningKey, SignatureScheme, VerifyError};
use wire::{Reader, Writer};

use handshake::{HandshakeError, Result};

/// RFC 5246 §7.4.4 `ClientCertificateType` wire values for the three
/// schemes this workspace's `SignatureScheme` enum covers.
fn client_cert_type(scheme: SignatureScheme) -> u8 {
    match scheme {
        SignatureScheme::Rsa => 1,
        SignatureScheme::Dsa => 2,
        SignatureScheme::Ecdsa => 64,
    }
}

/// `Certificate` message body: a 3-byte-length-prefixed list of
/// 3-byte-length-prefixed DER certificates, leaf first.
pub fn build_certificate_body(chain: &[Vec<u8>]) -> Vec<u8> {
    let mut w = Writer::new();
    {
        let mut list = w.begin_u24();
        for cert in chain {
            list.begin_u24().put_bytes(cert);
        }
    }
    w.finish()
}

/// Inverse of [`build_certificate_body`]; used to parse the client's
/// `Certificate` message when client authentication is requested. An
/// empty list is valid (RFC 5246 §7.4.6: the client may decline).
pub fn parse_certificate_body(body: &[u8]) -> Result<Vec<Vec<u8>>> {
    let mut r = Reader::new(body);
    let mut list = r.read_u24_prefixed()?;
    r.assert_exhausted()?;
    let mut chain = Vec::new();
    while !list.is_empty() {
        chain.push(list.read_u24_prefixed_bytes()?.to_vec());
    }
    Ok(chain)
}

/// `CertificateRequest` body (RFC 5246 §7.4.4): certificate_types,
/// TLS 1.2's `supported_signature_algorithms`, and certificate_authorities
/// (always empty here — distinguished-name matching belongs to the
/// out-of-scope X.509 layer, not this engine).
pub fn build_certificate_request_body(cert_types: &[SignatureScheme], tls12_sigalgs: Option<&[(u8, u8)]>) -> Vec<u8> {
    let mut w = Writer::new();
    {
        let mut types = w.begin_u8();
        for scheme in cert_types {
            types.put_u8(client_cert_type(*scheme));
        }
    }
    if let Some(sigalgs) = tls12_sigalgs {
        let mut list = w.begin_u16();
        for (hash, sig) in sigalgs {
            list.put_u8(*hash);
            list.put_u8(*sig);
        }
    }
    w.begin_u16(); // certificate_authorities: empty
    w.finish()
}

/// Parsed `CertificateVerify` body: the (hash, signature) scheme byte pair
/// TLS 1.2 prefixes the signature with (`None` pre-1.2, where the scheme
/// is implied by the certificate type instead), plus the raw signature.
pub struct ParsedCertificateVerify {
    pub sigalg: Option<(u8, u8)>,
    pub signature: Vec<u8>,
}

pub fn parse_certificate_verify_body(body: &[u8], is_tls12: bool) -> Result<ParsedCertificateVerify> {
    let mut r = Reader::new(body);
    let sigalg = if is_tls12 {
        let hash = r.read_u8()?;
        let sig = r.read_u8()?;
        Some((hash, sig))
    } else {
        None
    };
    let signature = r.read_u16_prefixed_bytes()?.to_vec();
    r.assert_exhausted()?;
    Ok(ParsedCertificateVerify { sigalg, signature })
}

/// `spec.md` §4.4 "Signing of ServerKeyExchange": builds the
/// `(hash, sig) ‖ u16-length signature` suffix appended after a
/// ServerKeyExchange's params, signing `client_random ‖ server_random ‖
/// params_body`.
pub fn sign_server_key_exchange(
    key: &dyn ServerSigningKey,
    is_tls12: bool,
    client_sigalgs: Option<&[(u8, u8)]>,
    message: &[u8],
) -> Result<Vec<u8>> {
    let mut w = Writer::new();
    if is_tls12 {
        let hash = select_signing_hash(key, client_sigalgs)?;
        w.put_u8(hash.wire_id());
        w.put_u8(key.scheme().wire_id());
        let digest = hash.digest(message);
        let signature = key.sign(hash, &digest).map_err(|_| HandshakeError::Crypto("server key exchange signing failed"))?;
        w.begin_u16().put_bytes(&signature);
    } else {
        let (hash, digest) = legacy_digest(key.scheme(), message);
        let signature = key.sign(hash, &digest).map_err(|_| HandshakeError::Crypto("server key exchange signing failed"))?;
        w.begin_u16().put_bytes(&signature);
    }
    Ok(w.finish())
}

/// `spec.md` §4.4: "The hash is chosen from the client's sigalgs list
/// intersected with the key's capabilities, with the certificate's digest
/// preference as tie-break." Absent a client list (TLS 1.2 without
/// `signature_algorithms` is a decode error in strict implementations, but
/// some clients omit it anyway) the key's own preference is used.
fn select_signing_hash(key: &dyn ServerSigningKey, client_sigalgs: Option<&[(u8, u8)]>) -> Result<HashAlgorithm> {
    let wanted_sig = key.scheme().wire_id();
    match client_sigalgs {
        None => Ok(key.preferred_hash()),
        Some(list) => {
            for (hash_id, sig_id) in list {
                if *sig_id != wanted_sig {
                    continue;
                }
                if let Some(hash) = HashAlgorithm::from_wire_id(*hash_id) {
                    if key.supported_hashes().contains(&hash) {
                        return Ok(hash);
                    }
                }
            }
            Err(HandshakeError::Policy("no mutually supported signature_algorithms entry"))
        }
    }
}

/// RFC 5246 §4.7/§7.4.8 pre-1.2 digest: MD5‖SHA-1 for RSA, plain SHA-1 for
/// DSA/ECDSA. `HashAlgorithm::Md5` is this workspace's convention (see
/// `primitives::sigkey`) for "the 36-byte concatenation, no hash OID".
fn legacy_digest(scheme: SignatureScheme, message: &[u8]) -> (HashAlgorithm, Vec<u8>) {
    match scheme {
        SignatureScheme::Rsa => {
            let mut ctx = LegacyMd5Sha1::new();
            ctx.update(message);
            (HashAlgorithm::Md5, ctx.finalize().to_vec())
        }
        SignatureScheme::Dsa | SignatureScheme::Ecdsa => (HashAlgorithm::Sha1, HashAlgorithm::Sha1.digest(message)),
    }
}

/// Verifies the client's `CertificateVerify` signature over the buffered
/// transcript (everything up to, but not including, `CertificateVerify`
/// itself), per `spec.md` §4.4 "CertificateVerify".
pub fn verify_certificate_verify(
    peer_key: &dyn PeerVerifyKey,
    is_tls12: bool,
    parsed: &ParsedCertificateVerify,
    transcript: &[u8],
) -> std::result::Result<(), VerifyError> {
    if is_tls12 {
        let (hash_id, sig_id) = parsed.sigalg.ok_or(VerifyError)?;
        if sig_id != peer_key.scheme().wire_id() {
            return Err(VerifyError);
        }
        let hash = HashAlgorithm::from_wire_id(hash_id).ok_or(VerifyError)?;
        let digest = hash.digest(transcript);
        peer_key.verify(hash, &digest, &parsed.signature)
    } else {
        let (hash, digest) = legacy_digest(peer_key.scheme(), transcript);
        peer_key.verify(hash, &digest, &parsed.signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certificate_body_round_trips() {
        let chain = vec![vec![0xAAu8; 10], vec![0xBBu8; 20]];
        let body = build_certificate_body(&chain);
        let parsed = parse_certificate_body(&body).unwrap();
        assert_eq!(parsed, chain);
    }

    #[test]
    fn certificate_request_carries_cert_types_and_sigalgs() {
        let sigalgs = [(4u8, 1u8), (2, 1)];
        let body = build_certificate_request_body(&[SignatureScheme::Rsa, SignatureScheme::Ecdsa], Some(&sigalgs));
        let mut r = Reader::new(&body);
        let types = r.read_u8_prefixed_bytes().unwrap();
        assert_eq!(types, &[1, 64]);
        let mut list = r.read_u16_prefixed().unwrap();
        assert_eq!(list.read_u8().unwrap(), 4);
        assert_eq!(list.read_u8().unwrap(), 1);
    }

    #[test]
    fn certificate_verify_body_parses_tls12_sigalg_prefix() {
        let mut w = Writer::new();
        w.put_u8(4);
        w.put_u8(1);
        w.begin_u16().put_bytes(&[0x11u8; 8]);
        let body = w.finish();
        let parsed = parse_certificate_verify_body(&body, true).unwrap();
        assert_eq!(parsed.sigalg, Some((4, 1)));
        assert_eq!(parsed.signature, vec![0x11u8; 8]);
    }
}
