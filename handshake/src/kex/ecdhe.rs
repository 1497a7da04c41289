//! `spec.md` §4.4 "ECDHE": "only named curves accepted; the curve is the
//! highest-preference curve in the intersection. ServerKeyExchange has
//! type NAMED_CURVE (0x03), 16-bit curve id, and a length-prefixed
//! uncompressed point. Client sends a length-prefixed point; shared X
//! coordinate becomes the premaster secret."

use primitives::{EcGroup, EcdhError, NamedCurve, Rng};
use wire::{Reader, Writer};

use crate::error::{HandshakeError, Result};

/// RFC 4492 §5.4 `ECCurveType::named_curve`.
const NAMED_CURVE: u8 = 3;

pub struct EcdheKeyExchange {
    curve: NamedCurve,
    private: Vec<u8>,
    public: Vec<u8>,
}

impl EcdheKeyExchange {
    pub fn generate(group: &dyn EcGroup, rng: &mut dyn Rng) -> Result<Self> {
        let (private, public) = group.generate_keypair(rng).map_err(ecdh_to_handshake_error)?;
        Ok(EcdheKeyExchange { curve: group.curve(), private, public })
    }

    /// ServerKeyExchange body: `ECCurveType ‖ NamedCurve ‖
    /// ECPoint(u8-length-prefixed)`, the exact bytes the server also
    /// signs (prefixed by client_random ‖ server_random by the caller).
    pub fn params_body(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.put_u8(NAMED_CURVE);
        w.put_u16(self.curve.wire_id());
        w.begin_u8().put_bytes(&self.public);
        w.finish()
    }

    pub fn shared_x(&self, group: &dyn EcGroup, client_point: &[u8]) -> Result<Vec<u8>> {
        group.compute_shared_x(&self.private, client_point).map_err(ecdh_to_handshake_error)
    }
}

fn ecdh_to_handshake_error(e: EcdhError) -> HandshakeError {
    match e {
        EcdhError::InvalidPoint => HandshakeError::Decode("ecdhe peer point not on curve"),
        EcdhError::InvalidScalar => HandshakeError::Decode("ecdhe malformed private scalar"),
        EcdhError::RngFailed => HandshakeError::Resource("ecdhe keypair generation failed"),
    }
}

/// Picks the highest-preference curve (by `preference` order) present in
/// both `preference` and the client's `elliptic_curves` extension. An
/// absent extension is treated as "no curve offered" — `spec.md` §4.3
/// records whatever the client sent, and this engine does not assume a
/// legacy default the way some implementations do, since "only named
/// curves accepted" (§4.4) reads as requiring an explicit offer.
pub fn select_curve(preference: &[NamedCurve], client_curves: Option<&[u16]>) -> Option<NamedCurve> {
    let offered = client_curves?;
    preference.iter().copied().find(|c| offered.contains(&c.wire_id()))
}

/// Parses a `ClientKeyExchange` body for an ECDHE suite: a single
/// u8-length-prefixed `ECPoint`.
pub fn parse_client_public(body: &[u8]) -> Result<Vec<u8>> {
    let mut r = Reader::new(body);
    let point = r.read_u8_prefixed_bytes()?;
    r.assert_exhausted()?;
    Ok(point.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::{OsRng, P256Group};

    #[test]
    fn server_and_client_agree_on_shared_x() {
        let mut rng = OsRng::new();
        let group = P256Group;
        let server = EcdheKeyExchange::generate(&group, &mut rng).unwrap();
        let (client_priv, client_pub) = group.generate_keypair(&mut rng).unwrap();

        let server_shared = server.shared_x(&group, &client_pub).unwrap();
        let client_shared = group.compute_shared_x(&client_priv, &server.public).unwrap();
        assert_eq!(server_shared, client_shared);
    }

    #[test]
    fn select_curve_picks_first_preferred_that_client_offered() {
        let preference = [NamedCurve::Secp256r1, NamedCurve::Secp384r1];
        let offered = [NamedCurve::Secp384r1.wire_id(), NamedCurve::Secp256r1.wire_id()];
        assert_eq!(select_curve(&preference, Some(&offered)), Some(NamedCurve::Secp256r1));
    }

    #[test]
    fn select_curve_none_when_extension_absent() {
        let preference = [NamedCurve::Secp256r1];
        assert_eq!(select_curve(&preference, None), None);
    }

    #[test]
    fn params_body_has_named_curve_header() {
        let mut rng = OsRng::new();
        let group = P256Group;
        let server = EcdheKeyExchange::generate(&group, &mut rng).unwrap();
        let body = server.params_body();
        assert_eq!(body[0], NAMED_CURVE);
        assert_eq!(u16::from_be_bytes([body[1], body[2]]), NamedCurve::Secp256r1.wire_id());
    }
}
