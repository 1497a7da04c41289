//! `spec.md` §6.1: `EcGroup` with point multiplication, point encode/decode
//! (uncompressed, compressed-prime, compressed-char2), affine-X extraction.
//! `spec.md` §4.4 "ECDHE": "only named curves accepted ... ServerKeyExchange
//! has type NAMED_CURVE (0x03), 16-bit curve id, and a length-prefixed
//! uncompressed point ... shared X coordinate becomes the premaster secret".
//!
//! The reference implementation ships P-256 only (the curve scenario A of
//! §8 exercises); additional curves plug in by implementing the same
//! `EcGroup` trait, exactly as `spec.md` §9 calls for per-algorithm types
//! behind a common interface rather than a function-pointer table.

use std::fmt;

use elliptic_curve::sec1::ToEncodedPoint;
use p256::ecdh::diffie_hellman;
use p256::{PublicKey, SecretKey};
use rand_core::{CryptoRng, RngCore};

use crate::rng::Rng;

/// RFC 4492 §5.1.1 `NamedCurve` wire identifiers (the subset this
/// workspace's reference `EcGroup` implementations cover).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedCurve {
    Secp256r1,
    Secp384r1,
    Secp521r1,
}

impl NamedCurve {
    pub fn wire_id(self) -> u16 {
        match self {
            NamedCurve::Secp256r1 => 23,
            NamedCurve::Secp384r1 => 24,
            NamedCurve::Secp521r1 => 25,
        }
    }

    pub fn from_wire_id(id: u16) -> Option<Self> {
        match id {
            23 => Some(NamedCurve::Secp256r1),
            24 => Some(NamedCurve::Secp384r1),
            25 => Some(NamedCurve::Secp521r1),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcdhError {
    InvalidPoint,
    InvalidScalar,
    RngFailed,
}

impl fmt::Display for EcdhError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcdhError::InvalidPoint => write!(f, "ecdh: peer point is not on the curve"),
            EcdhError::InvalidScalar => write!(f, "ecdh: malformed private scalar"),
            EcdhError::RngFailed => write!(f, "ecdh: rng depleted while generating keypair"),
        }
    }
}

impl std::error::Error for EcdhError {}

pub trait EcGroup {
    fn curve(&self) -> NamedCurve;

    /// Generates an ephemeral keypair. Returns `(private_scalar_bytes,
    /// uncompressed_point)`. The private scalar is the caller's
    /// responsibility to zeroize once the handshake no longer needs it
    /// (`spec.md` §5 "Cancellation").
    fn generate_keypair(&self, rng: &mut dyn Rng) -> Result<(Vec<u8>, Vec<u8>), EcdhError>;

    /// Computes the shared secret's affine X coordinate from our private
    /// scalar and the peer's uncompressed point.
    fn compute_shared_x(&self, private_scalar: &[u8], peer_point: &[u8]) -> Result<Vec<u8>, EcdhError>;
}

/// Adapts the workspace's fallible, `fill`-based `Rng` to the
/// `rand_core::RngCore` the `p256`/`elliptic-curve` crates expect.
/// `fill_bytes` panics on depletion because `RngCore` itself is
/// infallible — callers that need the failure surfaced should check
/// `try_fill_bytes` first via `Rng::fill` directly, which
/// `generate_keypair` below does before reaching for `SecretKey::random`.
struct RngAdapter<'a>(&'a mut dyn Rng);

impl<'a> RngCore for RngAdapter<'a> {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.0.fill(&mut buf).expect("rng depleted");
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.0.fill(&mut buf).expect("rng depleted");
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill(dest).expect("rng depleted");
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.0.fill(dest).map_err(|_| rand_core::Error::new(crate::rng::RngError))
    }
}

impl<'a> CryptoRng for RngAdapter<'a> {}

pub struct P256Group;

impl EcGroup for P256Group {
    fn curve(&self) -> NamedCurve {
        NamedCurve::Secp256r1
    }

    fn generate_keypair(&self, rng: &mut dyn Rng) -> Result<(Vec<u8>, Vec<u8>), EcdhError> {
        // Probe the rng once so depletion surfaces as `RngFailed` rather
        // than a panic from deep inside `SecretKey::random`.
        let mut probe = [0u8; 1];
        rng.fill(&mut probe).map_err(|_| EcdhError::RngFailed)?;

        let secret = SecretKey::random(&mut RngAdapter(rng));
        let public = secret.public_key();
        let point = public.to_encoded_point(false);
        Ok((secret.to_bytes().to_vec(), point.as_bytes().to_vec()))
    }

    fn compute_shared_x(&self, private_scalar: &[u8], peer_point: &[u8]) -> Result<Vec<u8>, EcdhError> {
        let secret = SecretKey::from_slice(private_scalar).map_err(|_| EcdhError::InvalidScalar)?;
        let peer = PublicKey::from_sec1_bytes(peer_point).map_err(|_| EcdhError::InvalidPoint)?;
        let shared = diffie_hellman(secret.to_nonzero_scalar(), peer.as_affine());
        Ok(shared.raw_secret_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::OsRng;

    #[test]
    fn both_sides_derive_the_same_shared_x() {
        let group = P256Group;
        let mut rng = OsRng::new();

        let (priv_a, pub_a) = group.generate_keypair(&mut rng).unwrap();
        let (priv_b, pub_b) = group.generate_keypair(&mut rng).unwrap();

        let shared_a = group.compute_shared_x(&priv_a, &pub_b).unwrap();
        let shared_b = group.compute_shared_x(&priv_b, &pub_a).unwrap();
        assert_eq!(shared_a, shared_b);
        assert_eq!(shared_a.len(), 32);
    }

    #[test]
    fn uncompressed_point_is_65_bytes() {
        let group = P256Group;
        let mut rng = OsRng::new();
        let (_, point) = group.generate_keypair(&mut rng).unwrap();
        assert_eq!(point.len(), 65);
        assert_eq!(point[0], 0x04);
    }
}
