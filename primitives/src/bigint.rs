//! `spec.md` §6.1: `BigInt` with modular exponentiation, modular inverse,
//! bytes⇄integer conversions. `spec.md` §4.4 "DHE": "server chooses a DH
//! group ... generates a keypair, sends (p, g, Y_s) ... shared secret is
//! Y_c^x mod p, stripped of leading zero bytes per RFC 5246 §8.1.2."
//!
//! This module only exposes the finite-field Diffie-Hellman operation the
//! handshake engine actually performs; it does not attempt to be a general
//! bignum library (that role belongs to `num-bigint-dig`, which it wraps).

use std::fmt;

use num_bigint_dig::{BigUint, RandBigInt};
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};

use crate::rng::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfdheError {
    RngFailed,
    /// The peer's `Y_c` was `0` or `p-1` or otherwise outside `[2, p-2]`;
    /// `spec.md` does not name this as a distinct failure, but an
    /// unchecked small-subgroup value would let a peer force a
    /// predictable shared secret.
    InvalidPublicValue,
}

impl fmt::Display for FfdheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FfdheError::RngFailed => write!(f, "ffdhe: rng depleted while generating keypair"),
            FfdheError::InvalidPublicValue => write!(f, "ffdhe: peer public value outside [2, p-2]"),
        }
    }
}

impl std::error::Error for FfdheError {}

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

/// A finite-field Diffie-Hellman group, fixed for the lifetime of one
/// key exchange. `p` and `g` are either server-configured (the common
/// case; RFC 7919 groups or a caller-supplied classic group) or supplied
/// by a callback — `spec.md` §4.4 names "auto/manual/callback" group
/// selection, which this workspace models as the caller constructing
/// `DhParams` however it likes before driving the handshake.
pub struct DhParams {
    p: BigUint,
    g: BigUint,
}

impl DhParams {
    pub fn new(p: Vec<u8>, g: Vec<u8>) -> Self {
        DhParams { p: BigUint::from_bytes_be(&p), g: BigUint::from_bytes_be(&g) }
    }

    pub fn p_bytes(&self) -> Vec<u8> {
        self.p.to_bytes_be()
    }

    pub fn g_bytes(&self) -> Vec<u8> {
        self.g.to_bytes_be()
    }

    /// Generates a server keypair: a private exponent `x` drawn uniformly
    /// from `[2, p-2]` and the corresponding public value `g^x mod p`.
    pub fn generate_keypair(&self, rng: &mut dyn Rng) -> Result<(Vec<u8>, Vec<u8>), FfdheError> {
        let mut probe = [0u8; 1];
        rng.fill(&mut probe).map_err(|_| FfdheError::RngFailed)?;

        let mut adapter = RngAdapter(rng);
        let two = BigUint::from(2u8);
        let upper = &self.p - &two;
        let x = adapter.gen_biguint_below(&upper) + &two;
        let y = self.g.modpow(&x, &self.p);
        Ok((x.to_bytes_be(), y.to_bytes_be()))
    }

    /// `spec.md` §4.4: the shared secret `Y_c^x mod p`, "stripped of
    /// leading zero bytes" — `BigUint::to_bytes_be` already omits leading
    /// zero bytes, so no extra trimming step is needed here; this is the
    /// one place the spec's wording maps directly onto the bignum
    /// library's native encoding rather than a bespoke strip loop.
    pub fn shared_secret(&self, our_private: &[u8], peer_public: &[u8]) -> Result<Vec<u8>, FfdheError> {
        let peer_y = BigUint::from_bytes_be(peer_public);
        let two = BigUint::from(2u8);
        let p_minus_two = &self.p - &two;
        if peer_y < two || peer_y > p_minus_two {
            return Err(FfdheError::InvalidPublicValue);
        }
        let x = BigUint::from_bytes_be(our_private);
        let z = peer_y.modpow(&x, &self.p);
        if z.is_zero() {
            return Err(FfdheError::InvalidPublicValue);
        }
        Ok(z.to_bytes_be())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::OsRng;

    // RFC 7919 ffdhe2048 group.
    const FFDHE2048_P: &str = "\
FFFFFFFFFFFFFFFFADF85458A2BB4A9AAFDC5620273D3CF1D8B9C583CE2D3695A9E13641146433FBCC939DCE249B3EF97D2FE363630C75D8F681B202AEC4617AD3DF1ED5D5FD65612433F51F5F066ED0856365553DED1AF3B557135E7F57C935984F0C70E0E68B77E2A689DAF3EFE8721DF158A136ADE73530ACCA4F483A797ABC0AB182B324FB61D108A94BB2C8E3FBB96ADAB760D7F4681D4F42A3DE394DF4AE56EDE76372BB190B07A7C8EE0A6D709E02FCE1CDF7E2ECC03404CD28342F619172FE9CE98583FF8E4F1232EEF28183C3FE3B1B4C6FAD733BB5FCBC2EC22005C58EF1837D1683B2C6F34A26C1B2EFFA886B4238611FCFDCDE355B3B6519035BBC34F4DEF99C023861B46FC9D6E6C9077AD91D2691F7F7EE598CB0FAC186D91CAEFE130985139270B4130C93BC437944F4FD4452E2D74DD364F2E21E71F54BFF5CAE82AB9C9DF69EE86D2BC522363A0DABC521979B0DEADA1DBF9A42D5C4484E0ABCD06BFA53DDEF3C1B20EE3FD59D7C25E41D2B66C62E37FFFFFFFFFFFFFFFF";

    #[test]
    fn ffdhe_keypair_round_trip() {
        let p = hex::decode(FFDHE2048_P).unwrap();
        let g = vec![2u8];
        let params = DhParams::new(p, g);
        let mut rng = OsRng::new();

        let (priv_a, pub_a) = params.generate_keypair(&mut rng).unwrap();
        let (priv_b, pub_b) = params.generate_keypair(&mut rng).unwrap();

        let shared_a = params.shared_secret(&priv_a, &pub_b).unwrap();
        let shared_b = params.shared_secret(&priv_b, &pub_a).unwrap();
        assert_eq!(shared_a, shared_b);
    }

    #[test]
    fn rejects_small_subgroup_public_value() {
        let p = hex::decode(FFDHE2048_P).unwrap();
        let g = vec![2u8];
        let params = DhParams::new(p, g);
        let mut rng = OsRng::new();
        let (priv_a, _) = params.generate_keypair(&mut rng).unwrap();

        assert!(params.shared_secret(&priv_a, &[1u8]).is_err());
        assert!(params.shared_secret(&priv_a, &[0u8]).is_err());
    }
}
