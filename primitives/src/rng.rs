//! `spec.md` §6.1: `Rng::fill(out)` — cryptographically strong randomness,
//! "returns failure on depletion".

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RngError;

impl fmt::Display for RngError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rng: source exhausted")
    }
}

impl std::error::Error for RngError {}

pub trait Rng {
    fn fill(&mut self, out: &mut [u8]) -> Result<(), RngError>;
}

/// Reference implementation backed by the OS CSPRNG via the `rand` crate's
/// `OsRng`. `rand::rngs::OsRng::try_fill_bytes` surfaces depletion/ENOSYS
/// style failures rather than panicking, matching the trait's contract.
pub struct OsRng(rand::rngs::OsRng);

impl OsRng {
    pub fn new() -> Self {
        OsRng(rand::rngs::OsRng)
    }
}

impl Default for OsRng {
    fn default() -> Self {
        Self::new()
    }
}

impl Rng for OsRng {
    fn fill(&mut self, out: &mut [u8]) -> Result<(), RngError> {
        use rand::RngCore;
        self.0.try_fill_bytes(out).map_err(|_| RngError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_rng_fills_requested_length() {
        let mut rng = OsRng::new();
        let mut buf = [0u8; 32];
        rng.fill(&mut buf).unwrap();
        // overwhelmingly unlikely to stay all-zero
        assert!(buf.iter().any(|&b| b != 0));
    }
}
