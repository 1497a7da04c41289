//! `spec.md` §9: "every predicate affecting padding, MAC verification, or
//! PMS construction must remain data-independent". `subtle`'s `Choice` is
//! the masking primitive the rest of the workspace builds on instead of
//! hand-rolling one: it is `#[must_use]`, carries no `Debug` impl that
//! could leak a branch, and its `black_box`-style barrier is maintained by
//! people who track compiler behavior for a living.

use subtle::{ConditionallySelectable, ConstantTimeEq};

/// Constant-time byte-slice equality. `false` for mismatched lengths is a
/// length comparison, not a content comparison, so it reveals nothing about
/// the differing content — the callers in this workspace that use this
/// (Finished verification, HMAC verification, session ticket name matching)
/// only ever compare buffers whose length is public to both sides anyway.
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// A byte selected from one of two buffers without a data-dependent branch.
/// Used by the RSA premaster-secret substitution (`spec.md` §4.4 "RSA" key
/// exchange branch): every output byte is chosen from either the decrypted
/// candidate or the synthetic random buffer under the same mask, so no
/// instruction-level branch correlates with decrypt success.
pub fn ct_select(mask_is_a: subtle::Choice, a: u8, b: u8) -> u8 {
    u8::conditional_select(&b, &a, mask_is_a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ct_eq_matches_slice_eq() {
        assert!(ct_eq(b"abc", b"abc"));
        assert!(!ct_eq(b"abc", b"abd"));
        assert!(!ct_eq(b"abc", b"ab"));
    }
}
