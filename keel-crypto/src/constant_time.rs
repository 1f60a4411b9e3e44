// src/constant_time.rs

//! Constant-time comparison.
//!
//! Used wherever a secret (MAC, signature, password-derived key) is compared
//! with a value an attacker controls. Running time depends only on the longer
//! of the two lengths, never on where the inputs first differ.

use subtle::{Choice, ConstantTimeEq};

/// Constant-time equality of byte slices
///
/// Returns `true` exactly when `a == b`. Inputs of different length are
/// scanned in full before the result is produced.
///
/// # Example
/// ```
/// use keel_crypto::safe_is_equal;
///
/// assert!(safe_is_equal(b"tag", b"tag"));
/// assert!(!safe_is_equal(b"tag", b"tags"));
/// ```
#[must_use]
#[inline(never)]
pub fn safe_is_equal(a: &[u8], b: &[u8]) -> bool {
    let len_eq = (a.len() as u64).ct_eq(&(b.len() as u64));

    let longest = a.len().max(b.len());
    let mut diff = 0u8;
    for i in 0..longest {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        diff |= x ^ y;
    }

    let content_eq: Choice = diff.ct_eq(&0u8);
    (len_eq & content_eq).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_equal() {
        assert!(safe_is_equal(b"same bytes", b"same bytes"));
        assert!(safe_is_equal(b"", b""));
    }

    #[test]
    fn test_different_content() {
        assert!(!safe_is_equal(b"abcd", b"abce"));
        assert!(!safe_is_equal(b"xbcd", b"abcd"));
    }

    #[test]
    fn test_prefix_is_not_equal() {
        // Trailing zeros must not be mistaken for padding
        assert!(!safe_is_equal(b"abc", b"abc\0"));
        assert!(!safe_is_equal(b"", b"\0"));
    }

    proptest! {
        #[test]
        fn prop_matches_eq(a in proptest::collection::vec(any::<u8>(), 0..64),
                           b in proptest::collection::vec(any::<u8>(), 0..64)) {
            prop_assert_eq!(safe_is_equal(&a, &b), a == b);
        }

        #[test]
        fn prop_reflexive(a in proptest::collection::vec(any::<u8>(), 0..128)) {
            prop_assert!(safe_is_equal(&a, &a.clone()));
        }
    }
}
