// src/signing.rs

//! Ed25519 signing and verification.
//!
//! Signatures are deterministic (RFC 8032): the nonce is derived from the
//! private key and the message, so signing the same message twice with the
//! same key yields byte-identical output. Verification uses the strict
//! equation and returns `false` for any malformed input instead of failing.

use crate::keys::PrivateKey;
use crate::SIGNATURE_LENGTH;
use ed25519_dalek::{Signature, Signer, VerifyingKey};

/// Signs a message
///
/// Accepts anything that owns a private key: a [`PrivateKey`], a
/// [`crate::KeyPair`] or a [`crate::PrivateKeyAccount`].
///
/// # Arguments
/// * `message` - Data to sign
/// * `key` - Signing key holder
///
/// # Returns
/// `SIGNATURE_LENGTH` signature bytes
///
/// # Example
/// ```
/// use keel_crypto::keys::generate_keypair;
/// use keel_crypto::signing::{sign, verify};
///
/// let keypair = generate_keypair();
/// let signature = sign(b"message", &keypair);
/// assert!(verify(b"message", &signature, keypair.public_key.as_bytes()));
/// ```
pub fn sign<K: AsRef<PrivateKey>>(message: &[u8], key: &K) -> [u8; SIGNATURE_LENGTH] {
    let signing_key = key.as_ref().signing_key();
    signing_key.sign(message).to_bytes()
}

/// Verifies a signature against a message and raw public key bytes
///
/// # Returns
/// `true` only for a well-formed signature produced by the matching private
/// key over exactly this message. Wrong lengths, invalid keys and tampered
/// signatures all yield `false`.
pub fn verify(message: &[u8], signature: &[u8], public_key: &[u8]) -> bool {
    let Ok(signature_bytes) = <[u8; SIGNATURE_LENGTH]>::try_from(signature) else {
        return false;
    };
    let Ok(key_bytes) = <[u8; 32]>::try_from(public_key) else {
        return false;
    };
    let Ok(verifying_key) = VerifyingKey::from_bytes(&key_bytes) else {
        return false;
    };

    let signature = Signature::from_bytes(&signature_bytes);
    verifying_key.verify_strict(message, &signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{generate_keypair, generate_keypair_from_seed};
    use crate::account::PrivateKeyAccount;

    #[test]
    fn test_sign_and_verify() {
        let kp = generate_keypair();
        let data = b"test message";

        let signature = sign(data, &kp);
        assert_eq!(signature.len(), SIGNATURE_LENGTH);
        assert!(verify(data, &signature, kp.public_key.as_bytes()));
        assert!(kp.public_key.verify(data, &signature));
    }

    #[test]
    fn test_sign_with_raw_private_key_and_account() {
        let kp = generate_keypair();
        let account = PrivateKeyAccount::new(kp.clone());

        let from_key = sign(b"m", kp.private_key());
        let from_account = sign(b"m", &account);
        assert_eq!(from_key, from_account);
    }

    #[test]
    fn test_verify_wrong_data() {
        let kp = generate_keypair();
        let signature = sign(b"original message", &kp);
        assert!(!verify(b"wrong message", &signature, kp.public_key.as_bytes()));
    }

    #[test]
    fn test_verify_wrong_key() {
        let kp1 = generate_keypair();
        let kp2 = generate_keypair();
        let signature = sign(b"message", &kp1);
        assert!(!verify(b"message", &signature, kp2.public_key.as_bytes()));
    }

    #[test]
    fn test_verify_malformed_inputs() {
        let kp = generate_keypair();
        let signature = sign(b"test", &kp);

        assert!(!verify(b"test", &signature[..63], kp.public_key.as_bytes()));
        assert!(!verify(b"test", &[0u8; 100], kp.public_key.as_bytes()));
        assert!(!verify(b"test", &signature, &[0u8; 5]));
        assert!(!verify(b"test", &signature, &[0xFFu8; 32]));
        assert!(!verify(b"test", &[], &[]));
    }

    #[test]
    fn test_single_bit_flips_rejected() {
        let kp = generate_keypair();
        let data = b"bit flip";
        let signature = sign(data, &kp);

        for byte in 0..SIGNATURE_LENGTH {
            for bit in 0..8 {
                let mut flipped = signature;
                flipped[byte] ^= 1 << bit;
                assert!(
                    !verify(data, &flipped, kp.public_key.as_bytes()),
                    "byte {} bit {}",
                    byte,
                    bit
                );
            }
        }
    }

    #[test]
    fn test_signature_deterministic() {
        let kp = generate_keypair_from_seed(&[99u8; 32]);
        let data = b"deterministic test";
        assert_eq!(sign(data, &kp), sign(data, &kp));
    }
}
