// src/keys.rs

//! Ed25519 key material and key-pair generation.
//!
//! A private key is the 32-byte Ed25519 seed. The same key serves both for
//! signing and, through its expanded scalar, for Curve25519 key agreement
//! in the envelope engine. Private keys are zeroized on drop, print as
//! `[REDACTED]` and compare in constant time.

use crate::constant_time::safe_is_equal;
use crate::errors::{CryptoError, Result};
use crate::{random, KEY_LENGTH};
use curve25519_dalek::{edwards::CompressedEdwardsY, edwards::EdwardsPoint, scalar::Scalar};
use ed25519_dalek::SigningKey;
use rand::rngs::StdRng;
use rand::{CryptoRng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Private key (Ed25519 seed), zeroized on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    bytes: [u8; KEY_LENGTH],
}

impl PrivateKey {
    /// Builds a private key from raw bytes
    ///
    /// # Errors
    /// `InvalidKey` if `bytes` is not exactly `KEY_LENGTH` long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != KEY_LENGTH {
            return Err(CryptoError::InvalidKey(
                format!("Invalid private key size: expected {}, got {}", KEY_LENGTH, bytes.len())
            ));
        }

        let mut key = [0u8; KEY_LENGTH];
        key.copy_from_slice(bytes);
        Ok(Self { bytes: key })
    }

    /// Raw seed bytes
    ///
    /// Callers must not log or persist these without sealing them first.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.bytes
    }

    /// Derives the matching public key
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key().verifying_key().to_bytes())
    }

    pub(crate) fn signing_key(&self) -> SigningKey {
        SigningKey::from_bytes(&self.bytes)
    }

    /// Clamped secret scalar, identical to the one behind the Ed25519 public key
    pub(crate) fn agreement_scalar(&self) -> Scalar {
        let mut expanded = Sha512::digest(self.bytes);
        let mut scalar_bytes = Zeroizing::new([0u8; 32]);
        scalar_bytes.copy_from_slice(&expanded[..32]);
        expanded.as_mut_slice().zeroize();
        scalar_bytes[0] &= 248;
        scalar_bytes[31] &= 127;
        scalar_bytes[31] |= 64;
        Scalar::from_bytes_mod_order(*scalar_bytes)
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        safe_is_equal(&self.bytes, &other.bytes)
    }
}

impl Eq for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey([REDACTED])")
    }
}

impl AsRef<PrivateKey> for PrivateKey {
    fn as_ref(&self) -> &PrivateKey {
        self
    }
}

/// Ed25519 public key (compressed Edwards point)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PublicKey([u8; KEY_LENGTH]);

impl PublicKey {
    /// Builds a public key from raw bytes
    ///
    /// # Errors
    /// `InvalidKey` for a wrong length, bytes that are not a curve point, or
    /// a small-order point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != KEY_LENGTH {
            return Err(CryptoError::InvalidKey(
                format!("Invalid public key size: expected {}, got {}", KEY_LENGTH, bytes.len())
            ));
        }

        let mut key = [0u8; KEY_LENGTH];
        key.copy_from_slice(bytes);
        let public = PublicKey(key);
        public.edwards_point()?;
        Ok(public)
    }

    /// Parses a Base58 encoded public key
    pub fn from_base58(s: &str) -> Result<Self> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| CryptoError::InvalidKey(format!("Base58 decode failed: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Raw key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }

    /// Base58 text form
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }

    /// Verifies `signature` over `message` with this key
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        crate::signing::verify(message, signature, &self.0)
    }

    pub(crate) fn edwards_point(&self) -> Result<EdwardsPoint> {
        let point = CompressedEdwardsY(self.0)
            .decompress()
            .ok_or_else(|| CryptoError::InvalidKey("Public key is not a curve point".to_string()))?;

        if point.is_small_order() {
            return Err(CryptoError::InvalidKey("Public key has small order".to_string()));
        }

        Ok(point)
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_base58())
    }
}

/// Long-term key pair
///
/// The public key is always derived from the private key, so the two can
/// never disagree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPair {
    /// Public key
    pub public_key: PublicKey,

    /// Private key, zeroized on drop
    private_key_inner: PrivateKey,
}

impl KeyPair {
    /// Rebuilds a key pair from its private half
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        Self {
            public_key: private_key.public_key(),
            private_key_inner: private_key,
        }
    }

    /// Get reference to the private key
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key_inner
    }
}

impl AsRef<PrivateKey> for KeyPair {
    fn as_ref(&self) -> &PrivateKey {
        &self.private_key_inner
    }
}

/// Ephemeral key pair for per-message agreement
///
/// Deliberately not serializable and not accepted by the key store.
#[derive(Debug)]
pub struct SessionKeyPair {
    inner: KeyPair,
}

impl SessionKeyPair {
    /// Public half
    pub fn public_key(&self) -> &PublicKey {
        &self.inner.public_key
    }

    /// Private half
    pub fn private_key(&self) -> &PrivateKey {
        self.inner.private_key()
    }
}

impl AsRef<PrivateKey> for SessionKeyPair {
    fn as_ref(&self) -> &PrivateKey {
        self.inner.private_key()
    }
}

/// Generates a key pair from the process-wide CSPRNG
///
/// # Panics
/// Panics if the OS entropy source fails.
///
/// # Example
/// ```
/// use keel_crypto::keys::generate_keypair;
///
/// let keypair = generate_keypair();
/// assert_eq!(keypair.private_key().as_bytes().len(), keel_crypto::KEY_LENGTH);
/// ```
pub fn generate_keypair() -> KeyPair {
    let mut rng = random::rng();
    generate_keypair_with_rng(&mut rng)
}

/// Generates a short-lived key pair for a single exchange
pub fn generate_session_keypair() -> SessionKeyPair {
    SessionKeyPair { inner: generate_keypair() }
}

/// Generates a keypair from a deterministic seed
///
/// Useful for testing and deterministic key derivation.
///
/// # Example
/// ```
/// use keel_crypto::keys::generate_keypair_from_seed;
///
/// let seed = [42u8; 32];
/// let keypair1 = generate_keypair_from_seed(&seed);
/// let keypair2 = generate_keypair_from_seed(&seed);
/// assert_eq!(keypair1.public_key, keypair2.public_key);
/// ```
pub fn generate_keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    let mut rng = StdRng::from_seed(*seed);
    generate_keypair_with_rng(&mut rng)
}

/// Internal keypair generation with custom RNG
fn generate_keypair_with_rng<R: RngCore + CryptoRng>(rng: &mut R) -> KeyPair {
    let mut bytes = [0u8; KEY_LENGTH];
    rng.fill_bytes(&mut bytes);
    let private_key = PrivateKey { bytes };
    bytes.zeroize();
    KeyPair::from_private_key(private_key)
}
