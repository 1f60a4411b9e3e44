// src/lib.rs

//! # Keel Crypto
//!
//! Cryptographic identity primitives for the Keel permissioned ledger.
//!
//! This crate provides:
//!
//! - **Hashing**: `secure_hash` (Keccak-256 over BLAKE3) and `fast_hash` (BLAKE3)
//! - **Keys**: Ed25519 key pairs, session key pairs and account identities
//! - **Signatures**: deterministic Ed25519 signing and panic-free verification
//! - **Envelope Encryption**: AES-256-GCM payloads with per-recipient wrapped session keys
//! - **Addresses**: checksummed Base58 account aliases
//! - **Settings**: process-wide algorithm and length configuration
//!
//! ## Security Properties
//!
//! - **Key hygiene**: private keys are zeroized on drop and never printed
//! - **Constant-time comparison**: secrets are compared with `safe_is_equal`
//! - **No oracles**: decryption failures collapse into one generic error
//!
//! ## Example Usage
//!
//! ```rust
//! use keel_crypto::{envelope, hash, keys, signing};
//!
//! // Hash data
//! let digest = hash::secure_hash(b"Hello Keel");
//! assert_eq!(digest.len(), keel_crypto::DIGEST_SIZE);
//!
//! // Generate a keypair, sign and verify
//! let keypair = keys::generate_keypair();
//! let signature = signing::sign(b"payload", &keypair);
//! assert!(signing::verify(b"payload", &signature, keypair.public_key.as_bytes()));
//!
//! // Encrypt for a recipient
//! let recipient = keys::generate_keypair();
//! let sealed =
//!     envelope::encrypt(b"secret", keypair.private_key(), &recipient.public_key).unwrap();
//! let opened = envelope::decrypt(&sealed, recipient.private_key(), &keypair.public_key).unwrap();
//! assert_eq!(opened, b"secret");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod errors;
pub mod settings;
pub mod random;
pub mod hash;
pub mod constant_time;
pub mod keys;
pub mod signing;
pub mod account;
pub mod encryption;
pub mod envelope;
pub mod address;

// Re-export commonly used types
pub use crate::errors::{CryptoError, Result};
pub use crate::settings::{CryptoAlgorithm, CryptoSettings};
pub use crate::keys::{KeyPair, PrivateKey, PublicKey, SessionKeyPair};
pub use crate::account::{PrivateKeyAccount, PublicKeyAccount};
pub use crate::envelope::{EncryptedForMany, EncryptedForSingle};
pub use crate::constant_time::safe_is_equal;

/// Digest output size (32 bytes / 256 bits)
pub const DIGEST_SIZE: usize = 32;

/// Private and public key size for Ed25519
pub const KEY_LENGTH: usize = 32;

/// Maximum Base58 length of an encoded key
pub const KEY_STRING_LENGTH: usize = 44;

/// Session key size (AES-256 key drawn per message)
pub const SESSION_KEY_LENGTH: usize = 32;

/// Ed25519 signature size
pub const SIGNATURE_LENGTH: usize = 64;

/// AES-256 key size
pub const AES_KEY_SIZE: usize = 32;

/// AES-GCM nonce size
pub const AES_NONCE_SIZE: usize = 12;

/// AES-GCM authentication tag size
pub const AES_TAG_SIZE: usize = 16;

/// Size of a wrapped session key: nonce || encrypted session key || tag
pub const WRAPPED_STRUCTURE_LENGTH: usize = AES_NONCE_SIZE + SESSION_KEY_LENGTH + AES_TAG_SIZE;
