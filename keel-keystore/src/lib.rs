// src/lib.rs

//! # Keel Keystore
//!
//! Password-protected storage of aliased private keys, key pairs and
//! certificates for the Keel permissioned ledger.
//!
//! This crate provides:
//! - **KeyStore**: in-memory or JSON file-backed store; writes are atomic and
//!   serialized across handles by an advisory lock
//! - **Sealing**: Argon2id password derivation and AES-256-GCM sealing of private keys
//! - **Certificates**: opaque DER certificates and chains kept next to keys
//!
//! ## Example Usage
//!
//! ```rust
//! use keel_keystore::{KdfParams, KeyStore};
//!
//! let kdf = KdfParams { memory_kib: 1024, iterations: 1, parallelism: 1 };
//! let store = KeyStore::in_memory_with("store password", kdf).unwrap();
//!
//! let public_key = store.generate_and_store(None).unwrap();
//! let alias = public_key.to_base58();
//! assert!(store.contains_alias(&alias).unwrap());
//! assert_eq!(store.get_public_key(&alias).unwrap(), public_key);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod entry;
pub mod sealing;
pub mod keystore;

// Re-export commonly used types
pub use crate::entry::{Certificate, EntryKind};
pub use crate::keystore::KeyStore;
pub use crate::sealing::KdfParams;

/// Key store file format version
pub const KEYSTORE_VERSION: u32 = 1;

/// Default key store directory name
pub const KEYSTORE_DIR: &str = ".keel-keystore";

/// Default key store file name
pub const KEYSTORE_FILE: &str = "keystore.json";
