// src/errors.rs

//! Error types for cryptographic operations.
//!
//! Every expected failure (bad alias, bad password, malformed key, failed
//! authentication) is a value of [`CryptoError`]. Decryption failures carry no
//! detail so callers cannot learn which check rejected the input.

use thiserror::Error;

/// Main error type for cryptographic and key store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Invalid key format or size
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Password did not unlock the entry or store
    #[error("Bad password")]
    BadPassword,

    /// No entry under the given alias
    #[error("Alias not found: {0}")]
    AliasNotFound(String),

    /// An entry already exists under the given alias
    #[error("Alias already exists: {0}")]
    AliasExists(String),

    /// Multi-recipient encryption called without recipients
    #[error("Recipient list is empty")]
    EmptyRecipients,

    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed (wrong key, tampered data or malformed envelope)
    #[error("Decryption failed")]
    DecryptionFailed,

    /// Backing store could not be read or written
    #[error("Key store I/O failure: {0}")]
    StoreIoFailure(String),

    /// Settings are missing, unknown or self-contradictory
    #[error("Settings error: {0}")]
    Settings(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for CryptoError {
    fn from(err: bincode::Error) -> Self {
        CryptoError::Serialization(format!("Bincode error: {}", err))
    }
}

/// Result type alias for cryptographic operations
pub type Result<T> = std::result::Result<T, CryptoError>;
