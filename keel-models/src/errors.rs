// src/errors.rs

//! Error types for the value models.

use keel_crypto::CryptoError;
use thiserror::Error;

/// Main error type for model construction and parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Address is not valid Base58 or fails structural checks
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Role name is not one of the known roles
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// `MajorityWithOneOf` needs at least one address
    #[error("Validator address list is empty")]
    EmptyAddressList,

    /// Underlying cryptographic failure
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Result type alias for model operations
pub type Result<T> = std::result::Result<T, ModelError>;
