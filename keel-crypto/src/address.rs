// src/address.rs

//! Checksummed account addresses.
//!
//! Layout of an address before Base58 encoding:
//!
//! ```text
//! [ version (1) ][ chain id (1) ][ secure_hash(public_key)[..hash_length] ][ checksum ]
//! ```
//!
//! The checksum is the first `checksum_length` bytes of `secure_hash` over
//! everything that precedes it.

use crate::errors::{CryptoError, Result};
use crate::hash::secure_hash;
use crate::keys::PublicKey;
use crate::DIGEST_SIZE;
use serde::{Deserialize, Serialize};

/// Default address version byte
pub const DEFAULT_ADDRESS_VERSION: u8 = 1;

/// Default number of public key hash bytes kept in an address
pub const DEFAULT_HASH_LENGTH: usize = 20;

/// Default checksum length
pub const DEFAULT_CHECKSUM_LENGTH: usize = 4;

/// Network parameters that shape an address
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressParams {
    /// Network (chain) identifier byte
    pub chain_id: u8,
    /// Address version byte
    pub address_version: u8,
    /// Number of public key hash bytes
    pub hash_length: usize,
    /// Number of checksum bytes
    pub checksum_length: usize,
}

impl AddressParams {
    /// Default parameters for a chain
    pub fn new(chain_id: u8) -> Self {
        Self {
            chain_id,
            address_version: DEFAULT_ADDRESS_VERSION,
            hash_length: DEFAULT_HASH_LENGTH,
            checksum_length: DEFAULT_CHECKSUM_LENGTH,
        }
    }

    /// Total address length in bytes
    pub fn address_length(&self) -> usize {
        2 + self.hash_length + self.checksum_length
    }

    fn validate(&self) -> Result<()> {
        if self.hash_length > DIGEST_SIZE {
            return Err(CryptoError::InvalidInput(
                format!("Hash length {} exceeds digest size {}", self.hash_length, DIGEST_SIZE)
            ));
        }
        check_checksum_length(self.checksum_length)
    }
}

fn check_checksum_length(checksum_length: usize) -> Result<()> {
    if checksum_length > DIGEST_SIZE {
        return Err(CryptoError::InvalidInput(
            format!("Checksum length {} exceeds digest size {}", checksum_length, DIGEST_SIZE)
        ));
    }
    Ok(())
}

/// Computes the checksum of `without_checksum`
///
/// # Returns
/// Exactly `checksum_length` bytes
///
/// # Example
/// ```
/// use keel_crypto::address::calc_checksum;
///
/// assert_eq!(calc_checksum(b"any length input", 4).unwrap().len(), 4);
/// ```
pub fn calc_checksum(without_checksum: &[u8], checksum_length: usize) -> Result<Vec<u8>> {
    check_checksum_length(checksum_length)?;
    Ok(secure_hash(without_checksum)[..checksum_length].to_vec())
}

/// Builds the raw address bytes for a public key
pub fn address_bytes(public_key: &PublicKey, params: &AddressParams) -> Result<Vec<u8>> {
    params.validate()?;

    let key_hash = secure_hash(public_key.as_bytes());

    let mut bytes = Vec::with_capacity(params.address_length());
    bytes.push(params.address_version);
    bytes.push(params.chain_id);
    bytes.extend_from_slice(&key_hash[..params.hash_length]);

    let checksum = calc_checksum(&bytes, params.checksum_length)?;
    bytes.extend_from_slice(&checksum);
    Ok(bytes)
}

/// Derives the Base58 address (alias) of a public key
pub fn to_alias(public_key: &PublicKey, params: &AddressParams) -> Result<String> {
    let bytes = address_bytes(public_key, params)?;
    Ok(bs58::encode(bytes).into_string())
}

/// Checks a raw address against the parameters
///
/// Validates length, version, chain id and checksum.
pub fn verify_address_bytes(bytes: &[u8], params: &AddressParams) -> Result<()> {
    params.validate()?;

    if bytes.len() != params.address_length() {
        return Err(CryptoError::InvalidInput(format!(
            "Invalid address length: expected {}, got {}",
            params.address_length(),
            bytes.len()
        )));
    }
    if bytes[0] != params.address_version {
        return Err(CryptoError::InvalidInput(format!("Unknown address version: {}", bytes[0])));
    }
    if bytes[1] != params.chain_id {
        return Err(CryptoError::InvalidInput(format!("Address is for chain {}", bytes[1] as char)));
    }

    let split = bytes.len() - params.checksum_length;
    let expected = calc_checksum(&bytes[..split], params.checksum_length)?;
    if expected.as_slice() != &bytes[split..] {
        return Err(CryptoError::InvalidInput("Address checksum mismatch".to_string()));
    }

    Ok(())
}
