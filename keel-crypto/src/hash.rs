// src/hash.rs

//! Hash functions for the Keel protocol.
//!
//! Two fixed-size digests are provided:
//! - `secure_hash`: Keccak-256 applied to the BLAKE3 digest of the input.
//!   Used for addresses, checksums and anything a security decision rests on.
//! - `fast_hash`: plain BLAKE3. Used for indexing and deduplication only.
//!
//! Text input is hashed as its UTF-8 bytes, so `secure_hash("abc")` equals
//! `secure_hash(b"abc")`.

use crate::constant_time::safe_is_equal;
use crate::errors::{CryptoError, Result};
use crate::DIGEST_SIZE;
use sha3::{Digest, Keccak256};

/// Computes the collision-resistant digest of input data
///
/// # Arguments
/// * `data` - Bytes or text to hash
///
/// # Returns
/// 32-byte digest
///
/// # Example
/// ```
/// use keel_crypto::hash::secure_hash;
///
/// assert_eq!(secure_hash("Hello Keel"), secure_hash(b"Hello Keel"));
/// ```
pub fn secure_hash<T: AsRef<[u8]>>(data: T) -> [u8; DIGEST_SIZE] {
    keccak_hash(&fast_hash(data))
}

/// Computes the BLAKE3 digest of input data
///
/// Not for security decisions; see [`secure_hash`].
pub fn fast_hash<T: AsRef<[u8]>>(data: T) -> [u8; DIGEST_SIZE] {
    let hash = blake3::hash(data.as_ref());
    let mut out = [0u8; DIGEST_SIZE];
    out.copy_from_slice(&hash.as_bytes()[..DIGEST_SIZE]);
    out
}

/// Computes Keccak-256 hash of input data
pub fn keccak_hash(data: &[u8]) -> [u8; DIGEST_SIZE] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut out = [0u8; DIGEST_SIZE];
    out.copy_from_slice(&result[..DIGEST_SIZE]);
    out
}

/// Computes a keyed MAC (BLAKE3 keyed mode)
pub fn mac(key: &[u8; DIGEST_SIZE], data: &[u8]) -> [u8; DIGEST_SIZE] {
    *blake3::keyed_hash(key, data).as_bytes()
}

/// Verifies a MAC in constant time
pub fn verify_mac(key: &[u8; DIGEST_SIZE], data: &[u8], tag: &[u8]) -> bool {
    safe_is_equal(&mac(key, data), tag)
}

/// Converts a digest to hexadecimal string
pub fn hash_to_hex(hash: &[u8; DIGEST_SIZE]) -> String {
    hex::encode(hash)
}

/// Parses hexadecimal string to digest
///
/// # Arguments
/// * `hex_str` - 64-character hexadecimal string
pub fn hex_to_hash(hex_str: &str) -> Result<[u8; DIGEST_SIZE]> {
    if hex_str.len() != DIGEST_SIZE * 2 {
        return Err(CryptoError::InvalidInput(
            format!("Invalid hex length: expected {}, got {}", DIGEST_SIZE * 2, hex_str.len())
        ));
    }

    let bytes = hex::decode(hex_str)
        .map_err(|e| CryptoError::InvalidInput(format!("Hex decode failed: {}", e)))?;

    let mut hash = [0u8; DIGEST_SIZE];
    hash.copy_from_slice(&bytes);
    Ok(hash)
}
