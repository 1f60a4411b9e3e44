// src/encryption.rs

//! Symmetric authenticated encryption.
//!
//! AES-256-GCM with a fresh random nonce per call. Output layout is
//! `nonce || ciphertext || tag`. These helpers back the envelope engine and
//! the key store's sealed entries.

use crate::errors::{CryptoError, Result};
use crate::{random, AES_KEY_SIZE, AES_NONCE_SIZE, AES_TAG_SIZE, SESSION_KEY_LENGTH};
use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use zeroize::Zeroizing;

/// Encrypts data using AES-256-GCM
///
/// # Arguments
/// * `plaintext` - Data to encrypt
/// * `key` - 32-byte encryption key
///
/// # Returns
/// Encrypted data (nonce || ciphertext || tag)
///
/// # Example
/// ```
/// use keel_crypto::encryption::{encrypt, decrypt, generate_session_key};
///
/// let key = generate_session_key();
/// let ciphertext = encrypt(b"secret message", &key[..]).unwrap();
/// assert_eq!(decrypt(&ciphertext, &key[..]).unwrap(), b"secret message");
/// ```
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    encrypt_with_aad(plaintext, key, &[])
}

/// Decrypts data encrypted with [`encrypt`]
///
/// Any failure (wrong key, tampering, truncated input) is reported as
/// `DecryptionFailed`; no plaintext is returned unless the tag verifies.
pub fn decrypt(ciphertext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    decrypt_with_aad(ciphertext, key, &[])
}

/// Encrypts with associated data for additional authentication
///
/// # Arguments
/// * `plaintext` - Data to encrypt
/// * `key` - 32-byte encryption key
/// * `associated_data` - Additional data to authenticate (not encrypted)
pub fn encrypt_with_aad(plaintext: &[u8], key: &[u8], associated_data: &[u8]) -> Result<Vec<u8>> {
    let cipher = cipher(key)?;

    let nonce_bytes: [u8; AES_NONCE_SIZE] = random::random_bytes();
    let nonce = Nonce::from_slice(&nonce_bytes);

    let payload = Payload {
        msg: plaintext,
        aad: associated_data,
    };

    let ciphertext = cipher.encrypt(nonce, payload)
        .map_err(|e| CryptoError::EncryptionFailed(format!("AES-GCM: {}", e)))?;

    let mut result = Vec::with_capacity(AES_NONCE_SIZE + ciphertext.len());
    result.extend_from_slice(&nonce_bytes);
    result.extend_from_slice(&ciphertext);

    Ok(result)
}

/// Decrypts with associated data verification
pub fn decrypt_with_aad(ciphertext: &[u8], key: &[u8], associated_data: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.len() < AES_NONCE_SIZE + AES_TAG_SIZE {
        return Err(CryptoError::DecryptionFailed);
    }

    let cipher = cipher(key).map_err(|_| CryptoError::DecryptionFailed)?;
    let nonce = Nonce::from_slice(&ciphertext[..AES_NONCE_SIZE]);

    let payload = Payload {
        msg: &ciphertext[AES_NONCE_SIZE..],
        aad: associated_data,
    };

    cipher.decrypt(nonce, payload)
        .map_err(|_| CryptoError::DecryptionFailed)
}

/// Generates a random 256-bit session key
pub fn generate_session_key() -> Zeroizing<[u8; SESSION_KEY_LENGTH]> {
    Zeroizing::new(random::random_bytes())
}

fn cipher(key: &[u8]) -> Result<Aes256Gcm> {
    if key.len() != AES_KEY_SIZE {
        return Err(CryptoError::InvalidKey(
            format!("Invalid symmetric key size: expected {}, got {}", AES_KEY_SIZE, key.len())
        ));
    }

    Aes256Gcm::new_from_slice(key)
        .map_err(|e| CryptoError::InvalidKey(format!("Failed to create cipher: {}", e)))
}
