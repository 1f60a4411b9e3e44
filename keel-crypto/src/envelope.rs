// src/envelope.rs

//! Envelope encryption for one or many recipients.
//!
//! ```text
//! session key  = 32 random bytes (fresh per message)
//! encrypted    = AES-256-GCM(session key, data)                  -- computed once
//! shared       = sender scalar x recipient point (Curve25519, Edwards form)
//! wrap key     = HKDF-SHA256(shared, info = label || sender pk || recipient pk)
//! wrapped      = AES-256-GCM(wrap key, session key, aad = secure_hash(encrypted))
//! ```
//!
//! The recipient recomputes the same shared secret from its own scalar and
//! the sender's public point. For many recipients the payload is encrypted
//! exactly once and only the session key is wrapped per recipient.
//!
//! Every decryption failure, whatever the cause, is reported as the single
//! `CryptoError::DecryptionFailed`.

use crate::encryption::{self, generate_session_key};
use crate::errors::{CryptoError, Result};
use crate::hash::secure_hash;
use crate::keys::{PrivateKey, PublicKey};
use crate::{SESSION_KEY_LENGTH, WRAPPED_STRUCTURE_LENGTH};
use hkdf::Hkdf;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::collections::BTreeMap;
use tracing::debug;
use zeroize::Zeroizing;

/// HKDF salt for session key wrapping
const WRAP_SALT: &[u8] = b"keel-envelope-v1";

/// HKDF info label for session key wrapping
const WRAP_INFO: &[u8] = b"keel-session-key-wrap";

/// Data encrypted for exactly one recipient
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedForSingle {
    /// nonce || ciphertext || tag under the session key
    pub encrypted_data: Vec<u8>,

    /// nonce || wrapped session key || tag under the agreement key
    pub wrapped_structure: Vec<u8>,
}

impl EncryptedForSingle {
    /// Serializes the envelope for transport
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Parses an envelope produced by [`EncryptedForSingle::to_bytes`]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Data encrypted once, with the session key wrapped per recipient
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedForMany {
    /// nonce || ciphertext || tag under the shared session key
    pub encrypted_data: Vec<u8>,

    /// Wrapped session key per recipient
    pub recipient_to_wrapped_structure: BTreeMap<PublicKey, Vec<u8>>,
}

impl EncryptedForMany {
    /// Recipients able to open this envelope
    pub fn recipients(&self) -> impl Iterator<Item = &PublicKey> {
        self.recipient_to_wrapped_structure.keys()
    }

    /// Extracts the single-recipient view for one recipient
    pub fn for_recipient(&self, recipient: &PublicKey) -> Option<EncryptedForSingle> {
        self.recipient_to_wrapped_structure
            .get(recipient)
            .map(|wrapped| EncryptedForSingle {
                encrypted_data: self.encrypted_data.clone(),
                wrapped_structure: wrapped.clone(),
            })
    }

    /// Serializes the envelope for transport
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Parses an envelope produced by [`EncryptedForMany::to_bytes`]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Encrypts data for a single recipient
///
/// # Errors
/// `InvalidKey` if the recipient key is not a usable curve point,
/// `EncryptionFailed` if the cipher fails.
pub fn encrypt(
    data: &[u8],
    sender_private_key: &PrivateKey,
    recipient_public_key: &PublicKey,
) -> Result<EncryptedForSingle> {
    recipient_public_key.edwards_point()?;

    let session_key = generate_session_key();
    let encrypted_data = seal_payload(data, &session_key)?;
    let wrapped_structure = wrap_session_key(
        &session_key,
        &encrypted_data,
        sender_private_key,
        recipient_public_key,
    )?;

    debug!(size = data.len(), "encrypted payload for single recipient");
    Ok(EncryptedForSingle { encrypted_data, wrapped_structure })
}

/// Encrypts data once for several recipients
///
/// Duplicate recipients collapse into one entry.
///
/// # Errors
/// `EmptyRecipients` for an empty list, `InvalidKey` if any recipient key is
/// unusable (checked before anything is encrypted).
pub fn encrypt_for_many(
    data: &[u8],
    sender_private_key: &PrivateKey,
    recipient_public_keys: &[PublicKey],
) -> Result<EncryptedForMany> {
    if recipient_public_keys.is_empty() {
        return Err(CryptoError::EmptyRecipients);
    }
    for recipient in recipient_public_keys {
        recipient.edwards_point()?;
    }

    let session_key = generate_session_key();
    let encrypted_data = seal_payload(data, &session_key)?;

    let mut recipient_to_wrapped_structure = BTreeMap::new();
    for recipient in recipient_public_keys {
        if recipient_to_wrapped_structure.contains_key(recipient) {
            continue;
        }
        let wrapped =
            wrap_session_key(&session_key, &encrypted_data, sender_private_key, recipient)?;
        recipient_to_wrapped_structure.insert(*recipient, wrapped);
    }

    debug!(
        size = data.len(),
        recipients = recipient_to_wrapped_structure.len(),
        "encrypted payload for many recipients"
    );
    Ok(EncryptedForMany { encrypted_data, recipient_to_wrapped_structure })
}

/// Decrypts a single-recipient envelope
///
/// # Errors
/// `DecryptionFailed` for every failure: wrong keys, tampering, malformed
/// envelope.
pub fn decrypt(
    encrypted: &EncryptedForSingle,
    recipient_private_key: &PrivateKey,
    sender_public_key: &PublicKey,
) -> Result<Vec<u8>> {
    if encrypted.wrapped_structure.len() != WRAPPED_STRUCTURE_LENGTH {
        return Err(CryptoError::DecryptionFailed);
    }

    let recipient_public_key = recipient_private_key.public_key();
    let wrap_key = derive_wrap_key(
        recipient_private_key,
        sender_public_key,
        sender_public_key,
        &recipient_public_key,
    )
    .map_err(|_| CryptoError::DecryptionFailed)?;

    let session_key = Zeroizing::new(encryption::decrypt_with_aad(
        &encrypted.wrapped_structure,
        &wrap_key[..],
        &secure_hash(&encrypted.encrypted_data),
    )?);
    if session_key.len() != SESSION_KEY_LENGTH {
        return Err(CryptoError::DecryptionFailed);
    }

    encryption::decrypt(&encrypted.encrypted_data, &session_key)
}

/// Decrypts a multi-recipient envelope with one recipient's key
///
/// # Errors
/// `DecryptionFailed` if the key is not among the recipients or any check
/// fails.
pub fn decrypt_for_many(
    encrypted: &EncryptedForMany,
    recipient_private_key: &PrivateKey,
    sender_public_key: &PublicKey,
) -> Result<Vec<u8>> {
    let recipient_public_key = recipient_private_key.public_key();
    let single = encrypted
        .for_recipient(&recipient_public_key)
        .ok_or(CryptoError::DecryptionFailed)?;
    decrypt(&single, recipient_private_key, sender_public_key)
}

fn seal_payload(data: &[u8], session_key: &[u8; SESSION_KEY_LENGTH]) -> Result<Vec<u8>> {
    encryption::encrypt(data, session_key)
        .map_err(|e| CryptoError::EncryptionFailed(format!("payload: {}", e)))
}

fn wrap_session_key(
    session_key: &[u8; SESSION_KEY_LENGTH],
    encrypted_data: &[u8],
    sender_private_key: &PrivateKey,
    recipient_public_key: &PublicKey,
) -> Result<Vec<u8>> {
    let sender_public_key = sender_private_key.public_key();
    let wrap_key = derive_wrap_key(
        sender_private_key,
        recipient_public_key,
        &sender_public_key,
        recipient_public_key,
    )?;

    encryption::encrypt_with_aad(session_key, &wrap_key[..], &secure_hash(encrypted_data))
        .map_err(|e| CryptoError::EncryptionFailed(format!("key wrap: {}", e)))
}

/// Agreement key between `own` and `peer`, bound to the sender/recipient pair
fn derive_wrap_key(
    own_private_key: &PrivateKey,
    peer_public_key: &PublicKey,
    sender_public_key: &PublicKey,
    recipient_public_key: &PublicKey,
) -> Result<Zeroizing<[u8; 32]>> {
    let peer_point = peer_public_key.edwards_point()?;
    let shared =
        Zeroizing::new((own_private_key.agreement_scalar() * peer_point).compress().to_bytes());

    let mut info = Vec::with_capacity(WRAP_INFO.len() + 64);
    info.extend_from_slice(WRAP_INFO);
    info.extend_from_slice(sender_public_key.as_bytes());
    info.extend_from_slice(recipient_public_key.as_bytes());

    let hk = Hkdf::<Sha256>::new(Some(WRAP_SALT), &shared[..]);
    let mut okm = Zeroizing::new([0u8; 32]);
    hk.expand(&info, &mut okm[..])
        .map_err(|_| CryptoError::EncryptionFailed("HKDF expand failed".to_string()))?;

    Ok(okm)
}
