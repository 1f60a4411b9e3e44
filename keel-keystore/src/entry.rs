// src/entry.rs

//! Key store entries and their on-disk representation.

use keel_crypto::{CryptoError, PublicKey, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque DER-encoded X.509 certificate
///
/// The store keeps certificates verbatim and never parses them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    #[serde(with = "hex_bytes")]
    der: Vec<u8>,
}

impl Certificate {
    /// Wraps DER bytes
    pub fn from_der(der: Vec<u8>) -> Self {
        Self { der }
    }

    /// DER bytes
    pub fn der(&self) -> &[u8] {
        &self.der
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Certificate({} bytes)", self.der.len())
    }
}

/// What an alias refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// A private key, optionally with a certificate chain
    PrivateKey,
    /// A full key pair
    KeyPair,
    /// A trusted certificate without private material
    Certificate,
}

/// Private key sealed under a password-derived key
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct SealedKey {
    /// Salt of the entry password; `None` when sealed under the store key
    #[serde(default, skip_serializing_if = "Option::is_none", with = "hex_bytes_opt")]
    pub salt: Option<Vec<u8>>,

    /// nonce || sealed private key || tag
    #[serde(with = "hex_bytes")]
    pub ciphertext: Vec<u8>,
}

/// Persisted entry
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum StoredEntry {
    PrivateKey {
        public_key: String,
        sealed: SealedKey,
        #[serde(default)]
        chain: Vec<Certificate>,
    },
    KeyPair {
        public_key: String,
        sealed: SealedKey,
        #[serde(default)]
        chain: Vec<Certificate>,
    },
    Certificate {
        certificate: Certificate,
    },
}

impl StoredEntry {
    pub fn kind(&self) -> EntryKind {
        match self {
            StoredEntry::PrivateKey { .. } => EntryKind::PrivateKey,
            StoredEntry::KeyPair { .. } => EntryKind::KeyPair,
            StoredEntry::Certificate { .. } => EntryKind::Certificate,
        }
    }

    /// Sealed key and public key, for key-bearing entries
    pub fn key_parts(&self) -> Option<(&SealedKey, &str)> {
        match self {
            StoredEntry::PrivateKey { sealed, public_key, .. }
            | StoredEntry::KeyPair { sealed, public_key, .. } => {
                Some((sealed, public_key.as_str()))
            }
            StoredEntry::Certificate { .. } => None,
        }
    }

    pub fn public_key(&self) -> Option<Result<PublicKey>> {
        self.key_parts()
            .map(|(_, encoded)| PublicKey::from_base58(encoded)
                .map_err(|e| CryptoError::StoreIoFailure(format!("Corrupt public key: {}", e))))
    }

    pub fn chain(&self) -> Vec<Certificate> {
        match self {
            StoredEntry::PrivateKey { chain, .. } | StoredEntry::KeyPair { chain, .. } => {
                chain.clone()
            }
            StoredEntry::Certificate { certificate } => vec![certificate.clone()],
        }
    }
}

pub(crate) mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}

mod hex_bytes_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(b) => serializer.serialize_some(&hex::encode(b)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        let s = Option::<String>::deserialize(deserializer)?;
        s.map(|s| hex::decode(s).map_err(serde::de::Error::custom)).transpose()
    }
}
