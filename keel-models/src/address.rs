// src/address.rs

//! Validated account address value.

use crate::errors::{ModelError, Result};
use keel_crypto::address::{self as derivation, AddressParams, DEFAULT_CHECKSUM_LENGTH};
use keel_crypto::PublicKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account address: version, chain id, public key hash and checksum
///
/// Textual form is Base58. An `Address` always has a valid checksum.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address {
    bytes: Vec<u8>,
}

impl Address {
    /// Derives the address of a public key
    pub fn from_public_key(public_key: &PublicKey, params: &AddressParams) -> Result<Self> {
        Ok(Self {
            bytes: derivation::address_bytes(public_key, params)?,
        })
    }

    /// Parses a Base58 address and checks it against `params`
    ///
    /// # Errors
    /// `InvalidAddress` on bad Base58, length, version, chain id or checksum.
    pub fn from_base58(s: &str, params: &AddressParams) -> Result<Self> {
        let bytes = decode(s)?;
        Self::from_bytes(bytes, params)
    }

    /// Wraps raw address bytes after checking them against `params`
    pub fn from_bytes(bytes: Vec<u8>, params: &AddressParams) -> Result<Self> {
        derivation::verify_address_bytes(&bytes, params)
            .map_err(|e| ModelError::InvalidAddress(e.to_string()))?;
        Ok(Self { bytes })
    }

    /// Parses an address for any chain and version
    ///
    /// Assumes the default checksum length and checks only the checksum.
    pub fn parse(s: &str) -> Result<Self> {
        let bytes = decode(s)?;
        if bytes.len() <= 2 + DEFAULT_CHECKSUM_LENGTH {
            return Err(ModelError::InvalidAddress(format!(
                "Address too short: {} bytes",
                bytes.len()
            )));
        }

        let params = AddressParams {
            chain_id: bytes[1],
            address_version: bytes[0],
            hash_length: bytes.len() - 2 - DEFAULT_CHECKSUM_LENGTH,
            checksum_length: DEFAULT_CHECKSUM_LENGTH,
        };
        Self::from_bytes(bytes, &params)
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Address version byte
    pub fn version(&self) -> u8 {
        self.bytes[0]
    }

    /// Chain id byte
    pub fn chain_id(&self) -> u8 {
        self.bytes[1]
    }

    /// Base58 form
    pub fn to_base58(&self) -> String {
        bs58::encode(&self.bytes).into_string()
    }
}

fn decode(s: &str) -> Result<Vec<u8>> {
    bs58::decode(s)
        .into_vec()
        .map_err(|e| ModelError::InvalidAddress(format!("Invalid base58: {}", e)))
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_base58())
    }
}

impl FromStr for Address {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = ModelError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_base58()
    }
}
