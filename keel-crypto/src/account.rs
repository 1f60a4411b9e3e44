// src/account.rs

//! Account identities built on key pairs.

use crate::address::{self, AddressParams};
use crate::errors::Result;
use crate::keys::{generate_keypair, KeyPair, PrivateKey, PublicKey};
use serde::{Deserialize, Serialize};

/// Public identity of an account
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKeyAccount {
    /// Account public key
    pub public_key: PublicKey,
}

impl PublicKeyAccount {
    /// Wraps a public key
    pub fn new(public_key: PublicKey) -> Self {
        Self { public_key }
    }

    /// Derives the textual address of this account
    pub fn address(&self, params: &AddressParams) -> Result<String> {
        address::to_alias(&self.public_key, params)
    }
}

impl From<PublicKey> for PublicKeyAccount {
    fn from(public_key: PublicKey) -> Self {
        Self::new(public_key)
    }
}

/// Account able to sign
#[derive(Clone, Debug)]
pub struct PrivateKeyAccount {
    keypair: KeyPair,
}

impl PrivateKeyAccount {
    /// Wraps a key pair
    pub fn new(keypair: KeyPair) -> Self {
        Self { keypair }
    }

    /// Generates a fresh account
    pub fn generate() -> Self {
        Self::new(generate_keypair())
    }

    /// Underlying key pair
    pub fn keypair(&self) -> &KeyPair {
        &self.keypair
    }

    /// Public side of the account
    pub fn public_account(&self) -> PublicKeyAccount {
        PublicKeyAccount::new(self.keypair.public_key)
    }

    /// Derives the textual address of this account
    pub fn address(&self, params: &AddressParams) -> Result<String> {
        self.public_account().address(params)
    }
}

impl AsRef<PrivateKey> for PrivateKeyAccount {
    fn as_ref(&self) -> &PrivateKey {
        self.keypair.private_key()
    }
}

/// Generates a new account identity without exposing its private key
///
/// The private half is dropped (and zeroized) before returning.
pub fn generate_public_key() -> PublicKeyAccount {
    let keypair = generate_keypair();
    PublicKeyAccount::new(keypair.public_key)
}
