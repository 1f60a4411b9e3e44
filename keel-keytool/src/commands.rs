// src/commands.rs

//! Key tool operations, independent of argument parsing.

use anyhow::{anyhow, bail, Context, Result};
use keel_crypto::address::{to_alias, AddressParams};
use keel_crypto::{hash, keys, signing, PublicKey};
use keel_keystore::{EntryKind, KeyStore};
use keel_models::Address;
use crate::config::KeytoolConfig;

/// Freshly generated key material
#[derive(Debug)]
pub struct GeneratedKey {
    /// Base58 public key
    pub public_key: String,
    /// Hex private key
    pub private_key: String,
    /// Address on the configured chain
    pub address: String,
}

impl GeneratedKey {
    /// Printable form; the private key is left out unless `show_private`
    pub fn render(&self, show_private: bool) -> String {
        let mut lines = vec![format!("Public key:  {}", self.public_key)];
        if show_private {
            lines.push(format!("Private key: {}", self.private_key));
        }
        lines.push(format!("Address:     {}", self.address));
        lines.join("\n")
    }
}

/// Generates a key pair without storing it
pub fn generate(params: &AddressParams) -> Result<GeneratedKey> {
    let keypair = keys::generate_keypair();
    Ok(GeneratedKey {
        public_key: keypair.public_key.to_base58(),
        private_key: hex::encode(keypair.private_key().as_bytes()),
        address: to_alias(&keypair.public_key, params)?,
    })
}

/// Hex `secure_hash` of a UTF-8 string
pub fn hash(text: &str) -> String {
    hash::hash_to_hex(&hash::secure_hash(text))
}

/// Address of a Base58 public key
pub fn address(public_key: &str, params: &AddressParams) -> Result<Address> {
    let public_key = PublicKey::from_base58(public_key).context("Invalid public key")?;
    Ok(Address::from_public_key(&public_key, params)?)
}

/// Opens (or creates) the configured key store
pub fn open_store(config: &KeytoolConfig, password: &str) -> Result<KeyStore> {
    let path = config.keystore_path()?;
    KeyStore::open_with(&path, password, config.kdf)
        .with_context(|| format!("Failed to open key store {}", path.display()))
}

/// Generates and stores a key pair, returning its alias
pub fn keystore_new(store: &KeyStore, entry_password: Option<&str>) -> Result<String> {
    store
        .generate_and_store(entry_password)
        .map(|public_key| public_key.to_base58())
        .ok_or_else(|| anyhow!("Failed to store the generated key"))
}

/// Human-readable description of one entry
pub fn keystore_show(store: &KeyStore, alias: &str, params: &AddressParams) -> Result<String> {
    let kind = store.entry_kind(alias)?;
    let chain = store.get_certificate_chain(alias)?;

    let mut lines = vec![format!("Alias:        {}", alias), format!("Type:         {:?}", kind)];
    if kind != EntryKind::Certificate {
        let public_key = store.get_public_key(alias)?;
        lines.push(format!("Public key:   {}", public_key));
        lines.push(format!("Address:      {}", to_alias(&public_key, params)?));
    }
    lines.push(format!("Certificates: {}", chain.len()));

    Ok(lines.join("\n"))
}

/// Signs a UTF-8 message with a stored key, returning the hex signature
pub fn sign(
    store: &KeyStore,
    alias: &str,
    entry_password: Option<&str>,
    message: &str,
) -> Result<String> {
    let private_key = store.get_key(alias, entry_password)?;
    Ok(hex::encode(signing::sign(message.as_bytes(), &private_key)))
}

/// Verifies a hex signature over a UTF-8 message
pub fn verify(public_key: &str, message: &str, signature: &str) -> Result<bool> {
    let public_key = PublicKey::from_base58(public_key).context("Invalid public key")?;
    let signature = hex::decode(signature).context("Signature is not hex")?;
    Ok(public_key.verify(message.as_bytes(), &signature))
}

/// Requires a password, reporting which one is missing
pub fn require_password<'a>(password: Option<&'a str>, what: &str) -> Result<&'a str> {
    match password {
        Some(p) => Ok(p),
        None => bail!("{} password required (use --password or KEEL_KEYSTORE_PASSWORD)", what),
    }
}
