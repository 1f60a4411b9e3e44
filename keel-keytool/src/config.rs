// src/config.rs

//! Key tool configuration.

use anyhow::{bail, Context, Result};
use keel_crypto::address::{AddressParams, DEFAULT_ADDRESS_VERSION};
use keel_keystore::{KdfParams, KeyStore};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the key store directory
pub const CONFIG_FILE: &str = "keytool.json";

/// Key tool configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeytoolConfig {
    /// Key store file; the user's default location when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keystore_path: Option<PathBuf>,

    /// Argon2id costs for newly created stores and entries
    pub kdf: KdfParams,

    /// Network (chain) identifier, a single ASCII character
    pub chain_id: char,

    /// Address version byte
    pub address_version: u8,
}

impl Default for KeytoolConfig {
    fn default() -> Self {
        Self {
            keystore_path: None,
            kdf: KdfParams::default(),
            chain_id: 'K',
            address_version: DEFAULT_ADDRESS_VERSION,
        }
    }
}

impl KeytoolConfig {
    /// Loads configuration from file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }

    /// Loads `path` if given, otherwise the default file when it exists
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        match KeyStore::default_directory() {
            Ok(dir) if dir.join(CONFIG_FILE).exists() => Self::from_file(&dir.join(CONFIG_FILE)),
            _ => Ok(Self::default()),
        }
    }

    /// Checks values serde cannot
    pub fn validate(&self) -> Result<()> {
        if !self.chain_id.is_ascii() {
            bail!("chain_id must be a single ASCII character, got {:?}", self.chain_id);
        }
        Ok(())
    }

    /// Address parameters for the configured chain
    pub fn address_params(&self) -> AddressParams {
        let mut params = AddressParams::new(self.chain_id as u8);
        params.address_version = self.address_version;
        params
    }

    /// Key store file to use
    pub fn keystore_path(&self) -> Result<PathBuf> {
        match &self.keystore_path {
            Some(path) => Ok(path.clone()),
            None => Ok(KeyStore::default_path()?),
        }
    }
}
