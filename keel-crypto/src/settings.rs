// src/settings.rs

//! Process-wide cryptographic settings.
//!
//! Settings are resolved once (normally from the environment at startup) and
//! read by every engine afterwards. All lengths are derived from the selected
//! algorithm; explicit length variables are accepted only when they agree with
//! it, so two components can never disagree about a key or signature size.

use crate::errors::{CryptoError, Result};
use crate::{
    DIGEST_SIZE, KEY_LENGTH, KEY_STRING_LENGTH, SESSION_KEY_LENGTH, SIGNATURE_LENGTH,
    WRAPPED_STRUCTURE_LENGTH,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::{debug, info};

/// Environment variable selecting the algorithm
pub const ENV_ALGORITHM: &str = "KEEL_CRYPTO_ALGORITHM";

/// Optional environment variable pinning the digest size
pub const ENV_DIGEST_SIZE: &str = "KEEL_DIGEST_SIZE";

/// Optional environment variable pinning the key length
pub const ENV_KEY_LENGTH: &str = "KEEL_KEY_LENGTH";

/// Optional environment variable pinning the signature length
pub const ENV_SIGNATURE_LENGTH: &str = "KEEL_SIGNATURE_LENGTH";

static SETTINGS: OnceLock<CryptoSettings> = OnceLock::new();

/// Supported signature/agreement algorithm families
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CryptoAlgorithm {
    /// Ed25519 signatures with Curve25519 key agreement
    Ed25519,
}

impl CryptoAlgorithm {
    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            CryptoAlgorithm::Ed25519 => "ed25519",
        }
    }
}

impl fmt::Display for CryptoAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CryptoAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ed25519" | "curve25519" => Ok(CryptoAlgorithm::Ed25519),
            other => Err(CryptoError::Settings(format!("Unknown crypto algorithm: {}", other))),
        }
    }
}

/// Immutable record of algorithm choice and every fixed length
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoSettings {
    /// Selected algorithm
    pub algorithm: CryptoAlgorithm,
    /// Digest output size in bytes
    pub digest_size: usize,
    /// Private/public key length in bytes
    pub key_length: usize,
    /// Maximum length of a Base58 encoded key
    pub key_string_length: usize,
    /// Session key length in bytes
    pub session_key_length: usize,
    /// Signature length in bytes
    pub signature_length: usize,
    /// Wrapped session key length in bytes
    pub wrapped_structure_length: usize,
}

impl Default for CryptoSettings {
    fn default() -> Self {
        Self::for_algorithm(CryptoAlgorithm::Ed25519)
    }
}

impl CryptoSettings {
    /// Settings implied by an algorithm
    pub fn for_algorithm(algorithm: CryptoAlgorithm) -> Self {
        match algorithm {
            CryptoAlgorithm::Ed25519 => Self {
                algorithm,
                digest_size: DIGEST_SIZE,
                key_length: KEY_LENGTH,
                key_string_length: KEY_STRING_LENGTH,
                session_key_length: SESSION_KEY_LENGTH,
                signature_length: SIGNATURE_LENGTH,
                wrapped_structure_length: WRAPPED_STRUCTURE_LENGTH,
            },
        }
    }

    /// Reads settings from the process environment
    ///
    /// # Returns
    /// `Ok(None)` when no crypto variable is set, `Ok(Some(_))` for a valid
    /// configuration, `Err` for an unknown algorithm or contradictory lengths.
    pub fn read_env() -> Result<Option<Self>> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let algorithm = lookup(ENV_ALGORITHM);
        let digest_size = lookup(ENV_DIGEST_SIZE);
        let key_length = lookup(ENV_KEY_LENGTH);
        let signature_length = lookup(ENV_SIGNATURE_LENGTH);

        if algorithm.is_none()
            && digest_size.is_none()
            && key_length.is_none()
            && signature_length.is_none()
        {
            return Ok(None);
        }

        let algorithm = match algorithm {
            Some(name) => name.parse()?,
            None => CryptoAlgorithm::Ed25519,
        };
        let settings = Self::for_algorithm(algorithm);

        check_pinned(ENV_DIGEST_SIZE, digest_size, settings.digest_size)?;
        check_pinned(ENV_KEY_LENGTH, key_length, settings.key_length)?;
        check_pinned(ENV_SIGNATURE_LENGTH, signature_length, settings.signature_length)?;

        debug!(algorithm = %settings.algorithm, "resolved crypto settings from environment");
        Ok(Some(settings))
    }
}

fn check_pinned(name: &str, value: Option<String>, expected: usize) -> Result<()> {
    let Some(raw) = value else {
        return Ok(());
    };

    let pinned: usize = raw.trim().parse()
        .map_err(|_| CryptoError::Settings(format!("{} is not a number: {}", name, raw)))?;

    if pinned != expected {
        return Err(CryptoError::Settings(
            format!("{} = {} contradicts algorithm (expected {})", name, pinned, expected)
        ));
    }

    Ok(())
}

/// Installs the process-wide settings
///
/// Installing the same settings twice is a no-op; installing different
/// settings after the first call is an error.
pub fn init(settings: CryptoSettings) -> Result<&'static CryptoSettings> {
    let installed = SETTINGS.get_or_init(|| settings);
    if *installed != settings {
        return Err(CryptoError::Settings(format!(
            "Crypto settings already initialised with {}",
            installed.algorithm
        )));
    }

    info!(algorithm = %installed.algorithm, "crypto settings initialised");
    Ok(installed)
}

/// Resolves settings from the environment and installs them
///
/// Falls back to the Ed25519 defaults when nothing is configured.
pub fn init_from_env() -> Result<&'static CryptoSettings> {
    let settings = CryptoSettings::read_env()?.unwrap_or_default();
    init(settings)
}

/// Returns the process-wide settings, installing the defaults on first use
pub fn settings() -> &'static CryptoSettings {
    SETTINGS.get_or_init(CryptoSettings::default)
}
