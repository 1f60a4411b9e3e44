// src/sealing.rs

//! Password-based sealing of private key material.
//!
//! Keys are derived with Argon2id from a password and a random salt, then
//! used with AES-256-GCM from `keel_crypto::encryption`. The alias is bound in
//! as associated data so a sealed key cannot be moved to another alias.

use argon2::{Algorithm, Argon2, Params, Version};
use keel_crypto::encryption;
use keel_crypto::{random, CryptoError, Result};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Salt size for key derivation
pub const SALT_SIZE: usize = 16;

/// Derived key size
pub const DERIVED_KEY_SIZE: usize = 32;

/// Largest accepted memory cost (256 MiB)
pub const MAX_MEMORY_KIB: u32 = 256 * 1024;

/// Largest accepted number of passes
pub const MAX_ITERATIONS: u32 = 64;

/// Largest accepted degree of parallelism
pub const MAX_PARALLELISM: u32 = 16;

/// Argon2id cost parameters, recorded in the store file
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    /// Rejects costs above the accepted maximums
    ///
    /// Store files are not authenticated before the store key is derived, so
    /// every derivation goes through this check first.
    pub fn validate(&self) -> Result<()> {
        if self.memory_kib > MAX_MEMORY_KIB
            || self.iterations > MAX_ITERATIONS
            || self.parallelism > MAX_PARALLELISM
        {
            return Err(CryptoError::Settings(format!(
                "Argon2 parameters out of range: {:?}",
                self
            )));
        }
        Ok(())
    }

    fn argon2(&self) -> Result<Argon2<'static>> {
        self.validate()?;
        let params = Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(DERIVED_KEY_SIZE),
        )
        .map_err(|e| CryptoError::Settings(format!("Invalid Argon2 parameters: {}", e)))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Generates a random salt
pub fn generate_salt() -> [u8; SALT_SIZE] {
    random::random_bytes()
}

/// Derives a sealing key from a password
pub fn derive_key(
    password: &str,
    salt: &[u8],
    params: &KdfParams,
) -> Result<Zeroizing<[u8; DERIVED_KEY_SIZE]>> {
    let mut key = Zeroizing::new([0u8; DERIVED_KEY_SIZE]);
    params
        .argon2()?
        .hash_password_into(password.as_bytes(), salt, &mut key[..])
        .map_err(|e| CryptoError::InvalidInput(format!("Key derivation failed: {}", e)))?;
    Ok(key)
}

/// Seals secret bytes under a derived key, bound to `alias`
pub fn seal(secret: &[u8], key: &[u8; DERIVED_KEY_SIZE], alias: &str) -> Result<Vec<u8>> {
    encryption::encrypt_with_aad(secret, key, alias.as_bytes())
}

/// Opens sealed bytes; any failure means the key (password) was wrong
pub fn open(
    sealed: &[u8],
    key: &[u8; DERIVED_KEY_SIZE],
    alias: &str,
) -> Result<Zeroizing<Vec<u8>>> {
    encryption::decrypt_with_aad(sealed, key, alias.as_bytes())
        .map(Zeroizing::new)
        .map_err(|_| CryptoError::BadPassword)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> KdfParams {
        KdfParams { memory_kib: 1024, iterations: 1, parallelism: 1 }
    }

    #[test]
    fn test_derive_key_deterministic() {
        let salt = [3u8; SALT_SIZE];
        let k1 = derive_key("password", &salt, &fast()).unwrap();
        let k2 = derive_key("password", &salt, &fast()).unwrap();
        assert_eq!(*k1, *k2);
    }

    #[test]
    fn test_derive_key_salt_matters() {
        let k1 = derive_key("password", &[1u8; SALT_SIZE], &fast()).unwrap();
        let k2 = derive_key("password", &[2u8; SALT_SIZE], &fast()).unwrap();
        assert_ne!(*k1, *k2);
    }

    #[test]
    fn test_seal_open() {
        let key = derive_key("pw", &generate_salt(), &fast()).unwrap();
        let sealed = seal(b"private bytes", &key, "alias").unwrap();
        assert_eq!(&open(&sealed, &key, "alias").unwrap()[..], b"private bytes");
    }

    #[test]
    fn test_open_wrong_key_is_bad_password() {
        let salt = generate_salt();
        let key = derive_key("right", &salt, &fast()).unwrap();
        let wrong = derive_key("wrong", &salt, &fast()).unwrap();
        let sealed = seal(b"secret", &key, "a").unwrap();
        assert_eq!(open(&sealed, &wrong, "a").unwrap_err(), CryptoError::BadPassword);
    }

    #[test]
    fn test_open_other_alias_fails() {
        let key = derive_key("pw", &generate_salt(), &fast()).unwrap();
        let sealed = seal(b"secret", &key, "a").unwrap();
        assert!(open(&sealed, &key, "b").is_err());
    }

    #[test]
    fn test_invalid_params() {
        let params = KdfParams { memory_kib: 1, iterations: 0, parallelism: 0 };
        assert!(derive_key("pw", &generate_salt(), &params).is_err());
    }

    #[test]
    fn test_oversized_params_rejected_before_derivation() {
        let huge = KdfParams { memory_kib: 4 * 1024 * 1024, iterations: 1, parallelism: 1 };
        assert!(matches!(huge.validate(), Err(CryptoError::Settings(_))));
        assert!(matches!(
            derive_key("pw", &generate_salt(), &huge),
            Err(CryptoError::Settings(_))
        ));

        let passes = KdfParams { iterations: MAX_ITERATIONS + 1, ..fast() };
        assert!(passes.validate().is_err());
        let lanes = KdfParams { parallelism: MAX_PARALLELISM + 1, ..fast() };
        assert!(lanes.validate().is_err());
        assert!(KdfParams::default().validate().is_ok());
    }
}
