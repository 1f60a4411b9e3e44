// src/keystore.rs

//! Password-protected store of aliased keys, key pairs and certificates.
//!
//! A store is either purely in memory or backed by a JSON file. Private key
//! material is always sealed: under the entry's own password when one is
//! given, otherwise under a key derived from the store password when the store
//! was opened. Passwords themselves are never kept.
//!
//! Several handles (in one process or many) may share a file. Every change
//! holds an exclusive advisory lock on `<file>.lock`, reloads the file, applies
//! the change and writes a fresh file into place. Reads take a shared lock and
//! reload first.

use crate::entry::{hex_bytes, Certificate, EntryKind, SealedKey, StoredEntry};
use crate::sealing::{self, KdfParams, DERIVED_KEY_SIZE, SALT_SIZE};
use fs2::FileExt;
use keel_crypto::{
    keys, safe_is_equal, settings, CryptoError, KeyPair, PrivateKey, PublicKey, Result,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

/// Plaintext sealed under the store key to detect a wrong store password
const CHECK_PLAINTEXT: &[u8] = b"keel-keystore";

/// Associated data of the check value
const CHECK_ALIAS: &str = "";

type Entries = BTreeMap<String, StoredEntry>;

/// On-disk container
#[derive(Serialize, Deserialize)]
struct StoreFile<E> {
    version: u32,
    algorithm: String,
    kdf: KdfParams,
    #[serde(with = "hex_bytes")]
    salt: Vec<u8>,
    #[serde(with = "hex_bytes")]
    check: Vec<u8>,
    entries: E,
}

impl StoreFile<Entries> {
    fn read(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| io_failure(path, e))?;
        let file: Self = serde_json::from_str(&json).map_err(|e| corrupt(path, e))?;

        if file.version != crate::KEYSTORE_VERSION {
            return Err(CryptoError::StoreIoFailure(format!(
                "Unsupported key store version {}",
                file.version
            )));
        }
        Ok(file)
    }
}

#[derive(Clone, Copy)]
enum LockMode {
    Shared,
    Exclusive,
}

/// Advisory lock on the sidecar lock file, released on drop
struct FileLock(File);

impl FileLock {
    fn acquire(store_path: &Path, mode: LockMode) -> Result<Self> {
        let path = lock_path(store_path);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| io_failure(&path, e))?;

        match mode {
            LockMode::Shared => FileExt::lock_shared(&file),
            LockMode::Exclusive => FileExt::lock_exclusive(&file),
        }
        .map_err(|e| io_failure(&path, e))?;

        Ok(Self(file))
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.0);
    }
}

/// Key store
pub struct KeyStore {
    /// Backing file, `None` for in-memory stores
    path: Option<PathBuf>,

    /// Cost parameters for every derivation in this store
    kdf: KdfParams,

    /// Salt of the store password
    salt: Vec<u8>,

    /// Check value sealed under the store key
    check: Vec<u8>,

    /// Key derived from the store password
    store_key: Zeroizing<[u8; DERIVED_KEY_SIZE]>,

    /// Last known entries; only ever replaced whole
    entries: RwLock<Entries>,
}

impl KeyStore {
    /// Creates an empty in-memory store
    pub fn in_memory(password: &str) -> Result<Self> {
        Self::in_memory_with(password, KdfParams::default())
    }

    /// Creates an empty in-memory store with explicit KDF costs
    pub fn in_memory_with(password: &str, kdf: KdfParams) -> Result<Self> {
        Self::create(None, password, kdf)
    }

    /// Opens the store at `path`, creating it when the file does not exist
    ///
    /// # Arguments
    /// * `path` - Key store file
    /// * `password` - Store password
    ///
    /// # Errors
    /// `BadPassword` if the file was created with another password,
    /// `StoreIoFailure` if it cannot be read or parsed.
    pub fn open<P: AsRef<Path>>(path: P, password: &str) -> Result<Self> {
        Self::open_with(path, password, KdfParams::default())
    }

    /// Opens or creates a store; `kdf` only applies to newly created files
    pub fn open_with<P: AsRef<Path>>(path: P, password: &str, kdf: KdfParams) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = parent_dir(path) {
            fs::create_dir_all(parent).map_err(|e| io_failure(parent, e))?;
        }
        let _lock = FileLock::acquire(path, LockMode::Exclusive)?;

        if !path.exists() {
            let store = Self::create(Some(path.to_path_buf()), password, kdf)?;
            store.persist(&Entries::new())?;
            info!(path = %path.display(), "Created key store");
            return Ok(store);
        }

        let file = StoreFile::read(path)?;

        let configured = settings::settings().algorithm;
        if file.algorithm != configured.as_str() {
            return Err(CryptoError::Settings(format!(
                "Key store holds {} keys but {} is configured",
                file.algorithm, configured
            )));
        }

        file.kdf.validate().map_err(|e| corrupt(path, e))?;
        if file.salt.len() != SALT_SIZE {
            return Err(corrupt(path, "bad salt length"));
        }

        let store_key = sealing::derive_key(password, &file.salt, &file.kdf)?;
        sealing::open(&file.check, &store_key, CHECK_ALIAS)?;

        info!(path = %path.display(), entries = file.entries.len(), "Opened key store");

        Ok(Self {
            path: Some(path.to_path_buf()),
            kdf: file.kdf,
            salt: file.salt,
            check: file.check,
            store_key,
            entries: RwLock::new(file.entries),
        })
    }

    fn create(path: Option<PathBuf>, password: &str, kdf: KdfParams) -> Result<Self> {
        let salt = sealing::generate_salt().to_vec();
        let store_key = sealing::derive_key(password, &salt, &kdf)?;
        let check = sealing::seal(CHECK_PLAINTEXT, &store_key, CHECK_ALIAS)?;

        Ok(Self {
            path,
            kdf,
            salt,
            check,
            store_key,
            entries: RwLock::new(Entries::new()),
        })
    }

    /// Gets the default key store directory
    pub fn default_directory() -> Result<PathBuf> {
        let home = directories::UserDirs::new()
            .ok_or_else(|| CryptoError::StoreIoFailure("Cannot find home directory".to_string()))?;

        Ok(home.home_dir().join(crate::KEYSTORE_DIR))
    }

    /// Gets the default key store file
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::default_directory()?.join(crate::KEYSTORE_FILE))
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Private key stored under `alias`
    ///
    /// # Arguments
    /// * `alias` - Entry alias
    /// * `password` - Entry password, if the entry was stored with one
    ///
    /// # Errors
    /// `BadPassword` if the password is missing or wrong. An entry stored
    /// without its own password accepts `None` or the store password.
    pub fn get_key(&self, alias: &str, password: Option<&str>) -> Result<PrivateKey> {
        let sealed = self
            .entry(alias)?
            .key_parts()
            .map(|(sealed, _)| sealed.clone())
            .ok_or_else(|| CryptoError::AliasNotFound(alias.to_string()))?;

        let secret = self.unseal(alias, &sealed, password)?;
        PrivateKey::from_bytes(&secret)
            .map_err(|_| CryptoError::StoreIoFailure(format!("Corrupt key entry {}", alias)))
    }

    /// Public key of a key entry; no password needed
    pub fn get_public_key(&self, alias: &str) -> Result<PublicKey> {
        self.entry(alias)?
            .public_key()
            .ok_or_else(|| CryptoError::AliasNotFound(alias.to_string()))?
    }

    /// Key pair stored under `alias`
    pub fn get_key_pair(&self, alias: &str, password: Option<&str>) -> Result<KeyPair> {
        let expected = self.get_public_key(alias)?;
        let keypair = KeyPair::from_private_key(self.get_key(alias, password)?);

        if keypair.public_key != expected {
            return Err(CryptoError::StoreIoFailure(format!(
                "Key entry {} does not match its public key",
                alias
            )));
        }
        Ok(keypair)
    }

    /// First certificate of the entry's chain
    pub fn get_certificate(&self, alias: &str) -> Result<Certificate> {
        self.get_certificate_chain(alias)?
            .into_iter()
            .next()
            .ok_or_else(|| CryptoError::AliasNotFound(alias.to_string()))
    }

    /// Certificate chain of the entry, leaf first
    pub fn get_certificate_chain(&self, alias: &str) -> Result<Vec<Certificate>> {
        Ok(self.entry(alias)?.chain())
    }

    /// Kind of the entry under `alias`
    pub fn entry_kind(&self, alias: &str) -> Result<EntryKind> {
        Ok(self.entry(alias)?.kind())
    }

    /// Generates a key pair and stores it under its Base58 public key
    ///
    /// Returns `None` if the entry could not be persisted; the store is then
    /// left as it was.
    pub fn generate_and_store(&self, password: Option<&str>) -> Option<PublicKey> {
        let keypair = keys::generate_keypair();
        let alias = keypair.public_key.to_base58();

        match self.set_key_pair(&alias, &keypair, password) {
            Ok(()) => {
                info!(alias = %alias, "Generated key pair");
                Some(keypair.public_key)
            }
            Err(e) => {
                warn!(error = %e, "Failed to store generated key pair");
                None
            }
        }
    }

    /// Stores a private key with its certificate chain
    ///
    /// # Errors
    /// `AliasExists` if the alias is taken, by this handle or any other
    /// handle on the same file.
    pub fn set_key_entry(
        &self,
        alias: &str,
        private_key: &PrivateKey,
        chain: Vec<Certificate>,
        password: Option<&str>,
    ) -> Result<()> {
        let sealed = self.seal(alias, private_key, password)?;
        let entry = StoredEntry::PrivateKey {
            public_key: private_key.public_key().to_base58(),
            sealed,
            chain,
        };
        self.insert(alias, entry)
    }

    /// Stores a key pair
    pub fn set_key_pair(
        &self,
        alias: &str,
        keypair: &KeyPair,
        password: Option<&str>,
    ) -> Result<()> {
        let sealed = self.seal(alias, keypair.private_key(), password)?;
        let entry = StoredEntry::KeyPair {
            public_key: keypair.public_key.to_base58(),
            sealed,
            chain: Vec::new(),
        };
        self.insert(alias, entry)
    }

    /// Stores a trusted certificate
    pub fn set_certificate_entry(&self, alias: &str, certificate: Certificate) -> Result<()> {
        self.insert(alias, StoredEntry::Certificate { certificate })
    }

    /// Removes an entry
    pub fn delete_entry(&self, alias: &str) -> Result<()> {
        self.modify(|entries| {
            entries
                .remove(alias)
                .map(|_| ())
                .ok_or_else(|| CryptoError::AliasNotFound(alias.to_string()))
        })?;

        debug!(alias = %alias, "Deleted key store entry");
        Ok(())
    }

    /// All aliases, sorted
    ///
    /// Falls back to the last known entries if the file cannot be read.
    pub fn aliases(&self) -> Vec<String> {
        self.refresh_or_warn();
        self.read().keys().cloned().collect()
    }

    /// Whether `alias` names an entry
    pub fn contains_alias(&self, alias: &str) -> Result<bool> {
        self.refresh()?;
        Ok(self.read().contains_key(alias))
    }

    /// Number of entries
    ///
    /// Falls back to the last known entries if the file cannot be read.
    pub fn len(&self) -> usize {
        self.refresh_or_warn();
        self.read().len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // The map is only ever swapped for a complete new one, so a poisoned
    // lock still guards a consistent value.
    fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the backing file; always taken before the in-process lock
    fn lock(&self, mode: LockMode) -> Result<Option<FileLock>> {
        self.path
            .as_deref()
            .map(|path| FileLock::acquire(path, mode))
            .transpose()
    }

    /// Entries as currently stored, or `cached` when there is no file
    fn load(&self, cached: &Entries) -> Result<Entries> {
        let path = match &self.path {
            Some(path) if path.exists() => path,
            _ => return Ok(cached.clone()),
        };

        let file = StoreFile::read(path)?;
        if file.salt != self.salt || file.check != self.check {
            return Err(CryptoError::StoreIoFailure(format!(
                "Key store {} was replaced by another store",
                path.display()
            )));
        }
        Ok(file.entries)
    }

    /// Reloads the cached entries from the backing file
    fn refresh(&self) -> Result<()> {
        let Some(_lock) = self.lock(LockMode::Shared)? else {
            return Ok(());
        };
        let mut entries = self.write();
        let current = self.load(&entries)?;
        *entries = current;
        Ok(())
    }

    fn refresh_or_warn(&self) {
        if let Err(e) = self.refresh() {
            warn!(error = %e, "Failed to reload key store");
        }
    }

    /// Fresh copy of one entry
    fn entry(&self, alias: &str) -> Result<StoredEntry> {
        self.refresh()?;
        self.read()
            .get(alias)
            .cloned()
            .ok_or_else(|| CryptoError::AliasNotFound(alias.to_string()))
    }

    /// Applies `change` to the current entries and persists the result
    ///
    /// The cached entries are only replaced once the file has been written, so
    /// a failed change leaves the store as it was.
    fn modify<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut Entries) -> Result<()>,
    {
        let _lock = self.lock(LockMode::Exclusive)?;
        let mut entries = self.write();

        let mut updated = self.load(&entries)?;
        change(&mut updated)?;
        self.persist(&updated)?;

        *entries = updated;
        Ok(())
    }

    /// Inserts a new entry under a free alias
    fn insert(&self, alias: &str, entry: StoredEntry) -> Result<()> {
        let kind = entry.kind();
        self.modify(|entries| {
            if entries.contains_key(alias) {
                return Err(CryptoError::AliasExists(alias.to_string()));
            }
            entries.insert(alias.to_string(), entry);
            Ok(())
        })?;

        debug!(alias = %alias, kind = ?kind, "Stored key store entry");
        Ok(())
    }

    fn seal(
        &self,
        alias: &str,
        private_key: &PrivateKey,
        password: Option<&str>,
    ) -> Result<SealedKey> {
        match password {
            Some(password) => {
                let salt = sealing::generate_salt();
                let key = sealing::derive_key(password, &salt, &self.kdf)?;
                Ok(SealedKey {
                    salt: Some(salt.to_vec()),
                    ciphertext: sealing::seal(private_key.as_bytes(), &key, alias)?,
                })
            }
            None => Ok(SealedKey {
                salt: None,
                ciphertext: sealing::seal(private_key.as_bytes(), &self.store_key, alias)?,
            }),
        }
    }

    fn unseal(
        &self,
        alias: &str,
        sealed: &SealedKey,
        password: Option<&str>,
    ) -> Result<Zeroizing<Vec<u8>>> {
        match &sealed.salt {
            Some(salt) => {
                if salt.len() != SALT_SIZE {
                    return Err(CryptoError::StoreIoFailure(format!("Corrupt key entry {}", alias)));
                }
                let password = password.ok_or(CryptoError::BadPassword)?;
                let key = sealing::derive_key(password, salt, &self.kdf)?;
                sealing::open(&sealed.ciphertext, &key, alias)
            }
            None => {
                // Sealed under the store key: only the store password may be given
                if let Some(password) = password {
                    let key = sealing::derive_key(password, &self.salt, &self.kdf)?;
                    if !safe_is_equal(&key[..], &self.store_key[..]) {
                        return Err(CryptoError::BadPassword);
                    }
                }
                sealing::open(&sealed.ciphertext, &self.store_key, alias)
            }
        }
    }

    /// Writes the whole store to a fresh temporary file and renames it into place
    fn persist(&self, entries: &Entries) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let file = StoreFile {
            version: crate::KEYSTORE_VERSION,
            algorithm: settings::settings().algorithm.as_str().to_string(),
            kdf: self.kdf,
            salt: self.salt.clone(),
            check: self.check.clone(),
            entries,
        };
        let json = serde_json::to_vec_pretty(&file)
            .map_err(|e| CryptoError::Serialization(e.to_string()))?;

        let dir = parent_dir(path).unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| io_failure(dir, e))?;
        tmp.write_all(&json).map_err(|e| io_failure(dir, e))?;
        tmp.as_file().sync_all().map_err(|e| io_failure(dir, e))?;
        tmp.persist(path).map_err(|e| io_failure(path, e.error))?;

        debug!(path = %path.display(), entries = entries.len(), "Persisted key store");
        Ok(())
    }
}

fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}

fn io_failure(path: &Path, e: std::io::Error) -> CryptoError {
    CryptoError::StoreIoFailure(format!("{}: {}", path.display(), e))
}

fn corrupt(path: &Path, e: impl std::fmt::Display) -> CryptoError {
    CryptoError::StoreIoFailure(format!("Corrupt key store {}: {}", path.display(), e))
}
