// tests/keystore.rs

//! File-backed key store tests.

use keel_crypto::{keys, signing, CryptoError};
use keel_keystore::{Certificate, KdfParams, KeyStore};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn fast() -> KdfParams {
    KdfParams { memory_kib: 1024, iterations: 1, parallelism: 1 }
}

#[test]
fn test_store_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keystore.json");

    let keypair = keys::generate_keypair();
    let generated = {
        let store = KeyStore::open_with(&path, "store-pw", fast()).unwrap();
        store.set_key_pair("validator", &keypair, Some("entry-pw")).unwrap();
        store.set_certificate_entry("root", Certificate::from_der(vec![0x30, 0x03])).unwrap();
        store.generate_and_store(None).unwrap()
    };

    let store = KeyStore::open(&path, "store-pw").unwrap();
    assert_eq!(store.len(), 3);
    assert_eq!(store.get_key_pair("validator", Some("entry-pw")).unwrap(), keypair);
    assert_eq!(store.get_certificate("root").unwrap().der(), &[0x30, 0x03]);

    let alias = generated.to_base58();
    let key = store.get_key(&alias, None).unwrap();
    let signature = signing::sign(b"block", &key);
    assert!(generated.verify(b"block", &signature));
}

#[test]
fn test_wrong_store_password() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keystore.json");
    KeyStore::open_with(&path, "right", fast()).unwrap();

    assert_eq!(KeyStore::open(&path, "wrong").err(), Some(CryptoError::BadPassword));
}

#[test]
fn test_wrong_entry_password_after_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keystore.json");
    {
        let store = KeyStore::open_with(&path, "store-pw", fast()).unwrap();
        store.set_key_pair("a", &keys::generate_keypair(), Some("entry-pw")).unwrap();
    }

    let store = KeyStore::open(&path, "store-pw").unwrap();
    assert_eq!(store.get_key("a", Some("guess")).unwrap_err(), CryptoError::BadPassword);
}

#[test]
fn test_contains_alias() {
    let store = KeyStore::in_memory_with("pw", fast()).unwrap();
    store.set_key_pair("a", &keys::generate_keypair(), None).unwrap();

    assert!(store.contains_alias("a").unwrap());
    assert!(!store.contains_alias("b").unwrap());
}

#[test]
fn test_nested_directory_is_created() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("keystore.json");

    let store = KeyStore::open_with(&path, "pw", fast()).unwrap();
    assert!(path.exists());
    assert_eq!(store.path(), Some(path.as_path()));
}

#[test]
fn test_concurrent_generate_and_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keystore.json");
    let store = Arc::new(KeyStore::open_with(&path, "pw", fast()).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.generate_and_store(None).unwrap())
        })
        .collect();

    let mut generated: Vec<String> = handles
        .into_iter()
        .map(|h| h.join().unwrap().to_base58())
        .collect();
    generated.sort();

    assert_eq!(store.aliases(), generated);

    let reopened = KeyStore::open(&path, "pw").unwrap();
    assert_eq!(reopened.aliases(), generated);
}

#[test]
fn test_two_handles_share_alias_space() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keystore.json");
    let a = KeyStore::open_with(&path, "pw", fast()).unwrap();
    let b = KeyStore::open(&path, "pw").unwrap();

    let first = keys::generate_keypair();
    a.set_key_pair("validator", &first, None).unwrap();
    assert_eq!(
        b.set_key_pair("validator", &keys::generate_keypair(), None).unwrap_err(),
        CryptoError::AliasExists("validator".to_string())
    );

    assert!(b.contains_alias("validator").unwrap());
    assert_eq!(b.get_key_pair("validator", None).unwrap(), first);
}

#[test]
fn test_two_handles_do_not_lose_writes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keystore.json");
    let a = KeyStore::open_with(&path, "pw", fast()).unwrap();
    let b = KeyStore::open(&path, "pw").unwrap();

    b.set_key_pair("from-b", &keys::generate_keypair(), None).unwrap();
    a.set_key_pair("from-a", &keys::generate_keypair(), None).unwrap();
    assert_eq!(a.aliases(), vec!["from-a", "from-b"]);

    b.delete_entry("from-a").unwrap();
    assert!(!a.contains_alias("from-a").unwrap());

    let reopened = KeyStore::open(&path, "pw").unwrap();
    assert_eq!(reopened.aliases(), vec!["from-b"]);
}

#[test]
fn test_concurrent_writes_through_separate_handles() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keystore.json");
    KeyStore::open_with(&path, "pw", fast()).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let path = path.clone();
            thread::spawn(move || {
                let store = KeyStore::open(&path, "pw").unwrap();
                let alias = format!("node-{}", i);
                store.set_key_pair(&alias, &keys::generate_keypair(), None).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let reopened = KeyStore::open(&path, "pw").unwrap();
    assert_eq!(reopened.aliases(), vec!["node-0", "node-1", "node-2", "node-3"]);
}

#[test]
fn test_replaced_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keystore.json");
    let a = KeyStore::open_with(&path, "pw", fast()).unwrap();

    std::fs::remove_file(&path).unwrap();
    KeyStore::open_with(&path, "other", fast()).unwrap();

    assert!(matches!(a.contains_alias("x"), Err(CryptoError::StoreIoFailure(_))));
    assert!(matches!(
        a.set_key_pair("x", &keys::generate_keypair(), None),
        Err(CryptoError::StoreIoFailure(_))
    ));
}
