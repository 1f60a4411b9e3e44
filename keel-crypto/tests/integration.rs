// tests/integration.rs

//! Integration tests for the Keel cryptography crate.
//!
//! Tests the complete cryptographic flow end-to-end including:
//! - Key pair generation and account addresses
//! - Hashing and signing
//! - Single and multi-recipient envelope encryption
//! - Constant-time comparison

use keel_crypto::address::{calc_checksum, to_alias, AddressParams};
use keel_crypto::*;
use keel_crypto::{envelope, hash, keys, signing};
use proptest::prelude::*;
use std::time::Instant;

#[test]
fn test_complete_crypto_flow() {
    // 1. Generate keypairs
    println!("Step 1: Generating keypairs...");
    let alice = keys::generate_keypair();
    let bob = keys::generate_keypair();
    println!("  ✓ Alice: {}", alice.public_key);

    // 2. Hash a message
    println!("Step 2: Hashing message...");
    let message = b"Keel contract call payload";
    let digest = hash::secure_hash(message);
    assert_eq!(digest.len(), DIGEST_SIZE);
    println!("  ✓ Digest: {}", hash::hash_to_hex(&digest));

    // 3. Sign and verify
    println!("Step 3: Signing message...");
    let signature = signing::sign(message, &alice);
    assert!(alice.public_key.verify(message, &signature));
    println!("  ✓ Signature verified ({} bytes)", signature.len());

    // 4. Encrypt for Bob
    println!("Step 4: Encrypting for Bob...");
    let sealed = envelope::encrypt(message, alice.private_key(), &bob.public_key).unwrap();
    let opened = envelope::decrypt(&sealed, bob.private_key(), &alice.public_key).unwrap();
    assert_eq!(opened, message);
    println!("  ✓ Envelope opened");

    // 5. Derive Alice's address
    println!("Step 5: Deriving address...");
    let account = PrivateKeyAccount::new(alice);
    let address = account.address(&AddressParams::new(b'K')).unwrap();
    assert!(!address.is_empty());
    println!("  ✓ Address: {}", address);
}

#[test]
fn test_multi_recipient_flow() {
    let sender = keys::generate_keypair();
    let recipients: Vec<KeyPair> = (0..3).map(|_| keys::generate_keypair()).collect();
    let public_keys: Vec<PublicKey> = recipients.iter().map(|kp| kp.public_key).collect();

    let data = b"validator set update";
    let sealed = envelope::encrypt_for_many(data, sender.private_key(), &public_keys).unwrap();

    let results: Vec<Vec<u8>> = recipients
        .iter()
        .map(|kp| {
            envelope::decrypt_for_many(&sealed, kp.private_key(), &sender.public_key).unwrap()
        })
        .collect();
    assert!(results.iter().all(|r| r == data));

    let fourth = keys::generate_keypair();
    assert_eq!(
        envelope::decrypt_for_many(&sealed, fourth.private_key(), &sender.public_key),
        Err(CryptoError::DecryptionFailed)
    );
}

#[test]
fn test_session_keypair_agreement() {
    let session = keys::generate_session_keypair();
    let recipient = keys::generate_keypair();

    let sealed =
        envelope::encrypt(b"ephemeral", session.private_key(), &recipient.public_key).unwrap();
    let opened = envelope::decrypt(&sealed, recipient.private_key(), session.public_key()).unwrap();
    assert_eq!(opened, b"ephemeral");
}

#[test]
fn test_alias_derivation_is_stable() {
    let kp = keys::generate_keypair_from_seed(&[11u8; 32]);
    let params = AddressParams::new(b'T');
    assert_eq!(
        to_alias(&kp.public_key, &params).unwrap(),
        to_alias(&kp.public_key, &params).unwrap()
    );
}

#[test]
fn test_settings_agree_with_engines() {
    let s = settings::settings();
    let kp = keys::generate_keypair();
    let signature = signing::sign(b"x", &kp);

    assert_eq!(kp.public_key.as_bytes().len(), s.key_length);
    assert_eq!(signature.len(), s.signature_length);
    assert_eq!(hash::secure_hash(b"x").len(), s.digest_size);

    let sealed = envelope::encrypt(b"x", kp.private_key(), &kp.public_key).unwrap();
    assert_eq!(sealed.wrapped_structure.len(), s.wrapped_structure_length);
}

/// Rough timing comparison of early and late mismatches.
///
/// Statistical and machine-dependent, so it only reports.
#[test]
#[ignore]
fn timing_harness_safe_is_equal() {
    const LEN: usize = 4096;
    const ROUNDS: usize = 20_000;

    let base = vec![0xAAu8; LEN];
    let mut early = base.clone();
    early[0] ^= 1;
    let mut late = base.clone();
    late[LEN - 1] ^= 1;

    let measure = |other: &[u8]| {
        let start = Instant::now();
        for _ in 0..ROUNDS {
            let equal = safe_is_equal(std::hint::black_box(&base), std::hint::black_box(other));
            std::hint::black_box(equal);
        }
        start.elapsed()
    };

    let early_time = measure(&early);
    let late_time = measure(&late);
    let ratio = early_time.as_secs_f64() / late_time.as_secs_f64();
    println!("early {:?}, late {:?}, ratio {:.3}", early_time, late_time, ratio);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_secure_hash_fixed_size(data in proptest::collection::vec(any::<u8>(), 0..1024)) {
        prop_assert_eq!(hash::secure_hash(&data).len(), DIGEST_SIZE);
    }

    #[test]
    fn prop_distinct_inputs_distinct_digests(a in proptest::collection::vec(any::<u8>(), 0..64),
                                             b in proptest::collection::vec(any::<u8>(), 0..64)) {
        prop_assume!(a != b);
        prop_assert_ne!(hash::secure_hash(&a), hash::secure_hash(&b));
    }

    #[test]
    fn prop_sign_verify(seed in any::<[u8; 32]>(),
                        message in proptest::collection::vec(any::<u8>(), 0..256)) {
        let kp = keys::generate_keypair_from_seed(&seed);
        let signature = signing::sign(&message, &kp);
        prop_assert!(signing::verify(&message, &signature, kp.public_key.as_bytes()));
    }

    #[test]
    fn prop_bit_flip_rejected(message in proptest::collection::vec(any::<u8>(), 0..128),
                              position in 0usize..(SIGNATURE_LENGTH * 8)) {
        let kp = keys::generate_keypair();
        let mut signature = signing::sign(&message, &kp);
        signature[position / 8] ^= 1 << (position % 8);
        prop_assert!(!signing::verify(&message, &signature, kp.public_key.as_bytes()));
    }

    #[test]
    fn prop_envelope_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        let sender = keys::generate_keypair();
        let recipient = keys::generate_keypair();
        let sealed = envelope::encrypt(&data, sender.private_key(), &recipient.public_key).unwrap();
        let opened =
            envelope::decrypt(&sealed, recipient.private_key(), &sender.public_key).unwrap();
        prop_assert_eq!(opened, data);
    }

    #[test]
    fn prop_checksum_length(data in proptest::collection::vec(any::<u8>(), 0..256)) {
        prop_assert_eq!(calc_checksum(&data, 4).unwrap().len(), 4);
    }
}
