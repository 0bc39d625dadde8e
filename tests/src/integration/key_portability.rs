//! Moving private keys between key stores: password-sealed export, the
//! plaintext interchange path, and signing with an imported key.

use ndt_crypto::{ecdsa::verify_ecdsa, sha256};
use ndt_keychain::adapters::MemoryKeyStore;
use ndt_keychain::{KeyStoreBackend, KeyStoreError};
use ndt_types::{DigestAlgorithm, KeyParams, Name};

fn new_key(store: &MemoryKeyStore) -> Name {
    store
        .create_key(&Name::parse("/alice").unwrap(), &KeyParams::default())
        .unwrap()
}

#[test]
fn test_imported_key_signs_identically() {
    let source = MemoryKeyStore::new();
    let key_name = new_key(&source);
    let blob = source.export_private_key(&key_name, b"hunter2").unwrap();

    let target = MemoryKeyStore::new();
    target
        .import_private_key(&key_name, &blob, Some(b"hunter2"))
        .unwrap();

    assert_eq!(
        hex::encode(target.public_key(&key_name).unwrap()),
        hex::encode(source.public_key(&key_name).unwrap())
    );

    // A signature from the imported copy verifies under the original
    // public key.
    let signature = target
        .sign(b"portable", &key_name, DigestAlgorithm::Sha256)
        .unwrap();
    let public = source.public_key(&key_name).unwrap();
    verify_ecdsa(&public, &sha256(b"portable"), &signature).unwrap();
}

#[test]
fn test_sealed_blob_is_not_plaintext() {
    let source = MemoryKeyStore::new();
    let key_name = new_key(&source);

    let plain = source.export_private_key_insecure(&key_name).unwrap();
    let sealed = source.export_private_key(&key_name, b"hunter2").unwrap();

    // The sealed blob must not embed the plaintext interchange form.
    assert!(sealed.len() > plain.len());
    assert!(!sealed.windows(plain.len()).any(|window| window == &plain[..]));
}

#[test]
fn test_wrong_password_never_imports() {
    let source = MemoryKeyStore::new();
    let key_name = new_key(&source);
    let blob = source.export_private_key(&key_name, b"hunter2").unwrap();

    let target = MemoryKeyStore::new();
    assert_eq!(
        target.import_private_key(&key_name, &blob, Some(b"wrong")),
        Err(KeyStoreError::BadPassword)
    );
    assert!(!target.has_key(&key_name).unwrap());
}

#[test]
fn test_import_over_existing_key_rejected() {
    let source = MemoryKeyStore::new();
    let key_name = new_key(&source);
    let blob = source.export_private_key_insecure(&key_name).unwrap();

    assert_eq!(
        source.import_private_key(&key_name, &blob, None),
        Err(KeyStoreError::KeyExists(key_name))
    );
}

#[test]
fn test_garbage_blob_rejected() {
    let target = MemoryKeyStore::new();
    let key_name = Name::parse("/alice/KEY/k1").unwrap();
    assert!(target
        .import_private_key(&key_name, b"not a key blob", None)
        .is_err());
    assert!(!target.has_key(&key_name).unwrap());
}
