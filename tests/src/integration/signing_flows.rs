//! End-to-end signing flows: bootstrap an identity, sign data packets and
//! command interests, and exercise every signer-selection level.

use ndt_crypto::{ecdsa::verify_ecdsa, sha256};
use ndt_keychain::adapters::{JsonCodec, MemoryCatalog, MemoryKeyStore};
use ndt_keychain::ports::time::FixedTimeSource;
use ndt_keychain::{KeyChain, KeyStoreBackend, PacketCodec, SigningRequest};
use ndt_types::{Data, Interest, KeyParams, Name, SignatureType};
use std::sync::Arc;

fn keychain() -> KeyChain {
    KeyChain::with_backends(
        Arc::new(MemoryCatalog::new()),
        Arc::new(MemoryKeyStore::new()),
        Arc::new(JsonCodec::new()),
        Arc::new(FixedTimeSource::new(1_700_000_000_000)),
    )
}

#[test]
fn test_bootstrap_then_sign_under_every_selector() {
    let keychain = keychain();
    let alice = Name::parse("/alice").unwrap();
    let key_name = keychain
        .ensure_identity(&alice, &KeyParams::default())
        .unwrap();
    let cert_name = keychain
        .catalog()
        .default_certificate(&key_name)
        .unwrap()
        .name()
        .clone();

    let requests = [
        SigningRequest::unspecified(),
        SigningRequest::by_identity(alice),
        SigningRequest::by_key(key_name.clone()),
        SigningRequest::by_certificate(cert_name),
    ];
    for request in requests {
        let mut data = Data::new(Name::parse("/alice/doc").unwrap(), b"payload".to_vec());
        keychain.sign_data(&mut data, &request).unwrap();
        assert_eq!(
            data.signature_info.key_locator.as_ref().unwrap().name(),
            &key_name,
            "selector {:?} resolved to the wrong key",
            request.selector
        );

        let portion = JsonCodec::new().data_signed_portion(&data);
        let public = keychain.keystore().public_key(&key_name).unwrap();
        verify_ecdsa(&public, &sha256(&portion), &data.signature_value).unwrap();
    }
}

#[test]
fn test_digest_signing_needs_no_keys() {
    let keychain = keychain();
    let mut data = Data::new(Name::parse("/log/entry").unwrap(), b"x".to_vec());
    keychain
        .sign_data(&mut data, &SigningRequest::raw_digest())
        .unwrap();

    assert_eq!(
        data.signature_info.signature_type,
        SignatureType::DigestSha256
    );
    let portion = JsonCodec::new().data_signed_portion(&data);
    assert_eq!(data.signature_value, sha256(&portion).to_vec());
}

#[test]
fn test_two_identities_sign_independently() {
    let keychain = keychain();
    let alice_key = keychain
        .ensure_identity(&Name::parse("/alice").unwrap(), &KeyParams::default())
        .unwrap();
    let bob_key = keychain
        .ensure_identity(&Name::parse("/bob").unwrap(), &KeyParams::default())
        .unwrap();
    assert_ne!(alice_key, bob_key);

    let mut data = Data::new(Name::parse("/bob/doc").unwrap(), b"x".to_vec());
    keychain
        .sign_data(
            &mut data,
            &SigningRequest::by_identity(Name::parse("/bob").unwrap()),
        )
        .unwrap();
    assert_eq!(
        data.signature_info.key_locator.unwrap().name(),
        &bob_key
    );
}

#[test]
fn test_command_interest_stamps_strictly_increase() {
    let keychain = keychain();
    let alice = Name::parse("/alice").unwrap();
    keychain
        .ensure_identity(&alice, &KeyParams::default())
        .unwrap();

    let base = Name::parse("/nfd/rib/register").unwrap();
    let mut stamps = Vec::new();
    for _ in 0..5 {
        let mut interest = Interest::new(base.clone());
        keychain
            .sign_command_interest(&mut interest, &SigningRequest::by_identity(alice.clone()))
            .unwrap();
        // Timestamp is the first appended component.
        stamps.push(
            interest
                .name
                .get(base.len())
                .unwrap()
                .to_nonneg_int()
                .unwrap(),
        );
    }
    // The test clock is frozen, so only the monotonic guard orders these.
    for pair in stamps.windows(2) {
        assert!(pair[1] > pair[0], "stamps not strictly increasing: {stamps:?}");
    }
}

#[test]
fn test_command_interest_nonces_differ() {
    let keychain = keychain();
    let base = Name::parse("/nfd/rib/register").unwrap();

    let mut first = Interest::new(base.clone());
    let mut second = Interest::new(base.clone());
    keychain
        .sign_command_interest(&mut first, &SigningRequest::raw_digest())
        .unwrap();
    keychain
        .sign_command_interest(&mut second, &SigningRequest::raw_digest())
        .unwrap();

    let nonce_of = |interest: &Interest| interest.name.get(base.len() + 1).unwrap().clone();
    assert_ne!(nonce_of(&first), nonce_of(&second));
}

#[test]
fn test_default_key_switch_changes_signer() {
    let keychain = keychain();
    let alice = Name::parse("/alice").unwrap();
    let first_key = keychain
        .ensure_identity(&alice, &KeyParams::default())
        .unwrap();

    let second_key = keychain
        .keystore()
        .create_key(&alice, &KeyParams::default())
        .unwrap();
    let public = keychain.keystore().public_key(&second_key).unwrap();
    keychain
        .catalog()
        .add_key(
            ndt_keychain::KeyRecord::new(second_key.clone(), ndt_types::KeyType::Ecdsa, public)
                .unwrap(),
        )
        .unwrap();
    keychain
        .catalog()
        .set_default_key(&alice, &second_key)
        .unwrap();

    let mut data = Data::new(Name::parse("/alice/doc").unwrap(), b"x".to_vec());
    keychain
        .sign_data(&mut data, &SigningRequest::by_identity(alice))
        .unwrap();
    let signer = data.signature_info.key_locator.unwrap().0;
    assert_eq!(signer, second_key);
    assert_ne!(signer, first_key);
}
