//! Durable-catalog flows: signing state surviving reopen, and the
//! catalog/key-store pairing guard across constructions.

use ndt_keychain::adapters::JsonCodec;
use ndt_keychain::{
    CatalogRegistry, ConfigError, KeyChain, KeyChainConfig, KeyStoreRegistry,
};
use ndt_types::{KeyParams, Name};
use std::sync::Arc;

fn file_config(dir: &tempfile::TempDir) -> KeyChainConfig {
    KeyChainConfig {
        pib_locator: Some(format!(
            "pib-file:{}",
            dir.path().join("catalog.json").display()
        )),
        tpm_locator: Some("tpm-memory:".to_string()),
        allow_reset: false,
    }
}

fn build(config: &KeyChainConfig) -> Result<KeyChain, ConfigError> {
    KeyChain::new(
        config,
        &CatalogRegistry::with_builtins(),
        &KeyStoreRegistry::with_builtins(),
        Arc::new(JsonCodec::new()),
    )
}

#[test]
fn test_catalog_state_survives_reconstruction() {
    let dir = tempfile::tempdir().unwrap();
    let config = file_config(&dir);
    let alice = Name::parse("/alice").unwrap();

    let key_name = {
        let keychain = build(&config).unwrap();
        keychain
            .ensure_identity(&alice, &KeyParams::default())
            .unwrap()
    };

    // Fresh construction over the same file sees the identity, its key,
    // and the self-signed certificate.
    let keychain = build(&config).unwrap();
    assert_eq!(keychain.catalog().default_identity().unwrap(), alice);
    assert_eq!(keychain.catalog().default_key(&alice).unwrap().name, key_name);
    assert!(keychain.catalog().default_certificate(&key_name).is_ok());
}

#[test]
fn test_pairing_mismatch_rejected_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = file_config(&dir);
    build(&config).unwrap();

    // Same catalog file, different key store scheme.
    let mut registries = KeyStoreRegistry::with_builtins();
    registries
        .register(
            "tpm-other",
            Box::new(|_| {
                Ok(Arc::new(ndt_keychain::adapters::MemoryKeyStore::new())
                    as Arc<dyn ndt_keychain::KeyStoreBackend>)
            }),
        )
        .unwrap();
    let mismatched = KeyChainConfig {
        tpm_locator: Some("tpm-other:".to_string()),
        ..config.clone()
    };
    let result = KeyChain::new(
        &mismatched,
        &CatalogRegistry::with_builtins(),
        &registries,
        Arc::new(JsonCodec::new()),
    );
    assert!(matches!(
        result,
        Err(ConfigError::LocatorMismatch { .. })
    ));
}

#[test]
fn test_pairing_mismatch_resets_when_opted_in() {
    let dir = tempfile::tempdir().unwrap();
    let config = file_config(&dir);
    {
        let keychain = build(&config).unwrap();
        keychain
            .ensure_identity(&Name::parse("/stale").unwrap(), &KeyParams::default())
            .unwrap();
    }

    let mut registries = KeyStoreRegistry::with_builtins();
    registries
        .register(
            "tpm-other",
            Box::new(|_| {
                Ok(Arc::new(ndt_keychain::adapters::MemoryKeyStore::new())
                    as Arc<dyn ndt_keychain::KeyStoreBackend>)
            }),
        )
        .unwrap();
    let reset_config = KeyChainConfig {
        tpm_locator: Some("tpm-other:".to_string()),
        allow_reset: true,
        ..config.clone()
    };
    let keychain = KeyChain::new(
        &reset_config,
        &CatalogRegistry::with_builtins(),
        &registries,
        Arc::new(JsonCodec::new()),
    )
    .unwrap();

    // Stale catalog entries referencing the old key store are gone.
    assert!(keychain.catalog().identities().unwrap().is_empty());
    assert_eq!(
        keychain.catalog().tpm_locator().unwrap(),
        Some("tpm-other:".to_string())
    );
}

#[test]
fn test_unknown_scheme_is_a_construction_error() {
    let config = KeyChainConfig {
        pib_locator: Some("pib-exotic:".to_string()),
        tpm_locator: Some("tpm-memory:".to_string()),
        allow_reset: false,
    };
    assert_eq!(
        build(&config).err(),
        Some(ConfigError::UnknownScheme("pib-exotic".to_string()))
    );
}

#[test]
fn test_malformed_locator_is_a_construction_error() {
    let config = KeyChainConfig {
        pib_locator: Some("no-colon-here".to_string()),
        tpm_locator: Some("tpm-memory:".to_string()),
        allow_reset: false,
    };
    assert!(matches!(
        build(&config).err(),
        Some(ConfigError::MalformedLocator(_))
    ));
}
