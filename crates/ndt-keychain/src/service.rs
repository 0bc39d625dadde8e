//! # Key Chain Service
//!
//! The front door: wires a catalog, a key store, the wire codec, and the
//! command-interest generator together behind one `KeyChain` value, and
//! exposes the signing entry points.
//!
//! Construction enforces backend pairing: the catalog remembers which key
//! store it was last used with, and a mismatch is fatal unless the caller
//! opted into resetting the catalog.

use crate::catalog::Catalog;
use crate::command_interest::CommandInterestGenerator;
use crate::config::KeyChainConfig;
use crate::domain::entities::{CertificateRecord, SigningRequest};
use crate::domain::errors::{ConfigError, SigningError};
use crate::issuer;
use crate::ports::catalog::CatalogBackend;
use crate::ports::codec::PacketCodec;
use crate::ports::keystore::KeyStoreBackend;
use crate::ports::time::{SystemTimeSource, TimeSource};
use crate::registry::{CatalogRegistry, KeyStoreRegistry};
use crate::resolver;
use crate::domain::entities::SignatureEnvelope;
use ndt_crypto::sha256;
use ndt_types::{Data, Interest, KeyParams, Name, NameComponent, SignatureType};
use std::sync::Arc;

/// The trust-management front door.
pub struct KeyChain {
    catalog: Catalog,
    keystore: Arc<dyn KeyStoreBackend>,
    codec: Arc<dyn PacketCodec>,
    time: Arc<dyn TimeSource>,
    command_generator: CommandInterestGenerator,
}

impl KeyChain {
    /// Build a key chain from configuration, resolving both backends
    /// through their registries and enforcing the pairing guard.
    pub fn new(
        config: &KeyChainConfig,
        catalogs: &CatalogRegistry,
        keystores: &KeyStoreRegistry,
        codec: Arc<dyn PacketCodec>,
    ) -> Result<Self, ConfigError> {
        let pib_locator = config.resolve_pib_locator()?;
        let tpm_locator = config.resolve_tpm_locator()?;
        tracing::info!(pib = %pib_locator, tpm = %tpm_locator, "constructing key chain");

        let catalog_backend = catalogs.create(&pib_locator)?;
        let keystore = keystores.create(&tpm_locator)?;

        pair(catalog_backend.as_ref(), &tpm_locator.to_string(), config.allow_reset)?;

        let time: Arc<dyn TimeSource> = Arc::new(SystemTimeSource);
        Ok(Self::assemble(catalog_backend, keystore, codec, time))
    }

    /// Build a key chain directly from backends, skipping locator
    /// resolution and pairing. The test constructor.
    pub fn with_backends(
        catalog_backend: Arc<dyn CatalogBackend>,
        keystore: Arc<dyn KeyStoreBackend>,
        codec: Arc<dyn PacketCodec>,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        Self::assemble(catalog_backend, keystore, codec, time)
    }

    fn assemble(
        catalog_backend: Arc<dyn CatalogBackend>,
        keystore: Arc<dyn KeyStoreBackend>,
        codec: Arc<dyn PacketCodec>,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            catalog: Catalog::new(catalog_backend),
            keystore,
            codec,
            command_generator: CommandInterestGenerator::new(time.clone()),
            time,
        }
    }

    /// The catalog facade.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The private-key store.
    pub fn keystore(&self) -> &Arc<dyn KeyStoreBackend> {
        &self.keystore
    }

    /// Sign a data packet in place: resolve the request, attach the
    /// metadata, and fill in the signature value.
    pub fn sign_data(&self, data: &mut Data, request: &SigningRequest) -> Result<(), SigningError> {
        let envelope = resolver::resolve(&self.catalog, request)?;
        data.signature_info = envelope.info.clone();
        let portion = self.codec.data_signed_portion(data);
        data.signature_value = self.sign_bytes(&portion, &envelope)?;
        tracing::debug!(packet = %data.name, key = %envelope.key_name, "signed data packet");
        Ok(())
    }

    /// Sign a command interest in place.
    ///
    /// Appends, in order: the monotonic timestamp, a random nonce, the
    /// encoded signature metadata, and the signature value — four name
    /// components after the caller's command name.
    pub fn sign_command_interest(
        &self,
        interest: &mut Interest,
        request: &SigningRequest,
    ) -> Result<(), SigningError> {
        let envelope = resolver::resolve(&self.catalog, request)?;

        let mut name = self.command_generator.prepare(&interest.name);
        name.push(NameComponent::new(
            self.codec.encode_signature_info(&envelope.info),
        ));

        let portion = self.codec.interest_signed_portion(&name, &envelope.info);
        name.push(NameComponent::new(self.sign_bytes(&portion, &envelope)?));

        tracing::debug!(interest = %name, key = %envelope.key_name, "signed command interest");
        interest.name = name;
        Ok(())
    }

    fn sign_bytes(&self, portion: &[u8], envelope: &SignatureEnvelope) -> Result<Vec<u8>, SigningError> {
        if envelope.info.signature_type == SignatureType::DigestSha256 {
            return Ok(sha256(portion).to_vec());
        }
        Ok(self
            .keystore
            .sign(portion, &envelope.key_name, envelope.digest_algorithm)?)
    }

    /// Make `identity` signable, generating a key and self-signed
    /// certificate when it has none. Returns the default key name.
    pub fn ensure_identity(
        &self,
        identity: &Name,
        params: &KeyParams,
    ) -> Result<Name, SigningError> {
        issuer::ensure_identity(
            &self.catalog,
            self.keystore.as_ref(),
            self.codec.as_ref(),
            self.time.as_ref(),
            identity,
            params,
        )
    }

    /// Issue a fresh self-signed certificate for an existing key.
    pub fn self_sign(&self, key_name: &Name) -> Result<CertificateRecord, SigningError> {
        issuer::self_sign(
            &self.catalog,
            self.keystore.as_ref(),
            self.codec.as_ref(),
            self.time.as_ref(),
            key_name,
        )
    }
}

fn pair(
    catalog: &dyn CatalogBackend,
    requested: &str,
    allow_reset: bool,
) -> Result<(), ConfigError> {
    let persisted = catalog
        .tpm_locator()
        .map_err(|e| ConfigError::Backend(e.to_string()))?;
    match persisted {
        Some(persisted) if persisted != requested => {
            if !allow_reset {
                return Err(ConfigError::LocatorMismatch {
                    persisted,
                    requested: requested.to_string(),
                });
            }
            tracing::warn!(%persisted, %requested, "key store changed; resetting catalog");
            catalog
                .reset()
                .and_then(|_| catalog.set_tpm_locator(requested))
                .map_err(|e| ConfigError::Backend(e.to_string()))
        }
        Some(_) => Ok(()),
        None => catalog
            .set_tpm_locator(requested)
            .map_err(|e| ConfigError::Backend(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{JsonCodec, MemoryCatalog, MemoryKeyStore};
    use crate::ports::time::FixedTimeSource;
    use ndt_crypto::ecdsa::verify_ecdsa;
    use ndt_types::KeyLocator;

    fn keychain() -> KeyChain {
        KeyChain::with_backends(
            Arc::new(MemoryCatalog::new()),
            Arc::new(MemoryKeyStore::new()),
            Arc::new(JsonCodec::new()),
            Arc::new(FixedTimeSource::new(1_700_000_000_000)),
        )
    }

    #[test]
    fn test_construction_pairs_fresh_catalog() {
        let config = KeyChainConfig::for_testing();
        let catalogs = CatalogRegistry::with_builtins();
        let keystores = KeyStoreRegistry::with_builtins();
        let keychain =
            KeyChain::new(&config, &catalogs, &keystores, Arc::new(JsonCodec::new())).unwrap();
        assert_eq!(
            keychain.catalog().tpm_locator().unwrap(),
            Some("tpm-memory:".to_string())
        );
    }

    #[test]
    fn test_pairing_mismatch_is_fatal_without_reset() {
        let backend = MemoryCatalog::new();
        backend.set_tpm_locator("tpm-file:/old").unwrap();
        let result = pair(&backend, "tpm-memory:", false);
        assert_eq!(
            result,
            Err(ConfigError::LocatorMismatch {
                persisted: "tpm-file:/old".to_string(),
                requested: "tpm-memory:".to_string(),
            })
        );
    }

    #[test]
    fn test_pairing_mismatch_resets_when_allowed() {
        let backend = MemoryCatalog::new();
        backend.set_tpm_locator("tpm-file:/old").unwrap();
        backend
            .add_identity(&Name::parse("/stale").unwrap())
            .unwrap();

        pair(&backend, "tpm-memory:", true).unwrap();
        assert_eq!(
            backend.tpm_locator().unwrap(),
            Some("tpm-memory:".to_string())
        );
        assert!(backend.identities().unwrap().is_empty());
    }

    #[test]
    fn test_sign_data_with_generated_key() {
        let keychain = keychain();
        let alice = Name::parse("/alice").unwrap();
        let key_name = keychain
            .ensure_identity(&alice, &KeyParams::default())
            .unwrap();

        let mut data = Data::new(Name::parse("/alice/hello").unwrap(), b"hi".to_vec());
        keychain
            .sign_data(&mut data, &SigningRequest::by_identity(alice))
            .unwrap();

        assert!(data.is_signed());
        assert_eq!(
            data.signature_info.key_locator,
            Some(KeyLocator(key_name.clone()))
        );

        let portion = JsonCodec::new().data_signed_portion(&data);
        let public = keychain.keystore().public_key(&key_name).unwrap();
        verify_ecdsa(&public, &sha256(&portion), &data.signature_value).unwrap();
    }

    #[test]
    fn test_sign_data_digest_path() {
        let keychain = keychain();
        let mut data = Data::new(Name::parse("/x").unwrap(), b"y".to_vec());
        keychain
            .sign_data(&mut data, &SigningRequest::raw_digest())
            .unwrap();

        let portion = JsonCodec::new().data_signed_portion(&data);
        assert_eq!(data.signature_value, sha256(&portion).to_vec());
        assert!(data.signature_info.key_locator.is_none());
    }

    #[test]
    fn test_unspecified_falls_back_to_digest_on_empty_catalog() {
        let keychain = keychain();
        let mut data = Data::new(Name::parse("/x").unwrap(), b"y".to_vec());
        keychain
            .sign_data(&mut data, &SigningRequest::unspecified())
            .unwrap();
        assert_eq!(data.signature_info.signature_type, SignatureType::DigestSha256);
        // The envelope's pseudo-identity never leaks into the packet.
        assert!(data.signature_info.key_locator.is_none());
    }

    #[test]
    fn test_sign_command_interest_appends_four_components() {
        let keychain = keychain();
        let alice = Name::parse("/alice").unwrap();
        keychain
            .ensure_identity(&alice, &KeyParams::default())
            .unwrap();

        let base = Name::parse("/nfd/rib/register").unwrap();
        let mut interest = Interest::new(base.clone());
        keychain
            .sign_command_interest(&mut interest, &SigningRequest::by_identity(alice))
            .unwrap();

        assert_eq!(interest.name.len(), base.len() + 4);
        assert!(base.is_prefix_of(&interest.name));
    }

    #[test]
    fn test_command_interest_signature_verifies() {
        let keychain = keychain();
        let alice = Name::parse("/alice").unwrap();
        let key_name = keychain
            .ensure_identity(&alice, &KeyParams::default())
            .unwrap();

        let mut interest = Interest::new(Name::parse("/nfd/rib/register").unwrap());
        keychain
            .sign_command_interest(&mut interest, &SigningRequest::by_identity(alice.clone()))
            .unwrap();

        // Reconstruct the signed portion: everything up to the signature
        // value component.
        let codec = JsonCodec::new();
        let signed_name = interest.name.prefix(interest.name.len() - 1);
        let info = ndt_types::SignatureInfo::new(SignatureType::Sha256WithEcdsa, key_name.clone());
        let portion = codec.interest_signed_portion(&signed_name, &info);

        let signature = interest
            .name
            .get(interest.name.len() - 1)
            .unwrap()
            .as_bytes();
        let public = keychain.keystore().public_key(&key_name).unwrap();
        verify_ecdsa(&public, &sha256(&portion), signature).unwrap();
    }

    #[test]
    fn test_signing_with_unknown_key_fails_typed() {
        let keychain = keychain();
        let mut data = Data::new(Name::parse("/x").unwrap(), b"y".to_vec());
        let result = keychain.sign_data(
            &mut data,
            &SigningRequest::by_key(Name::parse("/ghost/KEY/k1").unwrap()),
        );
        assert!(matches!(result, Err(SigningError::UnknownKey(_))));
        assert!(!data.is_signed());
    }
}
