//! # In-Memory Key Store Backend (`tpm-memory:`)
//!
//! Software key store: secret scalars live in a mutex-guarded map and are
//! zeroized when deleted. Only ECDSA keys can be generated here; RSA stays a
//! recognized-but-unsupported family so callers get a typed error instead of
//! a silent fallback.

use crate::domain::errors::KeyStoreError;
use crate::ports::keystore::KeyStoreBackend;
use ndt_crypto::ecdsa::EcdsaKeyPair;
use ndt_crypto::export::{open_with_password, seal_with_password};
use ndt_crypto::sha256;
use ndt_types::conventions::make_key_name;
use ndt_types::{DigestAlgorithm, KeyIdScheme, KeyParams, KeyType, Name, NameComponent};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use zeroize::Zeroize;

struct StoredKey {
    key_type: KeyType,
    secret: Vec<u8>,
    public: Vec<u8>,
}

impl Drop for StoredKey {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}

/// Interchange form of an exported private key.
#[derive(Serialize, Deserialize)]
struct KeyExport {
    key_type: KeyType,
    secret: Vec<u8>,
}

/// Volatile software key store.
#[derive(Default)]
pub struct MemoryKeyStore {
    keys: Mutex<HashMap<Name, StoredKey>>,
}

impl MemoryKeyStore {
    /// Create an empty key store.
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> std::sync::MutexGuard<'_, HashMap<Name, StoredKey>> {
        self.keys
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn key_id_for(params: &KeyParams, public: &[u8]) -> NameComponent {
        match &params.key_id {
            KeyIdScheme::UserSpecified(component) => component.clone(),
            KeyIdScheme::Random => {
                let mut id = [0u8; 8];
                rand::rngs::OsRng.fill_bytes(&mut id);
                NameComponent::new(id.to_vec())
            }
            KeyIdScheme::Sha256OfPublicKey => NameComponent::new(sha256(public).to_vec()),
        }
    }
}

impl KeyStoreBackend for MemoryKeyStore {
    fn create_key(&self, identity: &Name, params: &KeyParams) -> Result<Name, KeyStoreError> {
        if params.key_type != KeyType::Ecdsa {
            return Err(KeyStoreError::UnsupportedKeyType(params.key_type));
        }
        let keypair = EcdsaKeyPair::generate();
        let public = keypair.public_key_bytes();
        let key_id = Self::key_id_for(params, &public);
        let key_name = make_key_name(identity, &key_id);

        let mut keys = self.locked();
        if keys.contains_key(&key_name) {
            return Err(KeyStoreError::KeyExists(key_name));
        }
        keys.insert(
            key_name.clone(),
            StoredKey {
                key_type: KeyType::Ecdsa,
                secret: keypair.secret_bytes(),
                public,
            },
        );
        tracing::debug!(key = %key_name, "generated signing key");
        Ok(key_name)
    }

    fn delete_key(&self, key_name: &Name) -> Result<(), KeyStoreError> {
        // Deleting an absent key is a no-op; the Drop impl zeroizes.
        self.locked().remove(key_name);
        Ok(())
    }

    fn has_key(&self, key_name: &Name) -> Result<bool, KeyStoreError> {
        Ok(self.locked().contains_key(key_name))
    }

    fn public_key(&self, key_name: &Name) -> Result<Vec<u8>, KeyStoreError> {
        self.locked()
            .get(key_name)
            .map(|stored| stored.public.clone())
            .ok_or_else(|| KeyStoreError::KeyNotFound(key_name.clone()))
    }

    fn key_type(&self, key_name: &Name) -> Result<KeyType, KeyStoreError> {
        self.locked()
            .get(key_name)
            .map(|stored| stored.key_type)
            .ok_or_else(|| KeyStoreError::KeyNotFound(key_name.clone()))
    }

    fn sign(
        &self,
        data: &[u8],
        key_name: &Name,
        digest: DigestAlgorithm,
    ) -> Result<Vec<u8>, KeyStoreError> {
        let keys = self.locked();
        let stored = keys
            .get(key_name)
            .ok_or_else(|| KeyStoreError::KeyNotFound(key_name.clone()))?;
        let keypair = EcdsaKeyPair::from_secret_bytes(&stored.secret)?;
        let prehash = match digest {
            DigestAlgorithm::Sha256 => sha256(data),
        };
        Ok(keypair.sign_digest(&prehash)?)
    }

    fn export_private_key(
        &self,
        key_name: &Name,
        password: &[u8],
    ) -> Result<Vec<u8>, KeyStoreError> {
        if password.is_empty() {
            return Err(KeyStoreError::BadPassword);
        }
        let mut plain = self.export_private_key_insecure(key_name)?;
        let sealed = seal_with_password(&plain, password);
        plain.zeroize();
        Ok(sealed?)
    }

    fn export_private_key_insecure(&self, key_name: &Name) -> Result<Vec<u8>, KeyStoreError> {
        let keys = self.locked();
        let stored = keys
            .get(key_name)
            .ok_or_else(|| KeyStoreError::KeyNotFound(key_name.clone()))?;
        let export = KeyExport {
            key_type: stored.key_type,
            secret: stored.secret.clone(),
        };
        serde_json::to_vec(&export).map_err(|e| KeyStoreError::Backend(e.to_string()))
    }

    fn import_private_key(
        &self,
        key_name: &Name,
        blob: &[u8],
        password: Option<&[u8]>,
    ) -> Result<(), KeyStoreError> {
        let mut plain = match password {
            Some(password) if !password.is_empty() => open_with_password(blob, password)
                .map_err(|_| KeyStoreError::BadPassword)?,
            Some(_) => return Err(KeyStoreError::BadPassword),
            None => blob.to_vec(),
        };
        let parsed: Result<KeyExport, _> = serde_json::from_slice(&plain);
        plain.zeroize();
        let mut export = parsed.map_err(|e| KeyStoreError::Backend(e.to_string()))?;

        if export.key_type != KeyType::Ecdsa {
            let key_type = export.key_type;
            export.secret.zeroize();
            return Err(KeyStoreError::UnsupportedKeyType(key_type));
        }
        let keypair = EcdsaKeyPair::from_secret_bytes(&export.secret)?;
        let public = keypair.public_key_bytes();

        let mut keys = self.locked();
        if keys.contains_key(key_name) {
            export.secret.zeroize();
            return Err(KeyStoreError::KeyExists(key_name.clone()));
        }
        keys.insert(
            key_name.clone(),
            StoredKey {
                key_type: KeyType::Ecdsa,
                secret: std::mem::take(&mut export.secret),
                public,
            },
        );
        tracing::debug!(key = %key_name, "imported signing key");
        Ok(())
    }
}
