//! # Key Store Backend Port
//!
//! Abstract interface over private-key material. The catalog never sees a
//! private key; the key store never sees certificate metadata. The two are
//! linked only by key names.

use crate::domain::errors::KeyStoreError;
use ndt_types::{DigestAlgorithm, KeyParams, KeyType, Name};

/// Abstract interface for private-key storage.
///
/// Implementations must be safe under concurrent signing callers.
pub trait KeyStoreBackend: Send + Sync {
    /// Generate a key for `identity` per `params`; returns the new key name
    /// (`<identity>/KEY/<key-id>`, key id chosen per the params' scheme).
    fn create_key(&self, identity: &Name, params: &KeyParams) -> Result<Name, KeyStoreError>;

    /// Delete private material under the key name.
    fn delete_key(&self, key_name: &Name) -> Result<(), KeyStoreError>;

    /// True if private material exists under the key name.
    fn has_key(&self, key_name: &Name) -> Result<bool, KeyStoreError>;

    /// Public half of the key, in the backend's public-key encoding.
    fn public_key(&self, key_name: &Name) -> Result<Vec<u8>, KeyStoreError>;

    /// Algorithm family of the stored key.
    fn key_type(&self, key_name: &Name) -> Result<KeyType, KeyStoreError>;

    /// Sign `data` with the named key over the given digest algorithm.
    ///
    /// An unknown key name fails with [`KeyStoreError::KeyNotFound`], never
    /// silent empty output.
    fn sign(
        &self,
        data: &[u8],
        key_name: &Name,
        digest: DigestAlgorithm,
    ) -> Result<Vec<u8>, KeyStoreError>;

    /// Export private material sealed under `password`.
    ///
    /// An empty password fails with [`KeyStoreError::BadPassword`]; use
    /// [`KeyStoreBackend::export_private_key_insecure`] for the explicit
    /// plaintext interchange path.
    fn export_private_key(&self, key_name: &Name, password: &[u8])
        -> Result<Vec<u8>, KeyStoreError>;

    /// Export private material UNENCRYPTED, as a legacy-interchange opt-in.
    fn export_private_key_insecure(&self, key_name: &Name) -> Result<Vec<u8>, KeyStoreError>;

    /// Import private material under the key name; `password` must match
    /// how the blob was exported. Raw import may precede any catalog
    /// registration of the same key name.
    fn import_private_key(
        &self,
        key_name: &Name,
        blob: &[u8],
        password: Option<&[u8]>,
    ) -> Result<(), KeyStoreError>;
}
