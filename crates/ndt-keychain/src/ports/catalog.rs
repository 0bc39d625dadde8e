//! # Catalog Backend Port
//!
//! Abstract interface over the public-key metadata store, organized
//! Identity → Key → Certificate with one optional default at each level.
//!
//! Implementations must be safe under concurrent callers (at minimum
//! internally serialized) and may be shared by multiple front-ends.

use crate::domain::entities::{CertificateRecord, KeyRecord};
use crate::domain::errors::CatalogError;
use ndt_types::Name;

/// Abstract interface for catalog storage.
///
/// Semantics every backend must honor:
/// - "add" is idempotent by name: adding an existing name overwrites;
/// - the first object added to an empty collection becomes its default;
/// - default getters on an empty selection fail with a `NoDefault*` error,
///   distinct from `*NotFound`;
/// - removing an identity cascades to its keys and certificates; removing a
///   key cascades to its certificates; removing a default clears the
///   default pointer without electing a replacement.
pub trait CatalogBackend: Send + Sync {
    // =========================================================================
    // Identities
    // =========================================================================

    /// Add an identity (idempotent).
    fn add_identity(&self, identity: &Name) -> Result<(), CatalogError>;

    /// Remove an identity and everything under it.
    fn remove_identity(&self, identity: &Name) -> Result<(), CatalogError>;

    /// True if the identity exists.
    fn has_identity(&self, identity: &Name) -> Result<bool, CatalogError>;

    /// All identity names.
    fn identities(&self) -> Result<Vec<Name>, CatalogError>;

    /// Select the default identity.
    fn set_default_identity(&self, identity: &Name) -> Result<(), CatalogError>;

    /// The default identity, or `NoDefaultIdentity`.
    fn default_identity(&self) -> Result<Name, CatalogError>;

    // =========================================================================
    // Keys
    // =========================================================================

    /// Add a key record (idempotent); creates the owning identity if new.
    fn add_key(&self, key: KeyRecord) -> Result<(), CatalogError>;

    /// Remove a key and its certificates.
    fn remove_key(&self, key_name: &Name) -> Result<(), CatalogError>;

    /// Fetch a key record by name.
    fn key(&self, key_name: &Name) -> Result<KeyRecord, CatalogError>;

    /// Names of the identity's keys.
    fn keys_of(&self, identity: &Name) -> Result<Vec<Name>, CatalogError>;

    /// Select the identity's default key; the key must belong to it.
    fn set_default_key(&self, identity: &Name, key_name: &Name) -> Result<(), CatalogError>;

    /// The identity's default key, or `NoDefaultKey`.
    fn default_key(&self, identity: &Name) -> Result<KeyRecord, CatalogError>;

    // =========================================================================
    // Certificates
    // =========================================================================

    /// Add a certificate (idempotent); the certified key must exist.
    fn add_certificate(&self, certificate: CertificateRecord) -> Result<(), CatalogError>;

    /// Remove a certificate.
    fn remove_certificate(&self, cert_name: &Name) -> Result<(), CatalogError>;

    /// Fetch a certificate by name.
    fn certificate(&self, cert_name: &Name) -> Result<CertificateRecord, CatalogError>;

    /// Names of the key's certificates.
    fn certificates_of(&self, key_name: &Name) -> Result<Vec<Name>, CatalogError>;

    /// Select the key's default certificate; it must belong to the key.
    fn set_default_certificate(
        &self,
        key_name: &Name,
        cert_name: &Name,
    ) -> Result<(), CatalogError>;

    /// The key's default certificate, or `NoDefaultCertificate`.
    fn default_certificate(&self, key_name: &Name) -> Result<CertificateRecord, CatalogError>;

    // =========================================================================
    // Key-store pairing guard
    // =========================================================================

    /// The key-store locator this catalog was last paired with.
    fn tpm_locator(&self) -> Result<Option<String>, CatalogError>;

    /// Persist the paired key-store locator.
    fn set_tpm_locator(&self, locator: &str) -> Result<(), CatalogError>;

    /// Drop all contents and the pairing, adopting a clean state.
    fn reset(&self) -> Result<(), CatalogError>;
}
