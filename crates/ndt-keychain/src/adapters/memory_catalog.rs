//! # In-Memory Catalog Backend (`pib-memory:`)
//!
//! A mutex over the shared catalog document. Used as the platform default
//! and throughout the test suites; semantics live in the document itself.

use crate::adapters::document::CatalogDocument;
use crate::domain::entities::{CertificateRecord, KeyRecord};
use crate::domain::errors::CatalogError;
use crate::ports::catalog::CatalogBackend;
use ndt_types::Name;
use std::sync::Mutex;

/// Volatile catalog backend.
#[derive(Default)]
pub struct MemoryCatalog {
    document: Mutex<CatalogDocument>,
}

impl MemoryCatalog {
    /// Create an empty in-memory catalog.
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> std::sync::MutexGuard<'_, CatalogDocument> {
        // A poisoned catalog mutex means a writer panicked mid-update;
        // the document itself is still structurally sound.
        self.document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CatalogBackend for MemoryCatalog {
    fn add_identity(&self, identity: &Name) -> Result<(), CatalogError> {
        self.locked().add_identity(identity);
        Ok(())
    }

    fn remove_identity(&self, identity: &Name) -> Result<(), CatalogError> {
        self.locked().remove_identity(identity);
        Ok(())
    }

    fn has_identity(&self, identity: &Name) -> Result<bool, CatalogError> {
        Ok(self.locked().has_identity(identity))
    }

    fn identities(&self) -> Result<Vec<Name>, CatalogError> {
        Ok(self.locked().identities())
    }

    fn set_default_identity(&self, identity: &Name) -> Result<(), CatalogError> {
        self.locked().set_default_identity(identity)
    }

    fn default_identity(&self) -> Result<Name, CatalogError> {
        self.locked().default_identity()
    }

    fn add_key(&self, key: KeyRecord) -> Result<(), CatalogError> {
        self.locked().add_key(key);
        Ok(())
    }

    fn remove_key(&self, key_name: &Name) -> Result<(), CatalogError> {
        self.locked().remove_key(key_name);
        Ok(())
    }

    fn key(&self, key_name: &Name) -> Result<KeyRecord, CatalogError> {
        self.locked().key(key_name)
    }

    fn keys_of(&self, identity: &Name) -> Result<Vec<Name>, CatalogError> {
        self.locked().keys_of(identity)
    }

    fn set_default_key(&self, identity: &Name, key_name: &Name) -> Result<(), CatalogError> {
        self.locked().set_default_key(identity, key_name)
    }

    fn default_key(&self, identity: &Name) -> Result<KeyRecord, CatalogError> {
        self.locked().default_key(identity)
    }

    fn add_certificate(&self, certificate: CertificateRecord) -> Result<(), CatalogError> {
        self.locked().add_certificate(certificate)
    }

    fn remove_certificate(&self, cert_name: &Name) -> Result<(), CatalogError> {
        self.locked().remove_certificate(cert_name);
        Ok(())
    }

    fn certificate(&self, cert_name: &Name) -> Result<CertificateRecord, CatalogError> {
        self.locked().certificate(cert_name)
    }

    fn certificates_of(&self, key_name: &Name) -> Result<Vec<Name>, CatalogError> {
        self.locked().certificates_of(key_name)
    }

    fn set_default_certificate(
        &self,
        key_name: &Name,
        cert_name: &Name,
    ) -> Result<(), CatalogError> {
        self.locked().set_default_certificate(key_name, cert_name)
    }

    fn default_certificate(&self, key_name: &Name) -> Result<CertificateRecord, CatalogError> {
        self.locked().default_certificate(key_name)
    }

    fn tpm_locator(&self) -> Result<Option<String>, CatalogError> {
        Ok(self.locked().tpm_locator())
    }

    fn set_tpm_locator(&self, locator: &str) -> Result<(), CatalogError> {
        self.locked().set_tpm_locator(locator);
        Ok(())
    }

    fn reset(&self) -> Result<(), CatalogError> {
        self.locked().reset();
        Ok(())
    }
}
