//! # Catalog Front-End
//!
//! Caching facade over a [`CatalogBackend`]. Key and certificate records are
//! cached on read and written through on mutation; removals invalidate the
//! affected entries (and, for identities and keys, everything beneath them).
//! Misses always consult the backend and negative results are never cached,
//! so records added behind this facade's back are still found.

use crate::domain::entities::{CertificateRecord, KeyRecord};
use crate::domain::errors::CatalogError;
use crate::ports::catalog::CatalogBackend;
use ndt_types::Name;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct CatalogCache {
    keys: HashMap<Name, KeyRecord>,
    certificates: HashMap<Name, CertificateRecord>,
}

/// Caching catalog facade.
pub struct Catalog {
    backend: Arc<dyn CatalogBackend>,
    cache: Mutex<CatalogCache>,
}

impl Catalog {
    /// Wrap a backend.
    pub fn new(backend: Arc<dyn CatalogBackend>) -> Self {
        Self {
            backend,
            cache: Mutex::new(CatalogCache::default()),
        }
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, CatalogCache> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register an identity (idempotent).
    pub fn add_identity(&self, identity: &Name) -> Result<(), CatalogError> {
        self.backend.add_identity(identity)
    }

    /// Remove an identity and everything beneath it.
    pub fn remove_identity(&self, identity: &Name) -> Result<(), CatalogError> {
        self.backend.remove_identity(identity)?;
        let mut cache = self.cache();
        cache.keys.retain(|_, record| record.identity != *identity);
        cache
            .certificates
            .retain(|_, record| record.identity() != *identity);
        Ok(())
    }

    /// True if the identity is registered.
    pub fn has_identity(&self, identity: &Name) -> Result<bool, CatalogError> {
        self.backend.has_identity(identity)
    }

    /// All registered identities.
    pub fn identities(&self) -> Result<Vec<Name>, CatalogError> {
        self.backend.identities()
    }

    /// Select the default identity.
    pub fn set_default_identity(&self, identity: &Name) -> Result<(), CatalogError> {
        self.backend.set_default_identity(identity)
    }

    /// Currently selected default identity.
    pub fn default_identity(&self) -> Result<Name, CatalogError> {
        self.backend.default_identity()
    }

    /// Register a key record (idempotent; creates the identity).
    pub fn add_key(&self, key: KeyRecord) -> Result<(), CatalogError> {
        self.backend.add_key(key.clone())?;
        self.cache().keys.insert(key.name.clone(), key);
        Ok(())
    }

    /// Remove a key and its certificates.
    pub fn remove_key(&self, key_name: &Name) -> Result<(), CatalogError> {
        self.backend.remove_key(key_name)?;
        let mut cache = self.cache();
        cache.keys.remove(key_name);
        cache
            .certificates
            .retain(|_, record| record.key_name() != *key_name);
        Ok(())
    }

    /// Look up a key record, by cache first.
    pub fn key(&self, key_name: &Name) -> Result<KeyRecord, CatalogError> {
        if let Some(record) = self.cache().keys.get(key_name) {
            return Ok(record.clone());
        }
        let record = self.backend.key(key_name)?;
        self.cache().keys.insert(key_name.clone(), record.clone());
        Ok(record)
    }

    /// Names of the identity's keys.
    pub fn keys_of(&self, identity: &Name) -> Result<Vec<Name>, CatalogError> {
        self.backend.keys_of(identity)
    }

    /// Select the identity's default key.
    pub fn set_default_key(&self, identity: &Name, key_name: &Name) -> Result<(), CatalogError> {
        self.backend.set_default_key(identity, key_name)
    }

    /// The identity's default key record.
    pub fn default_key(&self, identity: &Name) -> Result<KeyRecord, CatalogError> {
        // The default pointer can move at any time, so this always asks the
        // backend; only the record itself is cached.
        let record = self.backend.default_key(identity)?;
        self.cache()
            .keys
            .insert(record.name.clone(), record.clone());
        Ok(record)
    }

    /// Register a certificate (idempotent; the certified key must exist).
    pub fn add_certificate(&self, certificate: CertificateRecord) -> Result<(), CatalogError> {
        self.backend.add_certificate(certificate.clone())?;
        self.cache()
            .certificates
            .insert(certificate.name().clone(), certificate);
        Ok(())
    }

    /// Remove a certificate.
    pub fn remove_certificate(&self, cert_name: &Name) -> Result<(), CatalogError> {
        self.backend.remove_certificate(cert_name)?;
        self.cache().certificates.remove(cert_name);
        Ok(())
    }

    /// Look up a certificate, by cache first.
    pub fn certificate(&self, cert_name: &Name) -> Result<CertificateRecord, CatalogError> {
        if let Some(record) = self.cache().certificates.get(cert_name) {
            return Ok(record.clone());
        }
        let record = self.backend.certificate(cert_name)?;
        self.cache()
            .certificates
            .insert(cert_name.clone(), record.clone());
        Ok(record)
    }

    /// Names of the key's certificates.
    pub fn certificates_of(&self, key_name: &Name) -> Result<Vec<Name>, CatalogError> {
        self.backend.certificates_of(key_name)
    }

    /// Select the key's default certificate.
    pub fn set_default_certificate(
        &self,
        key_name: &Name,
        cert_name: &Name,
    ) -> Result<(), CatalogError> {
        self.backend.set_default_certificate(key_name, cert_name)
    }

    /// The key's default certificate record.
    pub fn default_certificate(&self, key_name: &Name) -> Result<CertificateRecord, CatalogError> {
        let record = self.backend.default_certificate(key_name)?;
        self.cache()
            .certificates
            .insert(record.name().clone(), record.clone());
        Ok(record)
    }

    /// Key store locator persisted by the last pairing.
    pub fn tpm_locator(&self) -> Result<Option<String>, CatalogError> {
        self.backend.tpm_locator()
    }

    /// Persist the paired key store locator.
    pub fn set_tpm_locator(&self, locator: &str) -> Result<(), CatalogError> {
        self.backend.set_tpm_locator(locator)
    }

    /// Wipe the catalog, including the pairing record and this cache.
    pub fn reset(&self) -> Result<(), CatalogError> {
        self.backend.reset()?;
        let mut cache = self.cache();
        cache.keys.clear();
        cache.certificates.clear();
        Ok(())
    }
}
