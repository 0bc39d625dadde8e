//! # Catalog Document
//!
//! The pure, serializable state shared by the memory and file catalog
//! backends, with all default-pointer and cascade semantics in one place.
//! Backends differ only in how they persist and serialize access to it.

use crate::domain::entities::{CertificateRecord, KeyRecord};
use crate::domain::errors::CatalogError;
use ndt_types::conventions;
use ndt_types::Name;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub(crate) struct CatalogDocument {
    identities: BTreeMap<Name, IdentityEntry>,
    default_identity: Option<Name>,
    tpm_locator: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct IdentityEntry {
    keys: BTreeMap<Name, KeyEntry>,
    default_key: Option<Name>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct KeyEntry {
    record: KeyRecord,
    certificates: BTreeMap<Name, CertificateRecord>,
    default_certificate: Option<Name>,
}

impl CatalogDocument {
    // =========================================================================
    // Identities
    // =========================================================================

    pub fn add_identity(&mut self, identity: &Name) {
        self.identities.entry(identity.clone()).or_default();
        // First identity becomes default.
        if self.default_identity.is_none() {
            self.default_identity = Some(identity.clone());
        }
    }

    pub fn remove_identity(&mut self, identity: &Name) {
        self.identities.remove(identity);
        if self.default_identity.as_ref() == Some(identity) {
            self.default_identity = None;
        }
    }

    pub fn has_identity(&self, identity: &Name) -> bool {
        self.identities.contains_key(identity)
    }

    pub fn identities(&self) -> Vec<Name> {
        self.identities.keys().cloned().collect()
    }

    pub fn set_default_identity(&mut self, identity: &Name) -> Result<(), CatalogError> {
        if !self.identities.contains_key(identity) {
            return Err(CatalogError::IdentityNotFound(identity.clone()));
        }
        self.default_identity = Some(identity.clone());
        Ok(())
    }

    pub fn default_identity(&self) -> Result<Name, CatalogError> {
        self.default_identity
            .clone()
            .ok_or(CatalogError::NoDefaultIdentity)
    }

    // =========================================================================
    // Keys
    // =========================================================================

    pub fn add_key(&mut self, key: KeyRecord) {
        if self.default_identity.is_none() {
            self.default_identity = Some(key.identity.clone());
        }
        let entry = self.identities.entry(key.identity.clone()).or_default();
        let key_name = key.name.clone();
        entry
            .keys
            .entry(key_name.clone())
            .and_modify(|existing| existing.record = key.clone())
            .or_insert_with(|| KeyEntry {
                record: key,
                certificates: BTreeMap::new(),
                default_certificate: None,
            });
        // First key becomes default; a later one does not displace it.
        if entry.default_key.is_none() {
            entry.default_key = Some(key_name);
        }
    }

    pub fn remove_key(&mut self, key_name: &Name) {
        if let Some(identity) = conventions::identity_of_key_name(key_name) {
            if let Some(entry) = self.identities.get_mut(&identity) {
                entry.keys.remove(key_name);
                if entry.default_key.as_ref() == Some(key_name) {
                    entry.default_key = None;
                }
            }
        }
    }

    fn key_entry(&self, key_name: &Name) -> Result<&KeyEntry, CatalogError> {
        let identity = conventions::identity_of_key_name(key_name)
            .ok_or_else(|| CatalogError::MalformedName(key_name.clone()))?;
        self.identities
            .get(&identity)
            .and_then(|entry| entry.keys.get(key_name))
            .ok_or_else(|| CatalogError::KeyNotFound(key_name.clone()))
    }

    fn key_entry_mut(&mut self, key_name: &Name) -> Result<&mut KeyEntry, CatalogError> {
        let identity = conventions::identity_of_key_name(key_name)
            .ok_or_else(|| CatalogError::MalformedName(key_name.clone()))?;
        self.identities
            .get_mut(&identity)
            .and_then(|entry| entry.keys.get_mut(key_name))
            .ok_or_else(|| CatalogError::KeyNotFound(key_name.clone()))
    }

    pub fn key(&self, key_name: &Name) -> Result<KeyRecord, CatalogError> {
        Ok(self.key_entry(key_name)?.record.clone())
    }

    pub fn keys_of(&self, identity: &Name) -> Result<Vec<Name>, CatalogError> {
        let entry = self
            .identities
            .get(identity)
            .ok_or_else(|| CatalogError::IdentityNotFound(identity.clone()))?;
        Ok(entry.keys.keys().cloned().collect())
    }

    pub fn set_default_key(
        &mut self,
        identity: &Name,
        key_name: &Name,
    ) -> Result<(), CatalogError> {
        // Ownership check before mutating anything.
        let actual_owner = conventions::identity_of_key_name(key_name)
            .ok_or_else(|| CatalogError::MalformedName(key_name.clone()))?;
        if &actual_owner != identity {
            return Err(CatalogError::WrongOwner {
                object: key_name.clone(),
                owner: actual_owner,
            });
        }
        let entry = self
            .identities
            .get_mut(identity)
            .ok_or_else(|| CatalogError::IdentityNotFound(identity.clone()))?;
        if !entry.keys.contains_key(key_name) {
            return Err(CatalogError::KeyNotFound(key_name.clone()));
        }
        entry.default_key = Some(key_name.clone());
        Ok(())
    }

    pub fn default_key(&self, identity: &Name) -> Result<KeyRecord, CatalogError> {
        let entry = self
            .identities
            .get(identity)
            .ok_or_else(|| CatalogError::IdentityNotFound(identity.clone()))?;
        let key_name = entry
            .default_key
            .as_ref()
            .ok_or_else(|| CatalogError::NoDefaultKey(identity.clone()))?;
        Ok(entry
            .keys
            .get(key_name)
            .ok_or_else(|| CatalogError::KeyNotFound(key_name.clone()))?
            .record
            .clone())
    }

    // =========================================================================
    // Certificates
    // =========================================================================

    pub fn add_certificate(
        &mut self,
        certificate: CertificateRecord,
    ) -> Result<(), CatalogError> {
        let key_name = certificate.key_name();
        let cert_name = certificate.name().clone();
        let entry = self.key_entry_mut(&key_name)?;
        entry.certificates.insert(cert_name.clone(), certificate);
        if entry.default_certificate.is_none() {
            entry.default_certificate = Some(cert_name);
        }
        Ok(())
    }

    pub fn remove_certificate(&mut self, cert_name: &Name) {
        let Some(key_name) = conventions::key_name_of_certificate(cert_name) else {
            return;
        };
        if let Ok(entry) = self.key_entry_mut(&key_name) {
            entry.certificates.remove(cert_name);
            if entry.default_certificate.as_ref() == Some(cert_name) {
                entry.default_certificate = None;
            }
        }
    }

    pub fn certificate(&self, cert_name: &Name) -> Result<CertificateRecord, CatalogError> {
        let key_name = conventions::key_name_of_certificate(cert_name)
            .ok_or_else(|| CatalogError::MalformedName(cert_name.clone()))?;
        self.key_entry(&key_name)
            .ok()
            .and_then(|entry| entry.certificates.get(cert_name).cloned())
            .ok_or_else(|| CatalogError::CertificateNotFound(cert_name.clone()))
    }

    pub fn certificates_of(&self, key_name: &Name) -> Result<Vec<Name>, CatalogError> {
        Ok(self
            .key_entry(key_name)?
            .certificates
            .keys()
            .cloned()
            .collect())
    }

    pub fn set_default_certificate(
        &mut self,
        key_name: &Name,
        cert_name: &Name,
    ) -> Result<(), CatalogError> {
        let actual_key = conventions::key_name_of_certificate(cert_name)
            .ok_or_else(|| CatalogError::MalformedName(cert_name.clone()))?;
        if &actual_key != key_name {
            return Err(CatalogError::WrongOwner {
                object: cert_name.clone(),
                owner: actual_key,
            });
        }
        let entry = self.key_entry_mut(key_name)?;
        if !entry.certificates.contains_key(cert_name) {
            return Err(CatalogError::CertificateNotFound(cert_name.clone()));
        }
        entry.default_certificate = Some(cert_name.clone());
        Ok(())
    }

    pub fn default_certificate(
        &self,
        key_name: &Name,
    ) -> Result<CertificateRecord, CatalogError> {
        let entry = self.key_entry(key_name)?;
        let cert_name = entry
            .default_certificate
            .as_ref()
            .ok_or_else(|| CatalogError::NoDefaultCertificate(key_name.clone()))?;
        entry
            .certificates
            .get(cert_name)
            .cloned()
            .ok_or_else(|| CatalogError::CertificateNotFound(cert_name.clone()))
    }

    // =========================================================================
    // Pairing
    // =========================================================================

    pub fn tpm_locator(&self) -> Option<String> {
        self.tpm_locator.clone()
    }

    pub fn set_tpm_locator(&mut self, locator: &str) {
        self.tpm_locator = Some(locator.to_string());
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
