//! # File-Backed Catalog Backend (`pib-file:/path`)
//!
//! Persists the catalog document as a JSON file, rewritten after every
//! mutation under an advisory `flock`. The in-memory document is
//! authoritative for this process; the file is the durable copy loaded at
//! open time.

use crate::adapters::document::CatalogDocument;
use crate::domain::entities::{CertificateRecord, KeyRecord};
use crate::domain::errors::CatalogError;
use crate::ports::catalog::CatalogBackend;
use fs2::FileExt;
use ndt_types::Name;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Durable catalog backend.
pub struct FileCatalog {
    path: PathBuf,
    document: Mutex<CatalogDocument>,
}

fn backend_err(err: impl std::fmt::Display) -> CatalogError {
    CatalogError::Backend(err.to_string())
}

impl FileCatalog {
    /// Open (or create) a catalog file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref().to_path_buf();
        let document = if path.exists() {
            let mut file = File::open(&path).map_err(backend_err)?;
            file.lock_shared().map_err(backend_err)?;
            let mut json = String::new();
            let read = file.read_to_string(&mut json);
            file.unlock().map_err(backend_err)?;
            read.map_err(backend_err)?;
            if json.trim().is_empty() {
                CatalogDocument::default()
            } else {
                serde_json::from_str(&json).map_err(backend_err)?
            }
        } else {
            CatalogDocument::default()
        };
        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    fn persist(&self, document: &CatalogDocument) -> Result<(), CatalogError> {
        let json = serde_json::to_vec_pretty(document).map_err(backend_err)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(backend_err)?;
        file.lock_exclusive().map_err(backend_err)?;
        let write = file.write_all(&json).and_then(|_| file.sync_all());
        file.unlock().map_err(backend_err)?;
        write.map_err(backend_err)
    }

    /// Run a mutation against the document and persist the result.
    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut CatalogDocument) -> Result<T, CatalogError>,
    ) -> Result<T, CatalogError> {
        let mut document = self
            .document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let out = op(&mut document)?;
        self.persist(&document)?;
        Ok(out)
    }

    fn read<T>(&self, op: impl FnOnce(&CatalogDocument) -> T) -> T {
        let document = self
            .document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        op(&document)
    }
}

impl CatalogBackend for FileCatalog {
    fn add_identity(&self, identity: &Name) -> Result<(), CatalogError> {
        self.mutate(|doc| {
            doc.add_identity(identity);
            Ok(())
        })
    }

    fn remove_identity(&self, identity: &Name) -> Result<(), CatalogError> {
        self.mutate(|doc| {
            doc.remove_identity(identity);
            Ok(())
        })
    }

    fn has_identity(&self, identity: &Name) -> Result<bool, CatalogError> {
        Ok(self.read(|doc| doc.has_identity(identity)))
    }

    fn identities(&self) -> Result<Vec<Name>, CatalogError> {
        Ok(self.read(|doc| doc.identities()))
    }

    fn set_default_identity(&self, identity: &Name) -> Result<(), CatalogError> {
        self.mutate(|doc| doc.set_default_identity(identity))
    }

    fn default_identity(&self) -> Result<Name, CatalogError> {
        self.read(|doc| doc.default_identity())
    }

    fn add_key(&self, key: KeyRecord) -> Result<(), CatalogError> {
        self.mutate(|doc| {
            doc.add_key(key);
            Ok(())
        })
    }

    fn remove_key(&self, key_name: &Name) -> Result<(), CatalogError> {
        self.mutate(|doc| {
            doc.remove_key(key_name);
            Ok(())
        })
    }

    fn key(&self, key_name: &Name) -> Result<KeyRecord, CatalogError> {
        self.read(|doc| doc.key(key_name))
    }

    fn keys_of(&self, identity: &Name) -> Result<Vec<Name>, CatalogError> {
        self.read(|doc| doc.keys_of(identity))
    }

    fn set_default_key(&self, identity: &Name, key_name: &Name) -> Result<(), CatalogError> {
        self.mutate(|doc| doc.set_default_key(identity, key_name))
    }

    fn default_key(&self, identity: &Name) -> Result<KeyRecord, CatalogError> {
        self.read(|doc| doc.default_key(identity))
    }

    fn add_certificate(&self, certificate: CertificateRecord) -> Result<(), CatalogError> {
        self.mutate(|doc| doc.add_certificate(certificate))
    }

    fn remove_certificate(&self, cert_name: &Name) -> Result<(), CatalogError> {
        self.mutate(|doc| {
            doc.remove_certificate(cert_name);
            Ok(())
        })
    }

    fn certificate(&self, cert_name: &Name) -> Result<CertificateRecord, CatalogError> {
        self.read(|doc| doc.certificate(cert_name))
    }

    fn certificates_of(&self, key_name: &Name) -> Result<Vec<Name>, CatalogError> {
        self.read(|doc| doc.certificates_of(key_name))
    }

    fn set_default_certificate(
        &self,
        key_name: &Name,
        cert_name: &Name,
    ) -> Result<(), CatalogError> {
        self.mutate(|doc| doc.set_default_certificate(key_name, cert_name))
    }

    fn default_certificate(&self, key_name: &Name) -> Result<CertificateRecord, CatalogError> {
        self.read(|doc| doc.default_certificate(key_name))
    }

    fn tpm_locator(&self) -> Result<Option<String>, CatalogError> {
        Ok(self.read(|doc| doc.tpm_locator()))
    }

    fn set_tpm_locator(&self, locator: &str) -> Result<(), CatalogError> {
        self.mutate(|doc| {
            doc.set_tpm_locator(locator);
            Ok(())
        })
    }

    fn reset(&self) -> Result<(), CatalogError> {
        self.mutate(|doc| {
            doc.reset();
            Ok(())
        })
    }
}
