//! # Backend Registries
//!
//! Scheme-to-factory tables for catalog and key store backends. A registry
//! accepts factories until the first `create` call, then freezes: backend
//! selection is a construction-time decision, never a runtime mutation.

use crate::adapters::{FileCatalog, MemoryCatalog, MemoryKeyStore};
use crate::config::Locator;
use crate::domain::errors::ConfigError;
use crate::ports::catalog::CatalogBackend;
use crate::ports::keystore::KeyStoreBackend;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Factory for catalog backends; receives the locator's location part.
pub type CatalogFactory =
    Box<dyn Fn(&str) -> Result<Arc<dyn CatalogBackend>, ConfigError> + Send + Sync>;

/// Factory for key store backends; receives the locator's location part.
pub type KeyStoreFactory =
    Box<dyn Fn(&str) -> Result<Arc<dyn KeyStoreBackend>, ConfigError> + Send + Sync>;

/// Scheme table for catalog backends.
pub struct CatalogRegistry {
    factories: HashMap<String, CatalogFactory>,
    frozen: AtomicBool,
}

impl CatalogRegistry {
    /// Registry pre-populated with the built-in schemes `pib-memory` and
    /// `pib-file`.
    pub fn with_builtins() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
            frozen: AtomicBool::new(false),
        };
        registry.factories.insert(
            "pib-memory".to_string(),
            Box::new(|_location| Ok(Arc::new(MemoryCatalog::new()) as Arc<dyn CatalogBackend>)),
        );
        registry.factories.insert(
            "pib-file".to_string(),
            Box::new(|location| {
                let catalog = FileCatalog::open(location)
                    .map_err(|e| ConfigError::Backend(e.to_string()))?;
                Ok(Arc::new(catalog) as Arc<dyn CatalogBackend>)
            }),
        );
        registry
    }

    /// Register a factory for `scheme`, replacing any existing one.
    ///
    /// Fails with [`ConfigError::RegistryFrozen`] once any backend has been
    /// created from this registry.
    pub fn register(&mut self, scheme: &str, factory: CatalogFactory) -> Result<(), ConfigError> {
        if self.frozen.load(Ordering::SeqCst) {
            return Err(ConfigError::RegistryFrozen);
        }
        self.factories.insert(scheme.to_string(), factory);
        Ok(())
    }

    /// Build a backend for `locator`, freezing the registry.
    pub fn create(&self, locator: &Locator) -> Result<Arc<dyn CatalogBackend>, ConfigError> {
        self.frozen.store(true, Ordering::SeqCst);
        let factory = self
            .factories
            .get(&locator.scheme)
            .ok_or_else(|| ConfigError::UnknownScheme(locator.scheme.clone()))?;
        factory(&locator.location)
    }
}

impl Default for CatalogRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Scheme table for key store backends.
pub struct KeyStoreRegistry {
    factories: HashMap<String, KeyStoreFactory>,
    frozen: AtomicBool,
}

impl KeyStoreRegistry {
    /// Registry pre-populated with the built-in scheme `tpm-memory`.
    pub fn with_builtins() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
            frozen: AtomicBool::new(false),
        };
        registry.factories.insert(
            "tpm-memory".to_string(),
            Box::new(|_location| Ok(Arc::new(MemoryKeyStore::new()) as Arc<dyn KeyStoreBackend>)),
        );
        registry
    }

    /// Register a factory for `scheme`, replacing any existing one.
    ///
    /// Fails with [`ConfigError::RegistryFrozen`] once any backend has been
    /// created from this registry.
    pub fn register(&mut self, scheme: &str, factory: KeyStoreFactory) -> Result<(), ConfigError> {
        if self.frozen.load(Ordering::SeqCst) {
            return Err(ConfigError::RegistryFrozen);
        }
        self.factories.insert(scheme.to_string(), factory);
        Ok(())
    }

    /// Build a backend for `locator`, freezing the registry.
    pub fn create(&self, locator: &Locator) -> Result<Arc<dyn KeyStoreBackend>, ConfigError> {
        self.frozen.store(true, Ordering::SeqCst);
        let factory = self
            .factories
            .get(&locator.scheme)
            .ok_or_else(|| ConfigError::UnknownScheme(locator.scheme.clone()))?;
        factory(&locator.location)
    }
}

impl Default for KeyStoreRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
