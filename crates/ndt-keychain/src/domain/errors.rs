//! # Error Taxonomy
//!
//! One enum per concern. "Not found", "no default", and "wrong owner" are
//! deliberately distinct variants: an empty default selection is not the
//! same condition as an absent object, and callers test them independently.

use ndt_types::{KeyType, Name};
use thiserror::Error;

/// Construction-time configuration failures. Fatal, never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No factory registered for the locator scheme.
    #[error("Unknown backend scheme '{0}'")]
    UnknownScheme(String),

    /// The locator string is not of the `scheme:location` form.
    #[error("Malformed locator '{0}'")]
    MalformedLocator(String),

    /// The catalog was last paired with a different key store.
    #[error("Catalog is paired with key store '{persisted}' but '{requested}' was requested")]
    LocatorMismatch {
        /// Locator persisted in the catalog.
        persisted: String,
        /// Locator requested for this construction.
        requested: String,
    },

    /// The registry was already frozen by a first construction.
    #[error("Backend registry is frozen; register factories before first use")]
    RegistryFrozen,

    /// The backend failed while being constructed or paired.
    #[error("Backend construction failed: {0}")]
    Backend(String),
}

/// Catalog (public-key metadata store) failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The named identity does not exist.
    #[error("Identity not found: {0}")]
    IdentityNotFound(Name),

    /// The named key does not exist.
    #[error("Key not found: {0}")]
    KeyNotFound(Name),

    /// The named certificate does not exist.
    #[error("Certificate not found: {0}")]
    CertificateNotFound(Name),

    /// No default identity is selected; distinct from "not found".
    #[error("No default identity is set")]
    NoDefaultIdentity,

    /// The identity exists but has no default key.
    #[error("Identity {0} has no default key")]
    NoDefaultKey(Name),

    /// The key exists but has no default certificate.
    #[error("Key {0} has no default certificate")]
    NoDefaultCertificate(Name),

    /// The object exists but belongs to a different owner.
    #[error("{object} belongs to {owner}, not the requested owner")]
    WrongOwner {
        /// The misattributed object.
        object: Name,
        /// Its actual owner.
        owner: Name,
    },

    /// A name does not follow the key/certificate naming convention.
    #[error("Name does not follow the expected convention: {0}")]
    MalformedName(Name),

    /// Backend I/O failure; propagated, never retried here.
    #[error("Catalog backend failure: {0}")]
    Backend(String),
}

/// Key store (private-key material) failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyStoreError {
    /// No private material under the key name. Signing with an unknown key
    /// fails here, never with silent empty output.
    #[error("Key store has no key named {0}")]
    KeyNotFound(Name),

    /// Private material already exists under the key name.
    #[error("Key store already holds a key named {0}")]
    KeyExists(Name),

    /// The backend cannot generate or use this key family.
    #[error("Key type {0:?} is not supported by this key store backend")]
    UnsupportedKeyType(KeyType),

    /// Empty password given to the password-protected export, or a wrong
    /// password given to import.
    #[error("Invalid export/import password")]
    BadPassword,

    /// Cryptographic primitive failure.
    #[error("Crypto failure: {0}")]
    Crypto(#[from] ndt_crypto::CryptoError),

    /// Backend I/O failure.
    #[error("Key store backend failure: {0}")]
    Backend(String),
}

/// Signing-path failures surfaced to the caller of `KeyChain::sign_*`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SigningError {
    /// The request names an identity the catalog does not hold.
    #[error("Signing request names an unknown identity: {0}")]
    UnknownIdentity(Name),

    /// The request names a key the catalog does not hold.
    #[error("Signing request names an unknown key: {0}")]
    UnknownKey(Name),

    /// The request names a certificate whose name cannot be resolved.
    #[error("Signing request names an unknown certificate: {0}")]
    UnknownCertificate(Name),

    /// No signature type is defined for this key-type and digest pairing.
    #[error("No signature type for key type {key_type:?} with digest {digest:?}")]
    UnsupportedAlgorithm {
        /// Key family of the resolved key.
        key_type: KeyType,
        /// Requested digest algorithm.
        digest: ndt_types::DigestAlgorithm,
    },

    /// Catalog failure during resolution.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Key store failure during the signing step.
    #[error(transparent)]
    KeyStore(#[from] KeyStoreError),
}
