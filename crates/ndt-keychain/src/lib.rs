//! # Key Chain Subsystem
//!
//! Trust-management core of the named-data client: obtain, manage, and use
//! keys to sign outgoing packets.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Records, signing requests, error taxonomy
//! - **Ports Layer** (`ports/`): Backend, codec, and clock trait definitions
//! - **Adapters Layer** (`adapters/`): Memory and file backends, test codec
//! - **Service Layer** (`service.rs`): The `KeyChain` front door
//!
//! ## Storage model
//!
//! Two independent, swappable backends with different consistency
//! properties: a public-key **catalog** (identities, keys, certificates,
//! default pointers) and a private-key **store**. Both are selected at
//! construction through a `scheme:location` locator resolved against an
//! explicitly populated registry.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod catalog;
pub mod command_interest;
pub mod config;
pub mod domain;
pub mod issuer;
pub mod ports;
pub mod registry;
pub mod resolver;
pub mod service;

// Re-export public API
pub use catalog::Catalog;
pub use command_interest::{CommandInterestGenerator, MonotonicStamp};
pub use config::{KeyChainConfig, Locator};
pub use domain::entities::{
    CertificateRecord, KeyRecord, SignatureEnvelope, SignerSelector, SigningRequest,
};
pub use domain::errors::{CatalogError, ConfigError, KeyStoreError, SigningError};
pub use ports::catalog::CatalogBackend;
pub use ports::codec::PacketCodec;
pub use ports::keystore::KeyStoreBackend;
pub use ports::time::{SystemTimeSource, TimeSource};
pub use registry::{CatalogRegistry, KeyStoreRegistry};
pub use service::KeyChain;
