//! # Named-Data Trust — Shared Types
//!
//! Value types shared by every crate of the trust core:
//!
//! | Module | Contents |
//! |--------|----------|
//! | `name` | Hierarchical names and components |
//! | `conventions` | Key / certificate naming conventions |
//! | `packet` | `Data` and `Interest` boundary types |
//! | `signature` | Signature metadata, key parameters, validity windows |
//!
//! The binary wire encoding of these types is owned by an external codec;
//! this crate only defines the in-memory shapes and their invariants.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod conventions;
pub mod name;
pub mod packet;
pub mod signature;

// Re-exports
pub use name::{Name, NameComponent, NameError};
pub use packet::{Data, Interest};
pub use signature::{
    DigestAlgorithm, KeyIdScheme, KeyLocator, KeyParams, KeyType, SignatureInfo, SignatureType,
    ValidityPeriod,
};
