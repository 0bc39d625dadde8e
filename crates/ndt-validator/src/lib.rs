//! # Chain Validation Subsystem
//!
//! Policy-driven validation of signed packets: a [`ValidationPolicy`]
//! decides what each packet needs, a [`CertificateFetcher`] pulls missing
//! certificates off the network (with bounded retries), and the
//! [`Validator`] walks the chain and delivers the outcome to exactly one
//! caller continuation.
//!
//! Built-in policies: [`NoVerifyPolicy`] for closed setups, and
//! [`HierarchicalPolicy`] enforcing namespace-scoped trust rooted at
//! explicit anchors.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod policy;
pub mod ports;
pub mod validator;

// Re-export public API
pub use errors::{FetchError, ValidationError};
pub use policy::{HierarchicalPolicy, NoVerifyPolicy};
pub use ports::{
    CertificateFetcher, CodecVerifier, MemoryFetcher, PolicyDecision, SignatureVerifier,
    ValidationPolicy,
};
pub use validator::Validator;
