//! # Software Cryptographic Provider
//!
//! Concrete primitives behind the key-store and validator seams:
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `digest` | SHA-256 | Signed-portion digests, key ids |
//! | `ecdsa` | ECDSA (secp256k1, DER signatures) | Key generation, sign, verify |
//! | `export` | ChaCha20-Poly1305 + HMAC-SHA-256 stretch | Password-protected key export |
//!
//! Other algorithm families (RSA in particular) are reachable only through
//! pluggable key-store backends; this crate does not provide them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod digest;
pub mod ecdsa;
pub mod errors;
pub mod export;

// Re-exports
pub use digest::sha256;
pub use ecdsa::{verify_ecdsa, EcdsaKeyPair};
pub use errors::CryptoError;
pub use export::{open_with_password, seal_with_password};
