//! # Validation Error Taxonomy
//!
//! Timeouts and transport faults are transient and consumed by the retry
//! loop; a nack is a definitive answer. Validation failures are terminal
//! and delivered to exactly one failure continuation.

use ndt_types::{Name, SignatureType};
use thiserror::Error;

/// A single certificate-fetch attempt failing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// No response within the interest lifetime. Retryable.
    #[error("Certificate fetch timed out")]
    Timeout,

    /// The network answered with an explicit negative acknowledgement.
    /// Never retried.
    #[error("Certificate fetch was nacked")]
    Nack,

    /// Transport-level failure. Retryable.
    #[error("Certificate fetch transport failure: {0}")]
    Transport(String),
}

/// Terminal validation outcome. Never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The policy rejected the packet before any cryptography ran.
    #[error("Validation policy violation: {0}")]
    PolicyViolation(String),

    /// Every fetch attempt for a certificate failed.
    #[error("Certificate fetch for {interest} exhausted {attempts} attempts")]
    RetriesExhausted {
        /// Name of the unfetchable certificate.
        interest: Name,
        /// Total attempts made (initial try plus retries).
        attempts: u32,
    },

    /// A certificate fetch was nacked; the remaining retry budget is void.
    #[error("Certificate fetch for {interest} was refused")]
    FetchRefused {
        /// Name of the refused certificate.
        interest: Name,
    },

    /// The signature did not verify against the resolved public key.
    #[error("Signature verification failed for {0}")]
    VerificationFailed(Name),

    /// The packet carries a signature type this validator cannot check.
    #[error("Unsupported signature type {0:?}")]
    UnsupportedSignature(SignatureType),
}
