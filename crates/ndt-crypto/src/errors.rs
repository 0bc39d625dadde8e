//! Error types for cryptographic operations.

use thiserror::Error;

/// Errors raised by the software provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Public key bytes did not decode as a valid curve point.
    #[error("Invalid public key encoding")]
    InvalidPublicKey,

    /// Private key bytes did not decode as a valid scalar.
    #[error("Invalid private key encoding")]
    InvalidPrivateKey,

    /// Signing failed inside the curve implementation.
    #[error("Signing failed")]
    SigningFailed,

    /// The signature did not verify against the message and key.
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// Authenticated encryption failed.
    #[error("Encryption failed")]
    EncryptFailed,

    /// Decryption failed: wrong password or corrupted blob.
    #[error("Decryption failed (wrong password or corrupted input)")]
    DecryptFailed,
}
