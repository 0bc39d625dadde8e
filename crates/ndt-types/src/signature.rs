//! # Signature Metadata
//!
//! Types describing how a packet is (to be) signed: the signature-type tag,
//! the key locator, validity windows, and the parameters used to create new
//! keys. The binary encoding of these values belongs to the external codec.

use crate::name::{Name, NameComponent};
use serde::{Deserialize, Serialize};

/// Wire-level signature-type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureType {
    /// Plain SHA-256 digest of the signed portion; carries no key.
    DigestSha256,
    /// RSA signature over a SHA-256 digest.
    Sha256WithRsa,
    /// ECDSA signature over a SHA-256 digest.
    Sha256WithEcdsa,
}

impl SignatureType {
    /// Numeric wire tag.
    pub fn tag(&self) -> u8 {
        match self {
            SignatureType::DigestSha256 => 0,
            SignatureType::Sha256WithRsa => 1,
            SignatureType::Sha256WithEcdsa => 3,
        }
    }

    /// True if this signature type can carry a validity period.
    pub fn supports_validity_period(&self) -> bool {
        !matches!(self, SignatureType::DigestSha256)
    }
}

/// Digest algorithm requested for signing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// SHA-256.
    #[default]
    Sha256,
}

/// Algorithm family of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    /// RSA keys.
    Rsa,
    /// Elliptic-curve (ECDSA) keys.
    Ecdsa,
}

/// Points a verifier at the key or certificate that signed a packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyLocator(pub Name);

impl KeyLocator {
    /// The located name.
    pub fn name(&self) -> &Name {
        &self.0
    }
}

/// Half-open-free validity window in whole seconds since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityPeriod {
    /// First valid second (inclusive).
    pub not_before: u64,
    /// Last valid second (inclusive).
    pub not_after: u64,
}

impl ValidityPeriod {
    /// Create a window; bounds are whole seconds.
    pub fn new(not_before: u64, not_after: u64) -> Self {
        Self {
            not_before,
            not_after,
        }
    }

    /// True if `at_secs` falls inside the window.
    pub fn contains(&self, at_secs: u64) -> bool {
        self.not_before <= at_secs && at_secs <= self.not_after
    }
}

/// Signature metadata attached to a packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureInfo {
    /// Signature-type tag.
    pub signature_type: SignatureType,
    /// Name of the signing key or certificate, when the type carries one.
    pub key_locator: Option<KeyLocator>,
    /// Optional validity window.
    pub validity_period: Option<ValidityPeriod>,
}

impl SignatureInfo {
    /// Metadata for a keyed signature.
    pub fn new(signature_type: SignatureType, key_name: Name) -> Self {
        Self {
            signature_type,
            key_locator: Some(KeyLocator(key_name)),
            validity_period: None,
        }
    }

    /// Metadata for the digest-only path (no key locator).
    pub fn digest() -> Self {
        Self {
            signature_type: SignatureType::DigestSha256,
            key_locator: None,
            validity_period: None,
        }
    }
}

/// How the key id of a new key is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyIdScheme {
    /// Caller supplies the component verbatim.
    UserSpecified(NameComponent),
    /// Eight bytes from a cryptographically secure generator.
    Random,
    /// SHA-256 digest of the public key encoding.
    Sha256OfPublicKey,
}

/// Parameters for creating a key in the key store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyParams {
    /// Algorithm family of the new key.
    pub key_type: KeyType,
    /// Key-id selection scheme.
    pub key_id: KeyIdScheme,
}

impl Default for KeyParams {
    fn default() -> Self {
        Self {
            key_type: KeyType::Ecdsa,
            key_id: KeyIdScheme::Random,
        }
    }
}

impl KeyParams {
    /// ECDSA key with a caller-chosen key id.
    pub fn ecdsa_with_id(key_id: NameComponent) -> Self {
        Self {
            key_type: KeyType::Ecdsa,
            key_id: KeyIdScheme::UserSpecified(key_id),
        }
    }
}
