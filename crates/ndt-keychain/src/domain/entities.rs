//! # Domain Records
//!
//! Catalog records (identity, key, certificate), the caller-facing
//! `SigningRequest`, and the resolver's `SignatureEnvelope` output.
//!
//! A `KeyRecord` is metadata only: the private half lives exclusively in the
//! key store under the same key name.

use crate::domain::errors::CatalogError;
use ndt_types::conventions;
use ndt_types::{
    Data, DigestAlgorithm, KeyType, Name, SignatureInfo, ValidityPeriod,
};
use serde::{Deserialize, Serialize};

/// A named principal owning keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// The identity's name prefix.
    pub name: Name,
}

/// Public-half metadata of a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRecord {
    /// Key name, `<identity>/KEY/<key-id>`.
    pub name: Name,
    /// Owning identity, derived from the name.
    pub identity: Name,
    /// Algorithm family.
    pub key_type: KeyType,
    /// Public key encoding.
    pub public_key: Vec<u8>,
}

impl KeyRecord {
    /// Build a record, deriving the identity from the key name.
    ///
    /// Fails with [`CatalogError::MalformedName`] when the name does not
    /// follow the `<identity>/KEY/<key-id>` convention.
    pub fn new(
        name: Name,
        key_type: KeyType,
        public_key: Vec<u8>,
    ) -> Result<Self, CatalogError> {
        let identity = conventions::identity_of_key_name(&name)
            .ok_or_else(|| CatalogError::MalformedName(name.clone()))?;
        Ok(Self {
            name,
            identity,
            key_type,
            public_key,
        })
    }
}

/// A signed binding of a key's public half to a versioned name and a
/// validity window. Wraps the underlying `Data` packet whose content is the
/// public key encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    data: Data,
}

impl CertificateRecord {
    /// Wrap a certificate packet, validating its name shape.
    pub fn new(data: Data) -> Result<Self, CatalogError> {
        if conventions::key_name_of_certificate(&data.name).is_none() {
            return Err(CatalogError::MalformedName(data.name.clone()));
        }
        Ok(Self { data })
    }

    /// Certificate name, `<key-name>/<issuer-id>/<version>`.
    pub fn name(&self) -> &Name {
        &self.data.name
    }

    /// Name of the certified key.
    pub fn key_name(&self) -> Name {
        // Shape was validated at construction.
        self.data.name.prefix(self.data.name.len() - 2)
    }

    /// Owning identity of the certified key.
    pub fn identity(&self) -> Name {
        let key_name = self.key_name();
        key_name.prefix(key_name.len() - 2)
    }

    /// Public key encoding carried as content.
    pub fn public_key(&self) -> &[u8] {
        &self.data.content
    }

    /// Validity window, when the signature type carries one.
    pub fn validity_period(&self) -> Option<ValidityPeriod> {
        self.data.signature_info.validity_period
    }

    /// The underlying packet.
    pub fn data(&self) -> &Data {
        &self.data
    }
}

/// Which signer the caller is asking for. Four levels of indirection plus
/// the keyless digest path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerSelector {
    /// Use the default identity; fall back to the digest path if none.
    Unspecified,
    /// Use the named identity's default key.
    Identity(Name),
    /// Use exactly the named key.
    Key(Name),
    /// Use the key derived from the named certificate.
    Certificate(Name),
    /// Keyless SHA-256 digest "signature".
    RawDigest,
}

/// A caller-supplied signing specification. Immutable and per-call; never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningRequest {
    /// Signer selection.
    pub selector: SignerSelector,
    /// Digest algorithm to sign over.
    pub digest_algorithm: DigestAlgorithm,
    /// Optional validity window copied into the signature metadata.
    pub validity_override: Option<ValidityPeriod>,
}

impl Default for SigningRequest {
    fn default() -> Self {
        Self::unspecified()
    }
}

impl SigningRequest {
    fn with_selector(selector: SignerSelector) -> Self {
        Self {
            selector,
            digest_algorithm: DigestAlgorithm::Sha256,
            validity_override: None,
        }
    }

    /// Sign with the default identity (digest fallback when none exists).
    pub fn unspecified() -> Self {
        Self::with_selector(SignerSelector::Unspecified)
    }

    /// Sign with the named identity's default key.
    pub fn by_identity(identity: Name) -> Self {
        Self::with_selector(SignerSelector::Identity(identity))
    }

    /// Sign with exactly the named key.
    pub fn by_key(key_name: Name) -> Self {
        Self::with_selector(SignerSelector::Key(key_name))
    }

    /// Sign with the key named by the certificate.
    pub fn by_certificate(cert_name: Name) -> Self {
        Self::with_selector(SignerSelector::Certificate(cert_name))
    }

    /// Keyless digest path.
    pub fn raw_digest() -> Self {
        Self::with_selector(SignerSelector::RawDigest)
    }

    /// Request a validity window in the signature metadata.
    pub fn with_validity(mut self, period: ValidityPeriod) -> Self {
        self.validity_override = Some(period);
        self
    }

    /// Override the digest algorithm.
    pub fn with_digest_algorithm(mut self, digest: DigestAlgorithm) -> Self {
        self.digest_algorithm = digest;
        self
    }
}

/// Resolver output: one concrete key plus populated signature metadata.
/// The signature value is filled in by the separate signing step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureEnvelope {
    /// Resolved key name (the digest pseudo-identity on the keyless path).
    pub key_name: Name,
    /// Populated signature metadata.
    pub info: SignatureInfo,
    /// Digest algorithm carried through to the signing step.
    pub digest_algorithm: DigestAlgorithm,
}
