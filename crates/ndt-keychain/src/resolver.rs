//! # Signing-Request Resolver
//!
//! Turns a caller-level [`SigningRequest`] into one concrete key plus fully
//! populated signature metadata. Pure catalog lookups; never touches the key
//! store, so resolution cannot leak or exercise private material.

use crate::catalog::Catalog;
use crate::domain::entities::{SignatureEnvelope, SignerSelector, SigningRequest};
use crate::domain::errors::{CatalogError, SigningError};
use ndt_types::conventions::digest_identity;
use ndt_types::{DigestAlgorithm, KeyType, Name, SignatureInfo, SignatureType};

/// Signature type for a key family and digest pairing.
pub fn signature_type_for(
    key_type: KeyType,
    digest: DigestAlgorithm,
) -> Result<SignatureType, SigningError> {
    match (key_type, digest) {
        (KeyType::Ecdsa, DigestAlgorithm::Sha256) => Ok(SignatureType::Sha256WithEcdsa),
        (KeyType::Rsa, DigestAlgorithm::Sha256) => Ok(SignatureType::Sha256WithRsa),
    }
}

/// Resolve `request` against `catalog` into a signature envelope.
pub fn resolve(
    catalog: &Catalog,
    request: &SigningRequest,
) -> Result<SignatureEnvelope, SigningError> {
    let key = match &request.selector {
        SignerSelector::RawDigest => return Ok(digest_envelope(request.digest_algorithm)),
        SignerSelector::Unspecified => match catalog.default_identity() {
            Ok(identity) => catalog.default_key(&identity)?,
            // No identity configured at all: the keyless digest path.
            Err(CatalogError::NoDefaultIdentity) => {
                return Ok(digest_envelope(request.digest_algorithm))
            }
            Err(other) => return Err(other.into()),
        },
        SignerSelector::Identity(identity) => match catalog.default_key(identity) {
            Ok(key) => key,
            Err(CatalogError::IdentityNotFound(name)) => {
                return Err(SigningError::UnknownIdentity(name))
            }
            Err(other) => return Err(other.into()),
        },
        SignerSelector::Key(key_name) => match catalog.key(key_name) {
            Ok(key) => key,
            Err(CatalogError::KeyNotFound(name) | CatalogError::IdentityNotFound(name)) => {
                return Err(SigningError::UnknownKey(name))
            }
            Err(other) => return Err(other.into()),
        },
        SignerSelector::Certificate(cert_name) => {
            let certificate = match catalog.certificate(cert_name) {
                Ok(certificate) => certificate,
                Err(
                    CatalogError::CertificateNotFound(name)
                    | CatalogError::KeyNotFound(name)
                    | CatalogError::IdentityNotFound(name),
                ) => return Err(SigningError::UnknownCertificate(name)),
                Err(other) => return Err(other.into()),
            };
            catalog.key(&certificate.key_name())?
        }
    };

    let signature_type = signature_type_for(key.key_type, request.digest_algorithm)?;
    let mut info = SignatureInfo::new(signature_type, key.name.clone());
    if signature_type.supports_validity_period() {
        info.validity_period = request.validity_override;
    }
    tracing::trace!(key = %key.name, ?signature_type, "resolved signing request");
    Ok(SignatureEnvelope {
        key_name: key.name,
        info,
        digest_algorithm: request.digest_algorithm,
    })
}

fn digest_envelope(digest_algorithm: DigestAlgorithm) -> SignatureEnvelope {
    SignatureEnvelope {
        key_name: digest_identity(),
        info: SignatureInfo::digest(),
        digest_algorithm,
    }
}

/// The pseudo-identity marking the keyless path in a resolved envelope.
pub fn is_digest_key_name(key_name: &Name) -> bool {
    *key_name == digest_identity()
}
