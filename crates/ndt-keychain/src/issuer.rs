//! # Self-Signing Issuer
//!
//! Bootstrap path for fresh installations: generate a key for an identity
//! and bind its public half into a self-signed certificate, so the identity
//! is usable for signing before any external issuer is involved.

use crate::catalog::Catalog;
use crate::domain::entities::{CertificateRecord, KeyRecord};
use crate::domain::errors::{CatalogError, SigningError};
use crate::ports::codec::PacketCodec;
use crate::ports::keystore::KeyStoreBackend;
use crate::ports::time::TimeSource;
use crate::resolver::signature_type_for;
use ndt_types::conventions::{make_certificate_name, SELF_ISSUER};
use ndt_types::{Data, DigestAlgorithm, KeyParams, Name, SignatureInfo, ValidityPeriod};

/// Validity of a self-signed certificate: twenty years.
pub const SELF_SIGNED_VALIDITY_SECS: u64 = 20 * 365 * 24 * 60 * 60;

/// Self-sign the named key: build `<key-name>/self/<version>` carrying the
/// public key, sign it with the key itself, and register it in the catalog.
///
/// The version component is the issuing wall-clock millisecond, so repeated
/// self-signing yields distinct, ordered certificate names.
pub fn self_sign(
    catalog: &Catalog,
    keystore: &dyn KeyStoreBackend,
    codec: &dyn PacketCodec,
    time: &dyn TimeSource,
    key_name: &Name,
) -> Result<CertificateRecord, SigningError> {
    let key = match catalog.key(key_name) {
        Ok(key) => key,
        Err(CatalogError::KeyNotFound(name) | CatalogError::IdentityNotFound(name)) => {
            return Err(SigningError::UnknownKey(name))
        }
        Err(other) => return Err(other.into()),
    };

    let now_ms = time.now_ms();
    let cert_name = make_certificate_name(key_name, SELF_ISSUER, now_ms);
    let mut data = Data::new(cert_name, key.public_key.clone());

    let signature_type = signature_type_for(key.key_type, DigestAlgorithm::Sha256)?;
    let mut info = SignatureInfo::new(signature_type, key_name.clone());
    let now_secs = now_ms / 1_000;
    info.validity_period = Some(ValidityPeriod::new(
        now_secs,
        now_secs + SELF_SIGNED_VALIDITY_SECS,
    ));
    data.signature_info = info;

    let portion = codec.data_signed_portion(&data);
    data.signature_value = keystore.sign(&portion, key_name, DigestAlgorithm::Sha256)?;

    let certificate = CertificateRecord::new(data)?;
    catalog.add_certificate(certificate.clone())?;
    tracing::info!(certificate = %certificate.name(), "issued self-signed certificate");
    Ok(certificate)
}

/// Make `identity` usable for signing: reuse its default key when one
/// exists, otherwise generate a key per `params` and self-sign it.
///
/// Returns the identity's default key name.
pub fn ensure_identity(
    catalog: &Catalog,
    keystore: &dyn KeyStoreBackend,
    codec: &dyn PacketCodec,
    time: &dyn TimeSource,
    identity: &Name,
    params: &KeyParams,
) -> Result<Name, SigningError> {
    match catalog.default_key(identity) {
        Ok(key) => return Ok(key.name),
        Err(CatalogError::IdentityNotFound(_) | CatalogError::NoDefaultKey(_)) => {}
        Err(other) => return Err(other.into()),
    }

    let key_name = keystore.create_key(identity, params)?;
    let public_key = keystore.public_key(&key_name)?;
    let key_type = keystore.key_type(&key_name)?;
    catalog.add_key(KeyRecord::new(key_name.clone(), key_type, public_key)?)?;
    self_sign(catalog, keystore, codec, time, &key_name)?;
    tracing::info!(identity = %identity, key = %key_name, "bootstrapped identity");
    Ok(key_name)
}
