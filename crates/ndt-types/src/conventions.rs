//! # Naming Conventions
//!
//! Fixed layout of key and certificate names:
//!
//! - key name: `<identity>/KEY/<key-id>`
//! - certificate name: `<key-name>/<issuer-id>/<version>`
//! - self-signed issuer id: `self`
//! - digest-only pseudo-identity: `/localhost/identity/digest-sha256`

use crate::name::{Name, NameComponent};

/// Marker component separating an identity name from its key id.
pub const KEY_COMPONENT: &str = "KEY";

/// Issuer id used by self-signed certificates.
pub const SELF_ISSUER: &str = "self";

/// Reserved pseudo-identity for the digest-only signing path.
///
/// Signing under this identity touches neither the catalog nor the key
/// store; the "signature" is a plain SHA-256 digest of the signed portion.
pub fn digest_identity() -> Name {
    Name::empty()
        .append_str("localhost")
        .append_str("identity")
        .append_str("digest-sha256")
}

/// Build `<identity>/KEY/<key-id>`.
pub fn make_key_name(identity: &Name, key_id: &NameComponent) -> Name {
    let mut name = identity.clone();
    name.push(NameComponent::from(KEY_COMPONENT));
    name.push(key_id.clone());
    name
}

/// True if `name` has the `<identity>/KEY/<key-id>` shape.
pub fn is_key_name(name: &Name) -> bool {
    name.len() >= 2
        && name
            .get(name.len() - 2)
            .map(|c| c.as_bytes() == KEY_COMPONENT.as_bytes())
            .unwrap_or(false)
}

/// Identity prefix of a key name, or `None` when the shape is wrong.
pub fn identity_of_key_name(key_name: &Name) -> Option<Name> {
    if !is_key_name(key_name) {
        return None;
    }
    Some(key_name.prefix(key_name.len() - 2))
}

/// Build `<key-name>/<issuer-id>/<version>`.
pub fn make_certificate_name(key_name: &Name, issuer_id: &str, version: u64) -> Name {
    key_name
        .clone()
        .append_str(issuer_id)
        .append_nonneg_int(version)
}

/// Key-name prefix of a certificate name, or `None` when the shape is wrong.
pub fn key_name_of_certificate(cert_name: &Name) -> Option<Name> {
    if cert_name.len() < 4 {
        return None;
    }
    let key_name = cert_name.prefix(cert_name.len() - 2);
    if !is_key_name(&key_name) {
        return None;
    }
    Some(key_name)
}
