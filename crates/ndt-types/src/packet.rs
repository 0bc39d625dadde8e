//! # Packet Boundary Types
//!
//! In-memory shapes of the two packet kinds the trust core touches: `Data`
//! (named, signed content) and `Interest` (a named request). The external
//! codec owns their wire form.

use crate::name::Name;
use crate::signature::SignatureInfo;
use serde::{Deserialize, Serialize};

/// A named, signable content packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Data {
    /// Packet name.
    pub name: Name,
    /// Payload bytes.
    pub content: Vec<u8>,
    /// Signature metadata (defaults to the digest-only form until signed).
    pub signature_info: SignatureInfo,
    /// Signature bytes; empty until the packet is signed.
    pub signature_value: Vec<u8>,
}

impl Data {
    /// Create an unsigned packet.
    pub fn new(name: Name, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name,
            content: content.into(),
            signature_info: SignatureInfo::digest(),
            signature_value: Vec::new(),
        }
    }

    /// True once a signature value has been attached.
    pub fn is_signed(&self) -> bool {
        !self.signature_value.is_empty()
    }
}

/// A named request packet; also the fetch unit for certificates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interest {
    /// Request name.
    pub name: Name,
    /// How long the network should keep the request pending, in ms.
    pub lifetime_ms: u64,
    /// Whether a response may match by prefix rather than exactly.
    pub can_be_prefix: bool,
}

impl Interest {
    /// Default interest lifetime.
    pub const DEFAULT_LIFETIME_MS: u64 = 4_000;

    /// Create an interest with the default lifetime.
    pub fn new(name: Name) -> Self {
        Self {
            name,
            lifetime_ms: Self::DEFAULT_LIFETIME_MS,
            can_be_prefix: false,
        }
    }

    /// Create a prefix-matching interest, as used for certificate fetches.
    pub fn for_prefix(name: Name) -> Self {
        Self {
            name,
            lifetime_ms: Self::DEFAULT_LIFETIME_MS,
            can_be_prefix: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::SignatureType;

    #[test]
    fn test_new_data_is_unsigned() {
        let data = Data::new(Name::parse("/alice/hello").unwrap(), b"hi".to_vec());
        assert!(!data.is_signed());
        assert_eq!(
            data.signature_info.signature_type,
            SignatureType::DigestSha256
        );
    }

    #[test]
    fn test_interest_defaults() {
        let interest = Interest::new(Name::parse("/alice").unwrap());
        assert_eq!(interest.lifetime_ms, Interest::DEFAULT_LIFETIME_MS);
        assert!(!interest.can_be_prefix);
        assert!(Interest::for_prefix(Name::parse("/alice").unwrap()).can_be_prefix);
    }
}
