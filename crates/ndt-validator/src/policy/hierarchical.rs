//! # Hierarchical Trust Policy
//!
//! A key may sign only packets beneath its own identity namespace, and every
//! chain must terminate at a configured trust anchor within the depth bound.

use crate::ports::{PolicyDecision, SignatureVerifier, ValidationPolicy};
use ndt_keychain::CertificateRecord;
use ndt_types::conventions::identity_of_key_name;
use ndt_types::{Data, Interest, Name};
use std::collections::HashMap;
use std::sync::Arc;

/// Default bound on certificate-chain depth.
pub const DEFAULT_MAX_DEPTH: u32 = 8;

/// Default fetch retries after the initial attempt.
pub const DEFAULT_RETRY_BUDGET: u32 = 3;

/// Namespace-scoped trust policy with explicit anchors.
pub struct HierarchicalPolicy {
    /// Trusted key name to public key encoding.
    anchors: HashMap<Name, Vec<u8>>,
    verifier: Arc<dyn SignatureVerifier>,
    max_depth: u32,
    retry_budget: u32,
}

impl HierarchicalPolicy {
    /// Policy with no anchors yet.
    pub fn new(verifier: Arc<dyn SignatureVerifier>) -> Self {
        Self {
            anchors: HashMap::new(),
            verifier,
            max_depth: DEFAULT_MAX_DEPTH,
            retry_budget: DEFAULT_RETRY_BUDGET,
        }
    }

    /// Trust the named key with the given public key encoding.
    pub fn anchor_key(mut self, key_name: Name, public_key: Vec<u8>) -> Self {
        self.anchors.insert(key_name, public_key);
        self
    }

    /// Trust the key certified by `certificate`.
    pub fn anchor_certificate(self, certificate: &CertificateRecord) -> Self {
        self.anchor_key(certificate.key_name(), certificate.public_key().to_vec())
    }

    /// Override the chain-depth bound.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Override the per-fetch retry budget.
    pub fn with_retry_budget(mut self, retry_budget: u32) -> Self {
        self.retry_budget = retry_budget;
        self
    }
}

impl ValidationPolicy for HierarchicalPolicy {
    fn require_verify(&self, _data: &Data) -> bool {
        true
    }

    fn skip_and_trust(&self, _data: &Data) -> bool {
        false
    }

    fn check(&self, data: &Data, step: u32) -> PolicyDecision {
        if step >= self.max_depth {
            return PolicyDecision::Fail {
                reason: format!("certificate chain exceeds depth {}", self.max_depth),
            };
        }

        let key_name = match &data.signature_info.key_locator {
            Some(locator) => locator.name().clone(),
            None => {
                return PolicyDecision::Fail {
                    reason: format!("{} carries no key locator", data.name),
                }
            }
        };
        let identity = match identity_of_key_name(&key_name) {
            Some(identity) => identity,
            None => {
                return PolicyDecision::Fail {
                    reason: format!("key locator {key_name} is not a key name"),
                }
            }
        };

        // The hierarchical rule: a key signs only beneath its identity.
        if !identity.is_prefix_of(&data.name) {
            return PolicyDecision::Fail {
                reason: format!("key {key_name} is not authorized to sign {}", data.name),
            };
        }

        match self.anchors.get(&key_name) {
            Some(public_key) => match self.verifier.verify(data, public_key) {
                Ok(()) => PolicyDecision::Accept,
                Err(err) => PolicyDecision::Fail {
                    reason: err.to_string(),
                },
            },
            None => PolicyDecision::Pending {
                fetch: Interest::for_prefix(key_name),
                retry_budget: self.retry_budget,
            },
        }
    }
}
