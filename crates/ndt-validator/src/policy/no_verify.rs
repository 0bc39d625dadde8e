//! # No-Verification Policy
//!
//! Accepts everything without touching a signature. For closed test setups
//! and local development only.

use crate::ports::{PolicyDecision, ValidationPolicy};
use ndt_types::Data;

/// Policy that trusts every packet unchecked.
#[derive(Default)]
pub struct NoVerifyPolicy;

impl NoVerifyPolicy {
    /// Create the policy.
    pub fn new() -> Self {
        Self
    }
}

impl ValidationPolicy for NoVerifyPolicy {
    fn require_verify(&self, _data: &Data) -> bool {
        false
    }

    fn skip_and_trust(&self, _data: &Data) -> bool {
        true
    }

    fn check(&self, _data: &Data, _step: u32) -> PolicyDecision {
        PolicyDecision::Accept
    }
}
