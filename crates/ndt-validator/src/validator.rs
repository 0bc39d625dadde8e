//! # Chain Validator
//!
//! Drives policy decisions to a terminal outcome: walks the certificate
//! chain by fetching whatever the policy marks pending, verifies each link,
//! and delivers the result to exactly one of two caller continuations.

use crate::errors::{FetchError, ValidationError};
use crate::ports::{CertificateFetcher, PolicyDecision, SignatureVerifier, ValidationPolicy};
use ndt_types::{Data, Interest};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Policy-driven asynchronous validator.
pub struct Validator {
    policy: Arc<dyn ValidationPolicy>,
    fetcher: Arc<dyn CertificateFetcher>,
    verifier: Arc<dyn SignatureVerifier>,
}

impl Validator {
    /// Assemble a validator from its three seams.
    pub fn new(
        policy: Arc<dyn ValidationPolicy>,
        fetcher: Arc<dyn CertificateFetcher>,
        verifier: Arc<dyn SignatureVerifier>,
    ) -> Self {
        Self {
            policy,
            fetcher,
            verifier,
        }
    }

    /// Validate a packet and await the outcome directly.
    pub async fn validate_data(&self, data: &Data) -> Result<(), ValidationError> {
        self.validate_step(data, 0).await
    }

    /// Validate a packet on a background task, delivering the outcome to
    /// exactly one of the two continuations. A panicking continuation is
    /// contained and logged; it never tears down the runtime.
    pub fn validate<S, F>(self: &Arc<Self>, data: Data, on_success: S, on_failure: F)
    where
        S: FnOnce(&Data) + Send + 'static,
        F: FnOnce(&Data, ValidationError) + Send + 'static,
    {
        let validator = Arc::clone(self);
        tokio::spawn(async move {
            let result = validator.validate_data(&data).await;
            let delivered = std::panic::catch_unwind(std::panic::AssertUnwindSafe(
                || match result {
                    Ok(()) => on_success(&data),
                    Err(err) => on_failure(&data, err),
                },
            ));
            if delivered.is_err() {
                tracing::error!(packet = %data.name, "validation continuation panicked");
            }
        });
    }

    // Chain depth makes this recursive; the future must box itself.
    fn validate_step<'a>(
        &'a self,
        data: &'a Data,
        step: u32,
    ) -> Pin<Box<dyn Future<Output = Result<(), ValidationError>> + Send + 'a>> {
        Box::pin(async move {
            if !self.policy.require_verify(data) {
                if self.policy.skip_and_trust(data) {
                    return Ok(());
                }
                return Err(ValidationError::PolicyViolation(format!(
                    "{} rejected without verification",
                    data.name
                )));
            }

            match self.policy.check(data, step) {
                PolicyDecision::Accept => {
                    tracing::debug!(packet = %data.name, step, "accepted");
                    Ok(())
                }
                PolicyDecision::Fail { reason } => {
                    tracing::debug!(packet = %data.name, step, %reason, "rejected by policy");
                    Err(ValidationError::PolicyViolation(reason))
                }
                PolicyDecision::Pending {
                    fetch,
                    retry_budget,
                } => {
                    let certificate = self.fetch_with_retries(&fetch, retry_budget).await?;
                    // The fetched certificate is itself untrusted until its
                    // own chain checks out.
                    self.validate_step(&certificate, step + 1).await?;
                    self.verifier.verify(data, &certificate.content)
                }
            }
        })
    }

    async fn fetch_with_retries(
        &self,
        interest: &Interest,
        retry_budget: u32,
    ) -> Result<Data, ValidationError> {
        let attempts = retry_budget + 1;
        for attempt in 1..=attempts {
            match self.fetcher.fetch(interest).await {
                Ok(data) => return Ok(data),
                // A nack is a definitive answer; retrying it cannot succeed.
                Err(FetchError::Nack) => {
                    tracing::debug!(interest = %interest.name, attempt, "certificate fetch nacked");
                    return Err(ValidationError::FetchRefused {
                        interest: interest.name.clone(),
                    });
                }
                Err(err) => {
                    tracing::debug!(interest = %interest.name, attempt, %err, "certificate fetch failed");
                }
            }
        }
        Err(ValidationError::RetriesExhausted {
            interest: interest.name.clone(),
            attempts,
        })
    }
}
