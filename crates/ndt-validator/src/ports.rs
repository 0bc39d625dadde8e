//! # Validator Ports
//!
//! Three seams: the policy deciding what a packet needs, the fetcher pulling
//! certificates off the network, and the verifier checking one signature
//! against one public key.

use crate::errors::{FetchError, ValidationError};
use async_trait::async_trait;
use ndt_crypto::{ecdsa::verify_ecdsa, sha256};
use ndt_keychain::PacketCodec;
use ndt_types::{Data, Interest, SignatureType};
use std::sync::Arc;

/// What the policy wants done with a packet at one chain step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    /// The packet is trusted at this step; no further fetching.
    Accept,
    /// Terminal rejection.
    Fail {
        /// Human-readable rejection reason.
        reason: String,
    },
    /// A certificate must be fetched and validated first.
    Pending {
        /// Interest to express for the certificate.
        fetch: Interest,
        /// Retries allowed after the initial attempt.
        retry_budget: u32,
    },
}

/// Trust policy consulted once per chain step.
pub trait ValidationPolicy: Send + Sync {
    /// Whether this packet's signature must be verified at all.
    fn require_verify(&self, data: &Data) -> bool;

    /// Whether an unverified packet may pass anyway. Consulted only when
    /// [`ValidationPolicy::require_verify`] is false.
    fn skip_and_trust(&self, data: &Data) -> bool;

    /// Decide what `data` needs at chain depth `step`.
    fn check(&self, data: &Data, step: u32) -> PolicyDecision;
}

/// Network seam for pulling certificates.
#[async_trait]
pub trait CertificateFetcher: Send + Sync {
    /// Express `interest` and await the matching certificate packet.
    async fn fetch(&self, interest: &Interest) -> Result<Data, FetchError>;
}

/// One-signature verification seam.
pub trait SignatureVerifier: Send + Sync {
    /// Check the packet's signature value against `public_key`.
    fn verify(&self, data: &Data, public_key: &[u8]) -> Result<(), ValidationError>;
}

/// Verifier driven by the wire codec's signed-portion projection.
pub struct CodecVerifier {
    codec: Arc<dyn PacketCodec>,
}

impl CodecVerifier {
    /// Verifier over the given codec.
    pub fn new(codec: Arc<dyn PacketCodec>) -> Self {
        Self { codec }
    }
}

impl SignatureVerifier for CodecVerifier {
    fn verify(&self, data: &Data, public_key: &[u8]) -> Result<(), ValidationError> {
        let portion = self.codec.data_signed_portion(data);
        let digest = sha256(&portion);
        match data.signature_info.signature_type {
            SignatureType::Sha256WithEcdsa => {
                verify_ecdsa(public_key, &digest, &data.signature_value)
                    .map_err(|_| ValidationError::VerificationFailed(data.name.clone()))
            }
            SignatureType::DigestSha256 => {
                if data.signature_value == digest {
                    Ok(())
                } else {
                    Err(ValidationError::VerificationFailed(data.name.clone()))
                }
            }
            other => Err(ValidationError::UnsupportedSignature(other)),
        }
    }
}

/// In-memory fetcher for tests: serves stored certificates by name prefix
/// and can be told to time out or nack the first N attempts.
pub struct MemoryFetcher {
    certificates: std::sync::Mutex<Vec<Data>>,
    fail_first: std::sync::atomic::AtomicU32,
    nack_first: std::sync::atomic::AtomicU32,
    attempts: std::sync::atomic::AtomicU32,
}

impl Default for MemoryFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFetcher {
    /// Empty fetcher.
    pub fn new() -> Self {
        Self {
            certificates: std::sync::Mutex::new(Vec::new()),
            fail_first: std::sync::atomic::AtomicU32::new(0),
            nack_first: std::sync::atomic::AtomicU32::new(0),
            attempts: std::sync::atomic::AtomicU32::new(0),
        }
    }

    /// Make a certificate fetchable.
    pub fn insert(&self, certificate: Data) {
        self.certificates
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(certificate);
    }

    /// Time out the next `n` fetch attempts.
    pub fn fail_next(&self, n: u32) {
        self.fail_first
            .store(n, std::sync::atomic::Ordering::SeqCst);
    }

    /// Nack the next `n` fetch attempts.
    pub fn nack_next(&self, n: u32) {
        self.nack_first
            .store(n, std::sync::atomic::Ordering::SeqCst);
    }

    /// Total fetch attempts observed.
    pub fn attempts(&self) -> u32 {
        self.attempts.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl CertificateFetcher for MemoryFetcher {
    async fn fetch(&self, interest: &Interest) -> Result<Data, FetchError> {
        self.attempts
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let nacks = self.nack_first.load(std::sync::atomic::Ordering::SeqCst);
        if nacks > 0 {
            self.nack_first
                .store(nacks - 1, std::sync::atomic::Ordering::SeqCst);
            return Err(FetchError::Nack);
        }
        let remaining = self.fail_first.load(std::sync::atomic::Ordering::SeqCst);
        if remaining > 0 {
            self.fail_first
                .store(remaining - 1, std::sync::atomic::Ordering::SeqCst);
            return Err(FetchError::Timeout);
        }
        self.certificates
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .find(|data| {
                if interest.can_be_prefix {
                    interest.name.is_prefix_of(&data.name)
                } else {
                    interest.name == data.name
                }
            })
            .cloned()
            .ok_or(FetchError::Timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndt_keychain::adapters::JsonCodec;
    use ndt_types::Name;

    #[tokio::test]
    async fn test_memory_fetcher_prefix_match() {
        let fetcher = MemoryFetcher::new();
        let cert = Data::new(Name::parse("/alice/KEY/k1/self/%00v").unwrap(), vec![1]);
        fetcher.insert(cert.clone());

        let hit = fetcher
            .fetch(&Interest::for_prefix(Name::parse("/alice/KEY/k1").unwrap()))
            .await
            .unwrap();
        assert_eq!(hit, cert);

        let miss = fetcher
            .fetch(&Interest::for_prefix(Name::parse("/bob/KEY/k1").unwrap()))
            .await;
        assert_eq!(miss, Err(FetchError::Timeout));
        assert_eq!(fetcher.attempts(), 2);
    }

    #[test]
    fn test_codec_verifier_digest_path() {
        let codec: Arc<dyn PacketCodec> = Arc::new(JsonCodec::new());
        let verifier = CodecVerifier::new(codec.clone());

        let mut data = Data::new(Name::parse("/x").unwrap(), b"y".to_vec());
        data.signature_value = sha256(&codec.data_signed_portion(&data)).to_vec();
        assert!(verifier.verify(&data, &[]).is_ok());

        data.content = b"tampered".to_vec();
        assert!(matches!(
            verifier.verify(&data, &[]),
            Err(ValidationError::VerificationFailed(_))
        ));
    }

    #[test]
    fn test_codec_verifier_rejects_rsa() {
        let verifier = CodecVerifier::new(Arc::new(JsonCodec::new()));
        let mut data = Data::new(Name::parse("/x").unwrap(), b"y".to_vec());
        data.signature_info = ndt_types::SignatureInfo::new(
            SignatureType::Sha256WithRsa,
            Name::parse("/a/KEY/k").unwrap(),
        );
        data.signature_value = vec![1];
        assert_eq!(
            verifier.verify(&data, &[]),
            Err(ValidationError::UnsupportedSignature(
                SignatureType::Sha256WithRsa
            ))
        );
    }
}
