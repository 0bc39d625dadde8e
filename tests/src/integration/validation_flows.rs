//! Signer on one side, validator on the other: packets signed through the
//! key chain validated over a fetched certificate chain.

use ndt_keychain::adapters::{JsonCodec, MemoryCatalog, MemoryKeyStore};
use ndt_keychain::ports::time::FixedTimeSource;
use ndt_keychain::{KeyChain, KeyStoreBackend, PacketCodec, SigningRequest};
use ndt_types::conventions::make_certificate_name;
use ndt_types::{
    Data, DigestAlgorithm, KeyParams, Name, SignatureInfo, SignatureType,
};
use ndt_validator::{
    CodecVerifier, HierarchicalPolicy, MemoryFetcher, SignatureVerifier, ValidationError,
    Validator,
};
use std::sync::Arc;

struct TrustDomain {
    keychain: KeyChain,
    fetcher: Arc<MemoryFetcher>,
    anchor_key: Name,
    producer_key: Name,
}

/// A root identity `/campus` whose key certifies a producer key under
/// `/campus/printer`; the producer's certificate is served by the fetcher.
fn trust_domain() -> TrustDomain {
    crate::init_tracing();
    let keychain = KeyChain::with_backends(
        Arc::new(MemoryCatalog::new()),
        Arc::new(MemoryKeyStore::new()),
        Arc::new(JsonCodec::new()),
        Arc::new(FixedTimeSource::new(1_700_000_000_000)),
    );
    let anchor_key = keychain
        .ensure_identity(&Name::parse("/campus").unwrap(), &KeyParams::default())
        .unwrap();
    let producer_key = keychain
        .ensure_identity(
            &Name::parse("/campus/printer").unwrap(),
            &KeyParams::default(),
        )
        .unwrap();

    let codec = JsonCodec::new();
    let mut certificate = Data::new(
        make_certificate_name(&producer_key, "campus", 1),
        keychain.keystore().public_key(&producer_key).unwrap(),
    );
    certificate.signature_info =
        SignatureInfo::new(SignatureType::Sha256WithEcdsa, anchor_key.clone());
    let portion = codec.data_signed_portion(&certificate);
    certificate.signature_value = keychain
        .keystore()
        .sign(&portion, &anchor_key, DigestAlgorithm::Sha256)
        .unwrap();

    let fetcher = Arc::new(MemoryFetcher::new());
    fetcher.insert(certificate);

    TrustDomain {
        keychain,
        fetcher,
        anchor_key,
        producer_key,
    }
}

fn validator(domain: &TrustDomain) -> Arc<Validator> {
    let verifier: Arc<dyn SignatureVerifier> =
        Arc::new(CodecVerifier::new(Arc::new(JsonCodec::new())));
    let anchor_public = domain
        .keychain
        .keystore()
        .public_key(&domain.anchor_key)
        .unwrap();
    let policy = HierarchicalPolicy::new(verifier.clone())
        .anchor_key(domain.anchor_key.clone(), anchor_public);
    Arc::new(Validator::new(
        Arc::new(policy),
        domain.fetcher.clone(),
        verifier,
    ))
}

fn producer_data(domain: &TrustDomain) -> Data {
    let mut data = Data::new(
        Name::parse("/campus/printer/status").unwrap(),
        b"idle".to_vec(),
    );
    domain
        .keychain
        .sign_data(
            &mut data,
            &SigningRequest::by_key(domain.producer_key.clone()),
        )
        .unwrap();
    data
}

#[tokio::test]
async fn test_signed_packet_validates_through_fetched_chain() {
    let domain = trust_domain();
    let data = producer_data(&domain);
    validator(&domain).validate_data(&data).await.unwrap();
    assert_eq!(domain.fetcher.attempts(), 1);
}

#[tokio::test]
async fn test_wrong_signer_rejected() {
    let domain = trust_domain();

    // Sign /campus/printer data with the anchor key of a *different* run:
    // the chain for this key locator cannot be fetched.
    let other = trust_domain();
    let mut data = Data::new(
        Name::parse("/campus/printer/status").unwrap(),
        b"idle".to_vec(),
    );
    other
        .keychain
        .sign_data(
            &mut data,
            &SigningRequest::by_key(other.producer_key.clone()),
        )
        .unwrap();

    // The foreign producer key has a different key id, so the fetcher
    // serves no certificate for it.
    let result = validator(&domain).validate_data(&data).await;
    assert!(matches!(
        result,
        Err(ValidationError::RetriesExhausted { .. }) | Err(ValidationError::VerificationFailed(_))
    ));
}

#[tokio::test]
async fn test_continuations_deliver_on_background_task() {
    let domain = trust_domain();
    let validator = validator(&domain);

    let (ok_tx, ok_rx) = tokio::sync::oneshot::channel::<Name>();
    validator.validate(
        producer_data(&domain),
        move |data| {
            ok_tx.send(data.name.clone()).unwrap();
        },
        |_, err| panic!("unexpected failure: {err}"),
    );
    assert_eq!(
        ok_rx.await.unwrap(),
        Name::parse("/campus/printer/status").unwrap()
    );

    let mut forged = producer_data(&domain);
    forged.content = b"jammed".to_vec();
    let (fail_tx, fail_rx) = tokio::sync::oneshot::channel::<ValidationError>();
    validator.validate(
        forged,
        |_| panic!("success continuation must not fire"),
        move |_, err| {
            fail_tx.send(err).unwrap();
        },
    );
    assert!(matches!(
        fail_rx.await.unwrap(),
        ValidationError::VerificationFailed(_)
    ));
}

#[tokio::test]
async fn test_digest_packets_fail_hierarchical_policy() {
    let domain = trust_domain();
    let mut data = Data::new(Name::parse("/campus/printer/log").unwrap(), b"x".to_vec());
    domain
        .keychain
        .sign_data(&mut data, &SigningRequest::raw_digest())
        .unwrap();

    // No key locator: the policy rejects before any fetch.
    assert!(matches!(
        validator(&domain).validate_data(&data).await,
        Err(ValidationError::PolicyViolation(_))
    ));
    assert_eq!(domain.fetcher.attempts(), 0);
}
