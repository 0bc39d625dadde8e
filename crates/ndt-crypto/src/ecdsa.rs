//! # ECDSA Keys and Signatures
//!
//! secp256k1 keypairs with DER-encoded signatures over SHA-256 prehashes.
//! Public keys travel as compressed SEC1 bytes; secret material is zeroized
//! on drop.

use crate::errors::CryptoError;
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use zeroize::Zeroize;

/// ECDSA keypair.
pub struct EcdsaKeyPair {
    signing_key: SigningKey,
}

impl EcdsaKeyPair {
    /// Generate a random keypair from the OS generator.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::rngs::OsRng);
        Self { signing_key }
    }

    /// Reconstruct a keypair from raw secret scalar bytes.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let signing_key =
            SigningKey::from_slice(bytes).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Raw secret scalar bytes (for export through the key-store seam).
    pub fn secret_bytes(&self) -> Vec<u8> {
        self.signing_key.to_bytes().to_vec()
    }

    /// Compressed SEC1 public key bytes.
    pub fn public_key_bytes(&self) -> Vec<u8> {
        self.signing_key
            .verifying_key()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec()
    }

    /// Sign a 32-byte digest; returns a DER-encoded signature.
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<Vec<u8>, CryptoError> {
        let signature: Signature = self
            .signing_key
            .sign_prehash(digest)
            .map_err(|_| CryptoError::SigningFailed)?;
        Ok(signature.to_der().as_bytes().to_vec())
    }
}

impl Drop for EcdsaKeyPair {
    fn drop(&mut self) {
        // Zeroize secret key material
        let mut bytes = self.signing_key.to_bytes();
        bytes.zeroize();
    }
}

/// Verify a DER-encoded ECDSA signature over a 32-byte digest.
pub fn verify_ecdsa(
    public_key_sec1: &[u8],
    digest: &[u8; 32],
    signature_der: &[u8],
) -> Result<(), CryptoError> {
    let verifying_key =
        VerifyingKey::from_sec1_bytes(public_key_sec1).map_err(|_| CryptoError::InvalidPublicKey)?;
    let signature =
        Signature::from_der(signature_der).map_err(|_| CryptoError::SignatureVerificationFailed)?;
    verifying_key
        .verify_prehash(digest, &signature)
        .map_err(|_| CryptoError::SignatureVerificationFailed)
}
