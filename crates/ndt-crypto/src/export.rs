//! # Password-Protected Export Encryption
//!
//! Seals private-key material for interchange: the key is stretched from the
//! password with iterated HMAC-SHA-256 over a random salt, then the payload
//! is sealed with ChaCha20-Poly1305. Blob layout: `salt || nonce || ciphertext`.

use crate::errors::CryptoError;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroize;

const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const STRETCH_ITERATIONS: u32 = 10_000;

type HmacSha256 = Hmac<Sha256>;

/// Stretch a password into a 32-byte cipher key.
fn derive_key(password: &[u8], salt: &[u8]) -> [u8; 32] {
    // Qualified: `Mac::new_from_slice` collides with the aead `KeyInit`
    // method of the same name.
    let mut block = [0u8; 32];
    let mut mac =
        <HmacSha256 as Mac>::new_from_slice(salt).expect("HMAC accepts any salt length");
    mac.update(password);
    block.copy_from_slice(&mac.finalize().into_bytes());

    for _ in 1..STRETCH_ITERATIONS {
        let mut mac =
            <HmacSha256 as Mac>::new_from_slice(salt).expect("HMAC accepts any salt length");
        mac.update(&block);
        block.copy_from_slice(&mac.finalize().into_bytes());
    }
    block
}

/// Seal `plaintext` under `password`.
pub fn seal_with_password(plaintext: &[u8], password: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let mut salt = [0u8; SALT_LEN];
    let mut nonce = [0u8; NONCE_LEN];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    rand::rngs::OsRng.fill_bytes(&mut nonce);

    let mut key = derive_key(password, &salt);
    let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| CryptoError::EncryptFailed)?;
    key.zeroize();

    let mut blob = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Open a blob produced by [`seal_with_password`].
pub fn open_with_password(blob: &[u8], password: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if blob.len() < SALT_LEN + NONCE_LEN {
        return Err(CryptoError::DecryptFailed);
    }
    let (salt, rest) = blob.split_at(SALT_LEN);
    let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

    let mut key = derive_key(password, salt);
    let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::DecryptFailed);
    key.zeroize();
    plaintext
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_open_round_trip() {
        let blob = seal_with_password(b"secret scalar", b"hunter2").unwrap();
        let plain = open_with_password(&blob, b"hunter2").unwrap();
        assert_eq!(plain, b"secret scalar");
    }

    #[test]
    fn test_wrong_password_rejected() {
        let blob = seal_with_password(b"secret scalar", b"hunter2").unwrap();
        assert_eq!(
            open_with_password(&blob, b"hunter3"),
            Err(CryptoError::DecryptFailed)
        );
    }

    #[test]
    fn test_truncated_blob_rejected() {
        assert_eq!(
            open_with_password(&[0u8; 8], b"pw"),
            Err(CryptoError::DecryptFailed)
        );
    }

    #[test]
    fn test_blobs_are_salted() {
        let a = seal_with_password(b"same", b"pw").unwrap();
        let b = seal_with_password(b"same", b"pw").unwrap();
        assert_ne!(a, b);
    }
}
