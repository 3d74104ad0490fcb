//! AES-256-GCM content encryption with a detached authentication tag.
//!
//! Sealing generates a fresh random 96-bit nonce per call. The nonce must
//! never be reused with the same key — reuse breaks both confidentiality
//! and authenticity of every message under that key. Keys are generated
//! fresh per seal operation and zeroized on drop.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, CryptoResult};

/// Symmetric key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Nonce length in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// Authentication tag length in bytes (128 bits).
pub const TAG_LEN: usize = 16;

/// A 256-bit content-encryption key.
///
/// Generated fresh per seal operation, never persisted in plaintext, and
/// zeroized when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; KEY_LEN]);

impl SymmetricKey {
    /// Generate a fresh random key from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create a key from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Output of [`encrypt`]: ciphertext with its nonce and detached tag.
#[derive(Debug, Clone)]
pub struct EncryptedPayload {
    pub ciphertext: Vec<u8>,
    pub nonce: [u8; NONCE_LEN],
    pub tag: [u8; TAG_LEN],
}

/// Encrypt plaintext with AES-256-GCM under a fresh random nonce.
///
/// No associated data is authenticated. The 16-byte tag the AEAD appends
/// is split off and returned separately so the bundle can carry it as its
/// own field.
pub fn encrypt(plaintext: &[u8], key: &SymmetricKey) -> CryptoResult<EncryptedPayload> {
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let cipher = Aes256Gcm::new(key.as_bytes().into());
    let mut combined = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| CryptoError::EncryptionFailure)?;

    // combined = ciphertext ‖ tag
    let split = combined.len() - TAG_LEN;
    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&combined[split..]);
    combined.truncate(split);

    Ok(EncryptedPayload {
        ciphertext: combined,
        nonce,
        tag,
    })
}

/// Decrypt ciphertext, verifying its detached tag.
///
/// # Errors
///
/// Returns [`CryptoError::AuthenticationFailure`] when the tag does not
/// verify against the ciphertext, nonce and key — tampering or a wrong
/// key. Never returns wrong plaintext silently.
pub fn decrypt(
    ciphertext: &[u8],
    key: &SymmetricKey,
    nonce: &[u8; NONCE_LEN],
    tag: &[u8; TAG_LEN],
) -> CryptoResult<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let mut combined = Vec::with_capacity(ciphertext.len() + TAG_LEN);
    combined.extend_from_slice(ciphertext);
    combined.extend_from_slice(tag);

    cipher
        .decrypt(Nonce::from_slice(nonce), combined.as_slice())
        .map_err(|_| CryptoError::AuthenticationFailure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_generation_is_random() {
        let k1 = SymmetricKey::generate();
        let k2 = SymmetricKey::generate();
        assert_ne!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = SymmetricKey::generate();
        let plaintext = b"%PDF-1.4 certificate body";

        let payload = encrypt(plaintext, &key).unwrap();
        let decrypted = decrypt(&payload.ciphertext, &key, &payload.nonce, &payload.tag).unwrap();

        assert_eq!(plaintext.as_slice(), decrypted.as_slice());
    }

    #[test]
    fn test_encrypt_twice_differs() {
        // Fresh nonce per call: same plaintext and key never repeat output.
        let key = SymmetricKey::generate();
        let plaintext = b"same message";

        let a = encrypt(plaintext, &key).unwrap();
        let b = encrypt(plaintext, &key).unwrap();

        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn test_tag_is_detached() {
        let key = SymmetricKey::generate();
        let plaintext = b"payload";
        let payload = encrypt(plaintext, &key).unwrap();

        assert_eq!(payload.ciphertext.len(), plaintext.len());
        assert_eq!(payload.tag.len(), TAG_LEN);
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let key = SymmetricKey::generate();
        let mut payload = encrypt(b"secret data", &key).unwrap();
        payload.ciphertext[0] ^= 0x01;

        let result = decrypt(&payload.ciphertext, &key, &payload.nonce, &payload.tag);
        assert!(matches!(result, Err(CryptoError::AuthenticationFailure)));
    }

    #[test]
    fn test_every_ciphertext_bit_flip_fails() {
        let key = SymmetricKey::generate();
        let payload = encrypt(b"ab", &key).unwrap();

        for byte in 0..payload.ciphertext.len() {
            for bit in 0..8 {
                let mut tampered = payload.ciphertext.clone();
                tampered[byte] ^= 1 << bit;
                let result = decrypt(&tampered, &key, &payload.nonce, &payload.tag);
                assert!(matches!(result, Err(CryptoError::AuthenticationFailure)));
            }
        }
    }

    #[test]
    fn test_tampered_tag_fails() {
        let key = SymmetricKey::generate();
        let mut payload = encrypt(b"secret data", &key).unwrap();
        payload.tag[TAG_LEN - 1] ^= 0x80;

        let result = decrypt(&payload.ciphertext, &key, &payload.nonce, &payload.tag);
        assert!(matches!(result, Err(CryptoError::AuthenticationFailure)));
    }

    #[test]
    fn test_wrong_key_fails() {
        let key = SymmetricKey::generate();
        let other = SymmetricKey::generate();
        let payload = encrypt(b"secret data", &key).unwrap();

        let result = decrypt(&payload.ciphertext, &other, &payload.nonce, &payload.tag);
        assert!(matches!(result, Err(CryptoError::AuthenticationFailure)));
    }

    #[test]
    fn test_empty_plaintext() {
        let key = SymmetricKey::generate();
        let payload = encrypt(b"", &key).unwrap();
        assert!(payload.ciphertext.is_empty());

        let decrypted = decrypt(&payload.ciphertext, &key, &payload.nonce, &payload.tag).unwrap();
        assert!(decrypted.is_empty());
    }

    #[test]
    fn test_large_plaintext() {
        let key = SymmetricKey::generate();
        let plaintext = vec![0x5au8; 1024 * 1024];

        let payload = encrypt(&plaintext, &key).unwrap();
        let decrypted = decrypt(&payload.ciphertext, &key, &payload.nonce, &payload.tag).unwrap();
        assert_eq!(plaintext, decrypted);
    }

    #[test]
    fn test_key_debug_redacted() {
        let key = SymmetricKey::generate();
        let debug = format!("{:?}", key);
        assert!(debug.contains("REDACTED"));
    }
}
