//! Error taxonomy for sealing and opening operations.
//!
//! Every kind here is caller-distinguishable on purpose: a client must be
//! able to tell "your key is wrong" ([`CryptoError::UnwrapFailure`]) apart
//! from "the bundle was tampered with" ([`CryptoError::AuthenticationFailure`])
//! and from "the bundle is structurally broken"
//! ([`CryptoError::MalformedBundle`]). Cryptographic failures are never
//! silently recovered or retried.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Key input has a length no accepted format uses.
    #[error("Invalid key length: expected {expected}, got {got} bytes")]
    InvalidKeyLength {
        expected: &'static str,
        got: usize,
    },

    /// Key input is not recognizable (bad encoding or invalid curve point).
    #[error("Unsupported key format: {0}")]
    UnsupportedKeyFormat(String),

    /// AEAD tag mismatch - ciphertext tampered with or wrong key.
    #[error("Authentication failed - ciphertext tampered with or wrong key")]
    AuthenticationFailure,

    /// Key-wrap open failed - wrong recipient identity or corrupted wrap.
    #[error("Key unwrap failed - wrong recipient identity or corrupted wrapped key")]
    UnwrapFailure,

    /// Bundle is structurally invalid (missing fields, bad text encoding).
    #[error("Malformed bundle: {0}")]
    MalformedBundle(String),

    /// AEAD encryption failed (plaintext exceeds the cipher's size limit).
    #[error("Encryption failed")]
    EncryptionFailure,
}

/// Result type for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
