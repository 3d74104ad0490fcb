//! Identity key conversion: Ed25519 signing keys to X25519 exchange keys.
//!
//! A certificate holder is identified by a long-term Ed25519 signing key,
//! but the key wrap needs an X25519 key for Diffie-Hellman. Both key types
//! live on Curve25519 — Ed25519 uses the Edwards form, X25519 the
//! Montgomery form — and the conversion is the standard birational map
//! (RFC 8032 §5.1.5 / RFC 7748 §4.1):
//!
//! ```text
//! x25519_public = ed_compressed_point.to_montgomery()
//! x25519_secret = clamp(SHA-512(ed25519_seed)[0..32])
//! ```
//!
//! The output is byte-for-byte identical to libsodium's
//! `crypto_sign_ed25519_pk_to_curve25519` / `..._sk_to_curve25519`, so
//! bundles wrapped here can be opened by any peer built on the same map.

use curve25519_dalek::edwards::CompressedEdwardsY;
use ed25519_dalek::SigningKey;

use crate::error::{CryptoError, CryptoResult};

/// Length of an Ed25519 public key and of an X25519 key, in bytes.
pub const KEY_LEN: usize = 32;

/// Length of an expanded Ed25519 secret key (seed ‖ public), in bytes.
pub const EXPANDED_SECRET_LEN: usize = 64;

/// Convert an Ed25519 signing public key to an X25519 exchange public key.
///
/// # Errors
///
/// Returns [`CryptoError::UnsupportedKeyFormat`] when the bytes are not a
/// decompressible Edwards point.
pub fn signing_pub_to_exchange_pub(signing_pub: &[u8; KEY_LEN]) -> CryptoResult<[u8; KEY_LEN]> {
    let point = CompressedEdwardsY::from_slice(signing_pub)
        .map_err(|_| CryptoError::UnsupportedKeyFormat("invalid edwards encoding".into()))?
        .decompress()
        .ok_or_else(|| {
            CryptoError::UnsupportedKeyFormat("public key is not a valid curve point".into())
        })?;

    Ok(point.to_montgomery().to_bytes())
}

/// Convert an Ed25519 signing private key to an X25519 exchange private key.
///
/// Accepts either a 32-byte seed or a 64-byte expanded secret key
/// (seed ‖ public key, the layout Solana keypair files and libsodium use);
/// the expanded form is reduced to its seed before derivation, matching
/// libsodium byte-for-byte.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidKeyLength`] for any other input length.
pub fn signing_priv_to_exchange_priv(signing_priv: &[u8]) -> CryptoResult<[u8; KEY_LEN]> {
    let seed: [u8; KEY_LEN] = match signing_priv.len() {
        KEY_LEN => signing_priv.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: "32 or 64",
            got: signing_priv.len(),
        })?,
        EXPANDED_SECRET_LEN => signing_priv[..KEY_LEN]
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength {
                expected: "32 or 64",
                got: signing_priv.len(),
            })?,
        other => {
            return Err(CryptoError::InvalidKeyLength {
                expected: "32 or 64",
                got: other,
            })
        }
    };

    // to_scalar_bytes() is the clamped SHA-512 prefix of the seed.
    Ok(SigningKey::from_bytes(&seed).to_scalar_bytes())
}

/// A signing-key input as it arrives at the system boundary.
///
/// Resolved exactly once into fixed-width raw bytes; the core only ever
/// sees the resolved form.
#[derive(Debug, Clone)]
pub enum IdentityInput {
    /// Raw key bytes (32 for public/seed, 64 for expanded secret).
    Bytes(Vec<u8>),
    /// Text-encoded key: base58 (tried first) or hex.
    Encoded(String),
}

impl IdentityInput {
    /// Resolve to raw bytes, decoding text if necessary.
    fn resolve(&self) -> CryptoResult<Vec<u8>> {
        match self {
            IdentityInput::Bytes(bytes) => Ok(bytes.clone()),
            IdentityInput::Encoded(text) => {
                // Base58 first, but only when it yields a plausible key
                // length: a hex key can be valid base58 too, at a length no
                // key format uses.
                if let Ok(bytes) = bs58::decode(text.trim()).into_vec() {
                    if bytes.len() == KEY_LEN || bytes.len() == EXPANDED_SECRET_LEN {
                        return Ok(bytes);
                    }
                }
                hex::decode(text.trim()).map_err(|_| {
                    CryptoError::UnsupportedKeyFormat(
                        "expected base58 or hex encoded key".into(),
                    )
                })
            }
        }
    }

    /// Resolve as a signing public key (exactly 32 bytes).
    pub fn resolve_public(&self) -> CryptoResult<[u8; KEY_LEN]> {
        let bytes = self.resolve()?;
        let got = bytes.len();
        bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength { expected: "32", got })
    }

    /// Resolve as a signing private key (32-byte seed or 64-byte expanded).
    pub fn resolve_private(&self) -> CryptoResult<Vec<u8>> {
        let bytes = self.resolve()?;
        match bytes.len() {
            KEY_LEN | EXPANDED_SECRET_LEN => Ok(bytes),
            got => Err(CryptoError::InvalidKeyLength {
                expected: "32 or 64",
                got,
            }),
        }
    }
}
