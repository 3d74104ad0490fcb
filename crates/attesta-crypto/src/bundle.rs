//! The sealed bundle: the transportable package a sealing operation emits.
//!
//! Pure data aggregation — no cryptographic work happens here. The bundle
//! is self-contained: possession of it plus the recipient's private
//! identity is sufficient to recover the plaintext.
//!
//! # Transport format
//!
//! JSON with base64 text encoding of every binary field and hex for the
//! two hashes:
//!
//! ```json
//! {
//!   "metadata": { "title": "...", "author": "...", ... },
//!   "file_hash": "<hex>",
//!   "core_hash": "<hex>",
//!   "storage_reference": "Qm...",
//!   "recipient_identity": "<base58 signing public key>",
//!   "wrapped_key": "<base64>",
//!   "nonce": "<base64, 12 bytes>",
//!   "tag": "<base64, 16 bytes>",
//!   "ciphertext": "<base64>"
//! }
//! ```
//!
//! All binary fields and both hashes round-trip exactly through their text
//! encoding.

use serde::{Deserialize, Serialize};

use attesta_core::DocumentMetadata;

use crate::cipher::{EncryptedPayload, NONCE_LEN, TAG_LEN};
use crate::error::{CryptoError, CryptoResult};

/// A sealed, tamper-evident, confidentiality-protected document bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedBundle {
    /// Metadata as extracted at sealing time.
    pub metadata: DocumentMetadata,

    /// Hex SHA-256 of the raw file bytes.
    pub file_hash: String,

    /// Hex core hash binding content and metadata; the registry key.
    pub core_hash: String,

    /// Content identifier of the ciphertext in object storage.
    pub storage_reference: String,

    /// Text-encoded signing public key the symmetric key was wrapped to.
    pub recipient_identity: String,

    /// Ephemeral-key-prefixed wrapped symmetric key.
    #[serde(with = "base64_vec")]
    pub wrapped_key: Vec<u8>,

    /// Content-encryption nonce.
    #[serde(with = "base64_array")]
    pub nonce: [u8; NONCE_LEN],

    /// Detached content authentication tag.
    #[serde(with = "base64_array")]
    pub tag: [u8; TAG_LEN],

    /// AES-256-GCM ciphertext of the document body.
    #[serde(with = "base64_vec")]
    pub ciphertext: Vec<u8>,
}

impl SealedBundle {
    /// Assemble a bundle from the outputs of the sealing pipeline.
    #[allow(clippy::too_many_arguments)]
    pub fn assemble(
        metadata: DocumentMetadata,
        file_hash: String,
        core_hash: String,
        storage_reference: String,
        recipient_identity: String,
        payload: EncryptedPayload,
        wrapped_key: Vec<u8>,
    ) -> Self {
        Self {
            metadata,
            file_hash,
            core_hash,
            storage_reference,
            recipient_identity,
            wrapped_key,
            nonce: payload.nonce,
            tag: payload.tag,
            ciphertext: payload.ciphertext,
        }
    }

    /// Parse a bundle from its JSON transport bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MalformedBundle`] when required fields are
    /// absent, binary fields fail base64 decoding, or the hashes are not
    /// 32-byte hex digests.
    pub fn parse(bytes: &[u8]) -> CryptoResult<Self> {
        let bundle: SealedBundle = serde_json::from_slice(bytes)
            .map_err(|e| CryptoError::MalformedBundle(e.to_string()))?;

        for (name, hash) in [("file_hash", &bundle.file_hash), ("core_hash", &bundle.core_hash)] {
            match hex::decode(hash) {
                Ok(digest) if digest.len() == 32 => {}
                _ => {
                    return Err(CryptoError::MalformedBundle(format!(
                        "{name} is not a 32-byte hex digest"
                    )))
                }
            }
        }

        Ok(bundle)
    }

    /// Serialize to JSON transport bytes.
    pub fn to_bytes(&self) -> CryptoResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| CryptoError::MalformedBundle(e.to_string()))
    }
}

/// Serde helper for base64-encoded fixed-size byte arrays.
mod base64_array {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S, const N: usize>(bytes: &[u8; N], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        serializer.serialize_str(&encoded)
    }

    pub fn deserialize<'de, D, const N: usize>(deserializer: D) -> Result<[u8; N], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&s)
            .map_err(serde::de::Error::custom)?;
        if bytes.len() != N {
            return Err(serde::de::Error::custom(format!(
                "expected {} bytes, got {}",
                N,
                bytes.len()
            )));
        }
        let mut arr = [0u8; N];
        arr.copy_from_slice(&bytes);
        Ok(arr)
    }
}

/// Serde helper for base64-encoded variable-length bytes.
mod base64_vec {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        serializer.serialize_str(&encoded)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(&s)
            .map_err(serde::de::Error::custom)
    }
}
