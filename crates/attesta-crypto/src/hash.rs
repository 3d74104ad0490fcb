//! Hash engine: file hash, metadata canonicalization and the core hash.
//!
//! The core hash is the system's primary key — it is anchored on the
//! ledger, stored in the registry and recomputed at verification time — so
//! everything here must be a pure function of its inputs. No randomness,
//! no timestamps.
//!
//! # Canonicalization v1
//!
//! Metadata is serialized as compact JSON with keys sorted
//! lexicographically before hashing, so two semantically equal mappings
//! hash identically regardless of field insertion order:
//!
//! ```text
//! {"author":"B","num_pages":1,"producer":"","subject":"","title":"A"}
//! ```
//!
//! This format is versioned: changing key order, separators or
//! absent-field defaults would silently break verification of every
//! previously sealed bundle. Any future change must bump the version and
//! keep v1 for old bundles.

use sha2::{Digest, Sha256};

use attesta_core::DocumentMetadata;

/// Metadata canonicalization version. See the module docs before touching.
pub const CANONICALIZATION_VERSION: u32 = 1;

/// SHA-256 of raw file bytes, lowercase hex.
pub fn hash_file(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Canonical serialization of document metadata (canonicalization v1).
pub fn canonicalize(metadata: &DocumentMetadata) -> String {
    // serde_json's Map is BTreeMap-backed, so keys come out sorted no
    // matter the insertion order below.
    serde_json::json!({
        "author": metadata.author,
        "num_pages": metadata.num_pages,
        "producer": metadata.producer,
        "subject": metadata.subject,
        "title": metadata.title,
    })
    .to_string()
}

/// Core hash: SHA-256 over `canonicalize(metadata) || file_hash`, where the
/// file hash is concatenated as hex text, not raw digest bytes.
pub fn core_hash(metadata: &DocumentMetadata, file_hash: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonicalize(metadata).as_bytes());
    hasher.update(file_hash.as_bytes());
    hex::encode(hasher.finalize())
}
