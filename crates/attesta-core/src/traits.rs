//! Collaborator traits for the sealing pipeline.
//!
//! The cryptographic core is pure; everything with I/O lives behind one of
//! these interfaces so it can be swapped for an in-memory fake in tests.
//! Implementations must be safe to call concurrently — independent seal and
//! verify requests impose no ordering on each other.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CertificateRecord, IssuerRecord};

/// Content-addressed object storage (e.g. IPFS).
///
/// Only ciphertext ever crosses this boundary — plaintext never leaves the
/// sealing pipeline.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store bytes and return their content identifier.
    async fn put(&self, bytes: &[u8]) -> Result<String>;

    /// Fetch bytes by content identifier.
    async fn get(&self, content_id: &str) -> Result<Vec<u8>>;
}

/// Append-only anchoring ledger.
///
/// The pipeline records only the returned transaction id; ledger internals
/// (consensus, fees, retries) are out of scope here.
#[async_trait]
pub trait AnchorLedger: Send + Sync {
    /// Record a core hash on the ledger, returning its transaction id.
    async fn anchor(&self, core_hash: &str) -> Result<String>;
}

/// Durable core-hash → certificate-record registry.
#[async_trait]
pub trait CertificateRegistry: Send + Sync {
    /// Persist a record under its core hash.
    ///
    /// Returns `true` when an existing record for the same core hash was
    /// replaced (re-issuance), `false` for a first write.
    async fn put(&self, core_hash: &str, record: CertificateRecord) -> Result<bool>;

    /// Look up a record by core hash. `None` is a normal outcome.
    async fn get(&self, core_hash: &str) -> Result<Option<CertificateRecord>>;
}

/// Directory of registered certificate issuers.
#[async_trait]
pub trait IssuerDirectory: Send + Sync {
    /// Register or update an issuer by name.
    async fn register(&self, name: &str, record: IssuerRecord) -> Result<()>;

    /// List all registered issuers, keyed by name.
    async fn list(&self) -> Result<BTreeMap<String, IssuerRecord>>;
}
