//! In-memory fakes of the collaborator traits.
//!
//! Used by tests and by local development mode. Behavior matches the real
//! implementations' contracts: content-addressed puts, replace-reporting
//! registry writes, monotonic ledger transaction ids.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use attesta_core::{
    AnchorLedger, CertificateRecord, CertificateRegistry, Error, IssuerDirectory, IssuerRecord,
    ObjectStore, Result,
};

/// In-memory content-addressed object store.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, bytes: &[u8]) -> Result<String> {
        // Content-addressed like the real store: same bytes, same id.
        let content_id = format!("mem-{}", hex::encode(Sha256::digest(bytes)));
        self.objects
            .lock()
            .await
            .insert(content_id.clone(), bytes.to_vec());
        Ok(content_id)
    }

    async fn get(&self, content_id: &str) -> Result<Vec<u8>> {
        self.objects
            .lock()
            .await
            .get(content_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("object {content_id}")))
    }
}

/// In-memory append-only anchoring ledger.
#[derive(Default)]
pub struct MemoryLedger {
    entries: Mutex<Vec<(String, String)>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All anchored (core_hash, tx_id) pairs, in anchor order.
    pub async fn entries(&self) -> Vec<(String, String)> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl AnchorLedger for MemoryLedger {
    async fn anchor(&self, core_hash: &str) -> Result<String> {
        let mut entries = self.entries.lock().await;
        let tx_id = format!("memtx-{:06}", entries.len() + 1);
        entries.push((core_hash.to_string(), tx_id.clone()));
        Ok(tx_id)
    }
}

/// In-memory certificate registry and issuer directory.
#[derive(Default)]
pub struct MemoryRegistry {
    certificates: Mutex<BTreeMap<String, CertificateRecord>>,
    issuers: Mutex<BTreeMap<String, IssuerRecord>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CertificateRegistry for MemoryRegistry {
    async fn put(&self, core_hash: &str, record: CertificateRecord) -> Result<bool> {
        let replaced = self
            .certificates
            .lock()
            .await
            .insert(core_hash.to_string(), record)
            .is_some();
        Ok(replaced)
    }

    async fn get(&self, core_hash: &str) -> Result<Option<CertificateRecord>> {
        Ok(self.certificates.lock().await.get(core_hash).cloned())
    }
}

#[async_trait]
impl IssuerDirectory for MemoryRegistry {
    async fn register(&self, name: &str, record: IssuerRecord) -> Result<()> {
        self.issuers.lock().await.insert(name.to_string(), record);
        Ok(())
    }

    async fn list(&self) -> Result<BTreeMap<String, IssuerRecord>> {
        Ok(self.issuers.lock().await.clone())
    }
}
