//! Durable JSON-file-backed certificate registry and issuer directory.
//!
//! One JSON document holds both tables, keyed by core hash and issuer
//! name. Writes go to a temporary sibling file first and are renamed into
//! place, so a crash mid-write never corrupts the registry. A single
//! in-process lock serializes read-modify-write cycles; concurrent reads
//! of the published file are always consistent.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use attesta_core::{
    CertificateRecord, CertificateRegistry, IssuerDirectory, IssuerRecord, Result,
};

/// On-disk layout of the registry file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    certificates: BTreeMap<String, CertificateRecord>,
    #[serde(default)]
    issuers: BTreeMap<String, IssuerRecord>,
}

/// JSON-file-backed registry, durable across process restarts.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Open (or create on first write) a registry at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<StoreDocument> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreDocument::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, doc: &StoreDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // Write-then-rename keeps the published file whole at all times.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(doc)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CertificateRegistry for FileStore {
    async fn put(&self, core_hash: &str, record: CertificateRecord) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;
        let replaced = doc
            .certificates
            .insert(core_hash.to_string(), record)
            .is_some();
        self.save(&doc).await?;

        debug!(core_hash, replaced, "certificate record persisted");
        Ok(replaced)
    }

    async fn get(&self, core_hash: &str) -> Result<Option<CertificateRecord>> {
        let _guard = self.lock.lock().await;
        let doc = self.load().await?;
        Ok(doc.certificates.get(core_hash).cloned())
    }
}

#[async_trait]
impl IssuerDirectory for FileStore {
    async fn register(&self, name: &str, record: IssuerRecord) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;
        doc.issuers.insert(name.to_string(), record);
        self.save(&doc).await?;
        Ok(())
    }

    async fn list(&self) -> Result<BTreeMap<String, IssuerRecord>> {
        let _guard = self.lock.lock().await;
        let doc = self.load().await?;
        Ok(doc.issuers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attesta_core::{DocumentMetadata, Error};
    use tempfile::tempdir;

    fn record(tx: &str) -> CertificateRecord {
        CertificateRecord {
            storage_reference: "QmCid".into(),
            metadata: DocumentMetadata {
                title: "Diploma".into(),
                ..Default::default()
            },
            recipient_identity: "pk".into(),
            tx_id: tx.into(),
        }
    }

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("registry.json"));

        store.put("core-hash", record("tx-1")).await.unwrap();
        let stored = store.get("core-hash").await.unwrap().unwrap();
        assert_eq!(stored.tx_id, "tx-1");
    }

    #[tokio::test]
    async fn test_absent_record_is_none() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("registry.json"));
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replacement_is_reported() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("registry.json"));

        assert!(!store.put("core-hash", record("tx-1")).await.unwrap());
        assert!(store.put("core-hash", record("tx-2")).await.unwrap());
        assert_eq!(
            store.get("core-hash").await.unwrap().unwrap().tx_id,
            "tx-2"
        );
    }

    #[tokio::test]
    async fn test_durable_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("registry.json");

        {
            let store = FileStore::new(&path);
            store.put("core-hash", record("tx-1")).await.unwrap();
            store
                .register(
                    "Example University",
                    IssuerRecord {
                        pubkey: "pk".into(),
                        email: "a@b.c".into(),
                    },
                )
                .await
                .unwrap();
        }

        // A fresh instance over the same file sees everything.
        let reopened = FileStore::new(&path);
        assert!(reopened.get("core-hash").await.unwrap().is_some());
        assert_eq!(reopened.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/data/registry.json");

        let store = FileStore::new(&path);
        store.put("core-hash", record("tx-1")).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_no_tmp_file_left_behind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("registry.json");

        let store = FileStore::new(&path);
        store.put("core-hash", record("tx-1")).await.unwrap();
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_serialization_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("registry.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let store = FileStore::new(&path);
        let result = store.get("anything").await;
        assert!(matches!(result, Err(Error::Serialization(_))));
    }
}
