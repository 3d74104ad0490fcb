//! Orchestration of sealing, anchoring, verification and decryption.
//!
//! This is the only place where the cryptographic core and the storage
//! collaborators meet. The service holds trait objects, so every operation
//! runs identically against production backends (IPFS, anchor relay, the
//! JSON file registry) and against in-memory fakes in tests.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument};

use attesta_core::{
    extract_metadata, AnchorLedger, CertificateRecord, CertificateRegistry, DocumentMetadata,
    IssuerDirectory, IssuerRecord, ObjectStore, Verification,
};
use attesta_crypto::{
    cipher, core_hash, hash_file, signing_priv_to_exchange_priv, signing_pub_to_exchange_pub,
    wrap, CryptoError, IdentityInput, SealedBundle,
};

/// Error surface of the service layer.
///
/// Cryptographic failures and backend failures stay distinguishable all the
/// way to the HTTP handlers, which map them to different status codes.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Backend(#[from] attesta_core::Error),
}

/// Result of anchoring a certificate.
#[derive(Debug, Clone)]
pub struct AnchorOutcome {
    /// Transaction id returned by the ledger.
    pub tx_id: String,
    /// True when an existing record for the same core hash was replaced.
    pub replaced: bool,
}

/// The sealing pipeline bound to its storage collaborators.
pub struct SealService {
    objects: Arc<dyn ObjectStore>,
    ledger: Arc<dyn AnchorLedger>,
    certificates: Arc<dyn CertificateRegistry>,
    issuers: Arc<dyn IssuerDirectory>,
}

impl SealService {
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        ledger: Arc<dyn AnchorLedger>,
        certificates: Arc<dyn CertificateRegistry>,
        issuers: Arc<dyn IssuerDirectory>,
    ) -> Self {
        Self {
            objects,
            ledger,
            certificates,
            issuers,
        }
    }

    /// Seal a document for a recipient.
    ///
    /// Extracts metadata, computes the content-addressed core hash,
    /// encrypts the file under a fresh symmetric key, wraps that key to
    /// the recipient's converted exchange key, uploads the ciphertext to
    /// object storage and returns the transportable bundle.
    #[instrument(skip_all, fields(size = file_bytes.len()))]
    pub async fn process(
        &self,
        file_bytes: &[u8],
        recipient_identity: &str,
    ) -> Result<SealedBundle, ServiceError> {
        let recipient_pub =
            IdentityInput::Encoded(recipient_identity.to_string()).resolve_public()?;
        let exchange_pub = signing_pub_to_exchange_pub(&recipient_pub)?;

        let metadata = extract_metadata(file_bytes);
        let file_hash = hash_file(file_bytes);
        let core = core_hash(&metadata, &file_hash);

        let key = cipher::SymmetricKey::generate();
        let payload = cipher::encrypt(file_bytes, &key)?;
        let wrapped_key = wrap::seal(&key, &exchange_pub)?;

        let storage_reference = self.objects.put(&payload.ciphertext).await?;

        info!(core_hash = %core, %storage_reference, "document sealed");

        Ok(SealedBundle::assemble(
            metadata,
            file_hash,
            core,
            storage_reference,
            recipient_identity.to_string(),
            payload,
            wrapped_key,
        ))
    }

    /// Anchor a sealed certificate's core hash on the ledger and persist
    /// its registry record.
    ///
    /// Anchoring the same core hash again replaces the record; the outcome
    /// reports the replacement so re-issuance stays visible to the caller.
    #[instrument(skip_all)]
    pub async fn anchor(
        &self,
        core_hash: &str,
        storage_reference: String,
        metadata: DocumentMetadata,
        recipient_identity: String,
    ) -> Result<AnchorOutcome, ServiceError> {
        let tx_id = self.ledger.anchor(core_hash).await?;

        let record = CertificateRecord {
            storage_reference,
            metadata,
            recipient_identity,
            tx_id: tx_id.clone(),
        };
        let replaced = self.certificates.put(core_hash, record).await?;

        info!(core_hash, tx_id, replaced, "certificate anchored");
        Ok(AnchorOutcome { tx_id, replaced })
    }

    /// Verify a presented file against the registry.
    ///
    /// Recomputes the core hash from the file bytes exactly as sealing
    /// does. An absent record is a NOT VERIFIED outcome, never an error.
    #[instrument(skip_all, fields(size = file_bytes.len()))]
    pub async fn verify(
        &self,
        file_bytes: &[u8],
    ) -> Result<(String, Verification), ServiceError> {
        let metadata = extract_metadata(file_bytes);
        let file_hash = hash_file(file_bytes);
        let core = core_hash(&metadata, &file_hash);

        let verification = match self.certificates.get(&core).await? {
            Some(record) => Verification::Verified { record },
            None => Verification::NotVerified,
        };

        info!(core_hash = %core, verified = verification.is_verified(), "verification completed");
        Ok((core, verification))
    }

    /// Fetch stored ciphertext by its content identifier.
    pub async fn fetch(&self, content_id: &str) -> Result<Vec<u8>, ServiceError> {
        Ok(self.objects.get(content_id).await?)
    }

    /// Open a sealed bundle with the recipient's signing private key.
    pub fn decrypt(
        &self,
        bundle: &SealedBundle,
        private_identity: &IdentityInput,
    ) -> Result<Vec<u8>, ServiceError> {
        let signing_priv = private_identity.resolve_private()?;
        let exchange_priv = signing_priv_to_exchange_priv(&signing_priv)?;

        let key = wrap::open(&bundle.wrapped_key, &exchange_priv)?;
        let plaintext = cipher::decrypt(&bundle.ciphertext, &key, &bundle.nonce, &bundle.tag)?;
        Ok(plaintext)
    }

    /// Register (or update) an issuer by name.
    pub async fn register_issuer(
        &self,
        name: &str,
        record: IssuerRecord,
    ) -> Result<(), ServiceError> {
        if name.trim().is_empty() {
            return Err(attesta_core::Error::InvalidInput(
                "issuer name must not be empty".to_string(),
            )
            .into());
        }

        self.issuers.register(name, record).await?;
        info!(name, "issuer registered");
        Ok(())
    }

    /// List all registered issuers.
    pub async fn list_issuers(
        &self,
    ) -> Result<std::collections::BTreeMap<String, IssuerRecord>, ServiceError> {
        Ok(self.issuers.list().await?)
    }
}
