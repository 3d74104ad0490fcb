//! Data model shared between sealing, anchoring and verification.

use serde::{Deserialize, Serialize};

/// Metadata extracted from a document by the (black-box) extractor.
///
/// The four string fields default to empty when the extractor cannot read
/// them; `num_pages` defaults to zero. Two semantically equal metadata
/// values must hash identically, which is why the hash engine serializes
/// this struct in a canonical form (keys sorted lexicographically) rather
/// than relying on field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub producer: String,
    #[serde(default)]
    pub num_pages: u32,
}

/// Registry record created when a certificate is anchored.
///
/// Keyed by core hash in the registry. Read-only after creation; anchoring
/// the same core hash again replaces the record, and the registry reports
/// the replacement so re-issuance is explicit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    /// Content identifier of the ciphertext in object storage.
    pub storage_reference: String,
    /// Metadata as extracted at sealing time.
    pub metadata: DocumentMetadata,
    /// Text-encoded signing public key of the certificate holder.
    pub recipient_identity: String,
    /// Transaction id returned by the anchoring ledger.
    pub tx_id: String,
}

/// A registered certificate issuer (university, organization).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerRecord {
    /// Text-encoded signing public key of the issuer.
    pub pubkey: String,
    pub email: String,
}

/// Outcome of verifying a presented file against the registry.
///
/// Exact-match only: any bit difference in the file, or any metadata field
/// the extractor reports differently, yields [`Verification::NotVerified`]
/// even if the document is semantically identical. That is a documented
/// limitation, not a bug — and NOT VERIFIED is a normal outcome, never an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verification {
    Verified { record: CertificateRecord },
    NotVerified,
}

impl Verification {
    /// True when the registry held a record for the recomputed core hash.
    pub fn is_verified(&self) -> bool {
        matches!(self, Verification::Verified { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_defaults_are_empty() {
        let meta = DocumentMetadata::default();
        assert_eq!(meta.title, "");
        assert_eq!(meta.author, "");
        assert_eq!(meta.subject, "");
        assert_eq!(meta.producer, "");
        assert_eq!(meta.num_pages, 0);
    }

    #[test]
    fn test_metadata_deserialize_missing_fields() {
        let meta: DocumentMetadata = serde_json::from_str(r#"{"title":"T"}"#).unwrap();
        assert_eq!(meta.title, "T");
        assert_eq!(meta.author, "");
        assert_eq!(meta.num_pages, 0);
    }

    #[test]
    fn test_record_roundtrip_json() {
        let record = CertificateRecord {
            storage_reference: "QmAbc".into(),
            metadata: DocumentMetadata {
                title: "Diploma".into(),
                num_pages: 2,
                ..Default::default()
            },
            recipient_identity: "4Nd1m...".into(),
            tx_id: "5j7s...".into(),
        };

        let json = serde_json::to_string(&record).unwrap();
        let parsed: CertificateRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, parsed);
    }

    #[test]
    fn test_verification_status_tag() {
        let not = serde_json::to_value(Verification::NotVerified).unwrap();
        assert_eq!(not["status"], "NOT_VERIFIED");

        let record = CertificateRecord {
            storage_reference: "cid".into(),
            metadata: DocumentMetadata::default(),
            recipient_identity: "pk".into(),
            tx_id: "tx".into(),
        };
        let verified = serde_json::to_value(Verification::Verified { record }).unwrap();
        assert_eq!(verified["status"], "VERIFIED");
        assert!(verified["record"].is_object());
    }

    #[test]
    fn test_is_verified() {
        assert!(!Verification::NotVerified.is_verified());
    }
}
