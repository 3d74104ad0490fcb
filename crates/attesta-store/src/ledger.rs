//! HTTP anchoring ledger client.
//!
//! Posts a core hash to an anchoring endpoint and records the transaction
//! id the endpoint returns. The endpoint wraps whatever ledger actually
//! holds the anchor (a memo-program transaction relay in production); this
//! client only cares about the hash-in, tx-id-out contract.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use attesta_core::{AnchorLedger, Error, Result};

/// Timeout for anchoring requests (seconds). Anchoring waits on ledger
/// confirmation, so this is longer than a plain HTTP call would need.
pub const ANCHOR_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Serialize)]
struct AnchorRequest<'a> {
    core_hash: &'a str,
}

/// Client that anchors core hashes via an HTTP relay endpoint.
pub struct HttpAnchorClient {
    client: Client,
    endpoint: String,
}

impl HttpAnchorClient {
    /// Create a client against a custom anchoring endpoint.
    pub fn with_config(endpoint: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(ANCHOR_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Anchor(format!("failed to create HTTP client: {e}")))?;

        info!("Initializing anchor client: endpoint={}", endpoint);

        Ok(Self { client, endpoint })
    }

    /// Create from the `ANCHOR_ENDPOINT` environment variable.
    pub fn from_env() -> Result<Self> {
        let endpoint = std::env::var("ANCHOR_ENDPOINT")
            .map_err(|_| Error::Config("ANCHOR_ENDPOINT is not set".to_string()))?;
        Self::with_config(endpoint)
    }
}

/// Pull the transaction id out of an anchoring response.
///
/// Relay endpoints are not uniform: some return `{"tx_id": ...}`, ledger
/// RPC passthroughs return `{"result": "<signature>"}` or
/// `{"signature": ...}`, and some nest the signature one level down.
fn extract_tx_id(response: &Value) -> Option<String> {
    for key in ["tx_id", "result", "signature"] {
        match response.get(key) {
            Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            Some(nested @ Value::Object(_)) => {
                if let Some(tx) = extract_tx_id(nested) {
                    return Some(tx);
                }
            }
            _ => {}
        }
    }
    None
}

#[async_trait]
impl AnchorLedger for HttpAnchorClient {
    async fn anchor(&self, core_hash: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&AnchorRequest { core_hash })
            .send()
            .await
            .map_err(|e| Error::Anchor(format!("anchor request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Anchor(format!(
                "anchor endpoint returned status {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::Anchor(format!("unparseable anchor response: {e}")))?;

        let tx_id = extract_tx_id(&body).ok_or_else(|| {
            Error::Anchor(format!("anchor response carries no transaction id: {body}"))
        })?;

        debug!(core_hash, tx_id, "core hash anchored");
        Ok(tx_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_tx_id_plain() {
        let v = json!({"tx_id": "5KtP..sig"});
        assert_eq!(extract_tx_id(&v).unwrap(), "5KtP..sig");
    }

    #[test]
    fn test_extract_tx_id_rpc_result_string() {
        let v = json!({"jsonrpc": "2.0", "result": "2xSig", "id": 1});
        assert_eq!(extract_tx_id(&v).unwrap(), "2xSig");
    }

    #[test]
    fn test_extract_tx_id_nested_signature() {
        let v = json!({"result": {"signature": "nestedSig"}});
        assert_eq!(extract_tx_id(&v).unwrap(), "nestedSig");
    }

    #[test]
    fn test_extract_tx_id_absent() {
        let v = json!({"status": "ok"});
        assert!(extract_tx_id(&v).is_none());
    }

    #[test]
    fn test_extract_tx_id_ignores_empty_string() {
        let v = json!({"result": "", "signature": "realSig"});
        assert_eq!(extract_tx_id(&v).unwrap(), "realSig");
    }
}
