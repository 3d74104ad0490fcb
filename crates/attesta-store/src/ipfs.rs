//! IPFS-backed content-addressed object store.
//!
//! Uploads go through a node's HTTP API (`/api/v0/add`); fetches go
//! through a gateway (`/ipfs/{cid}`). The returned CID is the storage
//! reference recorded in sealed bundles and certificate records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use attesta_core::{Error, ObjectStore, Result};

/// Default IPFS node API endpoint.
pub const DEFAULT_IPFS_API_URL: &str = "http://127.0.0.1:5001";

/// Default IPFS gateway endpoint.
pub const DEFAULT_IPFS_GATEWAY_URL: &str = "http://127.0.0.1:8080";

/// Timeout for IPFS requests (seconds).
pub const IPFS_TIMEOUT_SECS: u64 = 30;

/// Response line returned by `/api/v0/add`.
#[derive(Debug, Deserialize)]
struct AddResponse {
    #[serde(rename = "Hash", alias = "hash")]
    hash: String,
}

/// Client for an IPFS node's add API and gateway.
pub struct IpfsClient {
    client: Client,
    api_url: String,
    gateway_url: String,
}

impl IpfsClient {
    /// Create a client against custom API and gateway endpoints.
    pub fn with_config(api_url: String, gateway_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(IPFS_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Store(format!("failed to create HTTP client: {e}")))?;

        info!(
            "Initializing IPFS client: api={}, gateway={}",
            api_url, gateway_url
        );

        Ok(Self {
            client,
            api_url,
            gateway_url,
        })
    }

    /// Create from `IPFS_API_URL` / `IPFS_GATEWAY_URL` environment
    /// variables, falling back to local daemon defaults.
    pub fn from_env() -> Result<Self> {
        let api_url =
            std::env::var("IPFS_API_URL").unwrap_or_else(|_| DEFAULT_IPFS_API_URL.to_string());
        let gateway_url = std::env::var("IPFS_GATEWAY_URL")
            .unwrap_or_else(|_| DEFAULT_IPFS_GATEWAY_URL.to_string());
        Self::with_config(api_url, gateway_url)
    }
}

/// Extract the CID from an `/api/v0/add` response body.
///
/// The add endpoint streams one JSON object per added file; a single-file
/// upload yields a single line. Both `Hash` and `hash` key spellings are
/// accepted.
fn parse_add_response(body: &str) -> Result<String> {
    let line = body
        .lines()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| Error::Store("empty IPFS add response".to_string()))?;

    let parsed: AddResponse = serde_json::from_str(line)
        .map_err(|e| Error::Store(format!("unparseable IPFS add response: {e}")))?;
    Ok(parsed.hash)
}

#[async_trait]
impl ObjectStore for IpfsClient {
    async fn put(&self, bytes: &[u8]) -> Result<String> {
        let form = Form::new().part("file", Part::bytes(bytes.to_vec()).file_name("file"));

        let response = self
            .client
            .post(format!("{}/api/v0/add", self.api_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Store(format!("IPFS add request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Store(format!(
                "IPFS add returned status {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Store(format!("failed to read IPFS add response: {e}")))?;

        let cid = parse_add_response(&body)?;
        debug!(cid, "uploaded object to IPFS");
        Ok(cid)
    }

    async fn get(&self, content_id: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(format!("{}/ipfs/{}", self.gateway_url, content_id))
            .send()
            .await
            .map_err(|e| Error::Store(format!("IPFS gateway request failed: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!("object {content_id}")));
        }
        if !response.status().is_success() {
            return Err(Error::Store(format!(
                "IPFS gateway returned status {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Store(format!("failed to read IPFS gateway response: {e}")))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_response_canonical() {
        let body = r#"{"Name":"file","Hash":"QmTestCid123","Size":"42"}"#;
        assert_eq!(parse_add_response(body).unwrap(), "QmTestCid123");
    }

    #[test]
    fn test_parse_add_response_lowercase_key() {
        let body = r#"{"hash":"QmLowercase"}"#;
        assert_eq!(parse_add_response(body).unwrap(), "QmLowercase");
    }

    #[test]
    fn test_parse_add_response_takes_first_line() {
        // Streaming add responses carry one JSON object per line.
        let body = "{\"Hash\":\"QmFirst\"}\n{\"Hash\":\"QmSecond\"}\n";
        assert_eq!(parse_add_response(body).unwrap(), "QmFirst");
    }

    #[test]
    fn test_parse_add_response_empty_is_store_error() {
        assert!(matches!(parse_add_response(""), Err(Error::Store(_))));
    }

    #[test]
    fn test_parse_add_response_garbage_is_store_error() {
        assert!(matches!(
            parse_add_response("<html>502 Bad Gateway</html>"),
            Err(Error::Store(_))
        ));
    }
}
