//! Server configuration from environment variables.

use std::net::SocketAddr;

/// Default bind address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Default registry file path.
pub const DEFAULT_REGISTRY_PATH: &str = "data/registry.json";

/// Default request body limit (sealed certificate uploads), in bytes.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to (`ATTESTA_BIND_ADDR`).
    pub bind_addr: SocketAddr,
    /// Path of the JSON registry file (`ATTESTA_REGISTRY_PATH`).
    pub registry_path: String,
    /// Anchoring relay endpoint (`ANCHOR_ENDPOINT`); in-memory ledger when
    /// unset.
    pub anchor_endpoint: Option<String>,
    /// Maximum accepted request body size (`ATTESTA_MAX_UPLOAD_BYTES`).
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// Read configuration from the environment, applying defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = std::env::var("ATTESTA_BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse()?;

        let registry_path = std::env::var("ATTESTA_REGISTRY_PATH")
            .unwrap_or_else(|_| DEFAULT_REGISTRY_PATH.to_string());

        let anchor_endpoint = std::env::var("ANCHOR_ENDPOINT").ok();

        let max_upload_bytes = std::env::var("ATTESTA_MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        Ok(Self {
            bind_addr,
            registry_path,
            anchor_endpoint,
            max_upload_bytes,
        })
    }
}
