//! Error types for storage and transport collaborators.
//!
//! Cryptographic failures have their own taxonomy in `attesta-crypto`; this
//! type covers everything else, so callers can always tell "your key is
//! wrong" apart from "the network failed".

use thiserror::Error;

/// Result type alias using attesta's collaborator Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for collaborator (storage, ledger, registry) operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Object storage operation failed
    #[error("Storage error: {0}")]
    Store(String),

    /// Anchoring ledger operation failed
    #[error("Anchor error: {0}")]
    Anchor(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
