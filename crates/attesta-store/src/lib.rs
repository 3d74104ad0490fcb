//! # attesta-store
//!
//! Concrete implementations of attesta's storage collaborators:
//!
//! - [`FileStore`] — a durable JSON-file-backed certificate registry and
//!   issuer directory (write-then-rename, survives process restarts)
//! - [`IpfsClient`] — content-addressed ciphertext storage over the IPFS
//!   HTTP API and gateway
//! - [`HttpAnchorClient`] — posts core hashes to an anchoring endpoint and
//!   records the returned transaction id
//! - [`memory`] — in-memory fakes of all collaborator traits for tests
//!
//! Everything here sits behind the traits in `attesta-core`; the sealing
//! pipeline never depends on these types directly.

pub mod ipfs;
pub mod ledger;
pub mod memory;
pub mod registry;

pub use ipfs::IpfsClient;
pub use ledger::HttpAnchorClient;
pub use memory::{MemoryLedger, MemoryObjectStore, MemoryRegistry};
pub use registry::FileStore;
