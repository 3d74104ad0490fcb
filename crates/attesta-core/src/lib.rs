//! # attesta-core
//!
//! Shared models and collaborator traits for the attesta certificate
//! sealing system.
//!
//! This crate holds everything the cryptographic core and the HTTP layer
//! have in common but that carries no cryptographic logic of its own:
//!
//! - [`DocumentMetadata`], [`CertificateRecord`] and friends — the data
//!   model that flows between sealing, anchoring and verification
//! - The collaborator traits ([`ObjectStore`], [`AnchorLedger`],
//!   [`CertificateRegistry`], [`IssuerDirectory`]) — injected interfaces so
//!   the sealing pipeline stays pure and testable with in-memory fakes
//! - The PDF metadata extractor ([`extract_metadata`]) — a black box that
//!   never fails, so hashing always has a canonicalizable input
//! - The shared [`Error`] type for storage and transport failures, kept
//!   deliberately separate from the cryptographic error taxonomy in
//!   `attesta-crypto`

pub mod error;
pub mod models;
pub mod pdf;
pub mod traits;

pub use error::{Error, Result};
pub use models::{CertificateRecord, DocumentMetadata, IssuerRecord, Verification};
pub use pdf::extract_metadata;
pub use traits::{AnchorLedger, CertificateRegistry, IssuerDirectory, ObjectStore};
