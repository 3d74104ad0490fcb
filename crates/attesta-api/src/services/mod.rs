//! Service layer orchestrating the sealing pipeline over the storage
//! collaborators.

pub mod seal;

pub use seal::{AnchorOutcome, SealService, ServiceError};
