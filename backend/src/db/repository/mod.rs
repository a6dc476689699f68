//! Record store contract.
//!
//! The engine only consumes the range-query contract defined here; storage
//! and transport belong to the implementations in
//! [`crate::db::repositories`].

pub mod error;
pub mod observation;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use observation::{ObservationRepository, RangeQuery};
