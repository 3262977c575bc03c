//! Domain layer for ownership resolution
//!
//! Pure models, the error taxonomy, and the port traits that adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{OwnershipError, OwnershipResult, ValidationFailure};
