//! Application layer: the process-wide ownership context presenters talk to.

pub mod ownership_context;

pub use ownership_context::{OwnershipContext, OwnershipInfo};
