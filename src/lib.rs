//! Code ownership resolution.
//!
//! Tracks a set of open workspace roots and, whenever the active file
//! changes, asks an ownership oracle which team owns it. Results are
//! validated, enriched with the team's chat channel and published on a
//! single status board that presentation layers watch.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, errors and the oracle/filesystem ports
//! - **Adapters** (`adapters`): oracle implementations and local filesystem access
//! - **Service Layer** (`services`): parsing, enrichment, per-workspace resolution and routing
//! - **Application Layer** (`application`): the process-wide ownership context
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use code_ownership::{Config, OwnershipContext, WorkspaceRoot};
//!
//! #[tokio::main]
//! async fn main() {
//!     let ctx = OwnershipContext::new(&Config::default());
//!     ctx.on_workspaces_changed(vec![WorkspaceRoot::from_path("/src/app")], &[]).await;
//!     ctx.on_active_file_changed(Some("/src/app/lib/user.rb".into())).await;
//!     println!("{}", ctx.snapshot().label());
//! }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use application::{OwnershipContext, OwnershipInfo};
pub use domain::models::{
    Action, Config, OracleFailure, OracleType, OwnershipRecord, Phase, Resolution, StatusLabel,
    StatusSnapshot, WorkspaceRoot,
};
pub use domain::ports::{OwnershipOracle, WorkspaceFs};
pub use domain::{OwnershipError, OwnershipResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{StatusBoard, WorkspaceResolver, WorkspaceRouter};
