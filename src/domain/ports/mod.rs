//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that adapters implement:
//! - `OwnershipOracle`: answers "who owns this file" for one workspace
//! - `WorkspaceFs`: existence checks and document reads under a workspace
//!
//! These keep the resolution engine independent of processes and disks.

pub mod oracle;
pub mod workspace_fs;

pub use oracle::OwnershipOracle;
pub use workspace_fs::WorkspaceFs;
