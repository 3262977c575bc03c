pub mod config;
pub mod oracle;
pub mod ownership;
pub mod status;
pub mod workspace;

pub use config::{Config, LoggingConfig, OracleConfig, ResolverConfig};
pub use oracle::{OracleFailure, OracleResult, OracleType};
pub use ownership::{Action, OwnershipRecord, Resolution, UNOWNED_TEAM};
pub use status::{ConfiguredState, Phase, StatusLabel, StatusSnapshot};
pub use workspace::WorkspaceRoot;
