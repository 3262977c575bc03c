//! Ownership oracle implementations.

pub mod codeowners;
pub mod command;
pub mod mock;
pub mod registry;

pub use codeowners::CodeownersOracle;
pub use command::{CommandOracle, CommandOracleConfig};
pub use mock::{MockOracle, MockResponse};
pub use registry::OracleRegistry;

/// Build the JSON payload every oracle speaks.
pub(crate) fn ownership_payload(team_name: &str, team_yml: &str) -> String {
    serde_json::json!({
        "team_name": team_name,
        "team_yml": team_yml,
    })
    .to_string()
}
