//! Domain errors for ownership resolution.

use thiserror::Error;

use super::models::OracleFailure;

/// Why an oracle payload could not be interpreted at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("Oracle output is empty")]
    Empty,

    #[error("Oracle output is not a JSON object: {0}")]
    Malformed(String),
}

/// Domain-level errors that can occur while resolving ownership.
#[derive(Debug, Error)]
pub enum OwnershipError {
    #[error("Oracle query failed: {0}")]
    Oracle(#[from] OracleFailure),

    #[error("Malformed oracle payload: {0}")]
    Payload(#[from] ValidationFailure),

    #[error("File {path} is outside workspace {workspace}")]
    OutsideWorkspace { path: String, workspace: String },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Team config error: {0}")]
    TeamConfig(String),
}

pub type OwnershipResult<T> = Result<T, OwnershipError>;

impl From<std::io::Error> for OwnershipError {
    fn from(err: std::io::Error) -> Self {
        OwnershipError::Io(err.to_string())
    }
}

impl From<serde_yaml::Error> for OwnershipError {
    fn from(err: serde_yaml::Error) -> Self {
        OwnershipError::TeamConfig(err.to_string())
    }
}
