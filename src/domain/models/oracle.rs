//! Oracle result types and oracle selection.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Typed failure of a single oracle invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleFailure {
    #[error("ownership command failed (exit code {exit_code:?}): {stderr}")]
    ProcessFailure {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("ownership command timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("ownership command produced no output")]
    EmptyOutput,
}

/// Raw oracle answer: a payload string to be parsed, or a typed failure.
pub type OracleResult = Result<String, OracleFailure>;

/// Which oracle implementation answers ownership queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum OracleType {
    /// `bin/<tool> for_file <path> --json`
    Command,
    /// `.github/CODEOWNERS` lookup
    Codeowners,
    /// Scripted answers for tests and demos
    Mock,
}

impl OracleType {
    pub const ALL: [Self; 3] = [Self::Command, Self::Codeowners, Self::Mock];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Codeowners => "codeowners",
            Self::Mock => "mock",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "command" | "codeownership" | "cli" => Some(Self::Command),
            "codeowners" | "github" => Some(Self::Codeowners),
            "mock" | "test" => Some(Self::Mock),
            _ => None,
        }
    }
}

impl TryFrom<String> for OracleType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value).ok_or_else(|| {
            let known: Vec<_> = Self::ALL.iter().map(Self::as_str).collect();
            format!("unknown oracle kind '{value}', expected one of: {}", known.join(", "))
        })
    }
}

impl Default for OracleType {
    fn default() -> Self {
        Self::Command
    }
}
