use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::oracle::OracleType;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Which oracle answers ownership queries, and how it is invoked
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Workspace resolver behaviour
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Oracle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OracleConfig {
    /// Oracle implementation: command, codeowners or mock
    #[serde(default)]
    pub kind: OracleType,

    /// Tool name looked up under `bin/` in each workspace
    #[serde(default = "default_tool")]
    pub tool: String,

    /// Upper bound for one oracle invocation; unset means wait forever
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Workspace-relative CODEOWNERS location for the codeowners oracle
    #[serde(default = "default_codeowners_path")]
    pub codeowners_path: PathBuf,
}

fn default_tool() -> String {
    "codeownership".to_string()
}

fn default_codeowners_path() -> PathBuf {
    PathBuf::from(".github/CODEOWNERS")
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            kind: OracleType::default(),
            tool: default_tool(),
            timeout_ms: None,
            codeowners_path: default_codeowners_path(),
        }
    }
}

/// Resolver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResolverConfig {
    /// Pause after showing "working" before the oracle is consulted
    #[serde(default = "default_min_latency_ms")]
    pub min_latency_ms: u64,
}

const fn default_min_latency_ms() -> u64 {
    50
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            min_latency_ms: default_min_latency_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Console format: pretty, json or channel
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for the rolling log file; console only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// File rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,

    /// Mirror log lines to stderr
    #[serde(default = "default_true")]
    pub enable_stderr: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "channel".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

const fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
            enable_stderr: default_true(),
        }
    }
}
