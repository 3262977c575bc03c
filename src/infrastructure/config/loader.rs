use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

const MAX_MIN_LATENCY_MS: u64 = 10_000;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, warning, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: pretty, json, channel")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Oracle tool name cannot be empty")]
    EmptyToolName,

    #[error("CODEOWNERS path cannot be empty")]
    EmptyCodeownersPath,

    #[error("Invalid timeout_ms: 0. Omit it to wait without a limit")]
    InvalidTimeout,

    #[error("Invalid min_latency_ms: {0}. Must be at most 10000")]
    InvalidMinLatency(u64),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .code-ownership/config.yaml (project config)
    /// 3. .code-ownership/local.yaml (project local overrides, optional)
    /// 4. Environment variables (CODE_OWNERSHIP_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        Self::load_with(None)
    }

    /// Like [`ConfigLoader::load`], with an explicit file merged above the project files.
    pub fn load_with(explicit: Option<&Path>) -> Result<Config> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".code-ownership/config.yaml"))
            .merge(Yaml::file(".code-ownership/local.yaml"));
        if let Some(path) = explicit {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        let config: Config = figment
            .merge(Env::prefixed("CODE_OWNERSHIP_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "warning", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["pretty", "json", "channel"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        if config.oracle.tool.trim().is_empty() {
            return Err(ConfigError::EmptyToolName);
        }

        if config.oracle.codeowners_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyCodeownersPath);
        }

        if config.oracle.timeout_ms == Some(0) {
            return Err(ConfigError::InvalidTimeout);
        }

        if config.resolver.min_latency_ms > MAX_MIN_LATENCY_MS {
            return Err(ConfigError::InvalidMinLatency(config.resolver.min_latency_ms));
        }

        Ok(())
    }
}
