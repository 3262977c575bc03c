//! Mock oracle for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use super::ownership_payload;
use crate::domain::models::{OracleFailure, OracleResult, WorkspaceRoot, UNOWNED_TEAM};
use crate::domain::ports::OwnershipOracle;

/// Mock response configuration.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// Raw payload or failure handed back to the resolver
    pub result: OracleResult,
    /// Simulated latency before answering
    pub delay_ms: u64,
}

impl Default for MockResponse {
    fn default() -> Self {
        Self::owned("Some Team", "config/teams/some_team.yml")
    }
}

impl MockResponse {
    pub fn owned(team_name: &str, team_yml: &str) -> Self {
        Self::payload(ownership_payload(team_name, team_yml))
    }

    pub fn unowned() -> Self {
        Self::owned(UNOWNED_TEAM, "config/teams/unowned.yml")
    }

    /// Arbitrary raw output, valid or not.
    pub fn payload(raw: impl Into<String>) -> Self {
        Self {
            result: Ok(raw.into()),
            delay_ms: 0,
        }
    }

    pub fn failure(failure: OracleFailure) -> Self {
        Self {
            result: Err(failure),
            delay_ms: 0,
        }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

/// Mock oracle with per-file scripted answers and a call log.
pub struct MockOracle {
    default_response: MockResponse,
    response_overrides: Arc<RwLock<HashMap<PathBuf, MockResponse>>>,
    calls: Arc<RwLock<Vec<PathBuf>>>,
    probe_path: Option<PathBuf>,
}

impl MockOracle {
    pub fn new() -> Self {
        Self::with_default_response(MockResponse::default())
    }

    pub fn with_default_response(response: MockResponse) -> Self {
        Self {
            default_response: response,
            response_overrides: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            probe_path: None,
        }
    }

    /// Require `path` to exist under a workspace for it to count as configured.
    pub fn with_probe_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.probe_path = Some(path.into());
        self
    }

    /// Set a specific response for a workspace-relative file.
    pub async fn set_response_for_file(&self, relative_path: impl Into<PathBuf>, response: MockResponse) {
        let mut overrides = self.response_overrides.write().await;
        overrides.insert(relative_path.into(), response);
    }

    async fn get_response(&self, relative_path: &Path) -> MockResponse {
        let overrides = self.response_overrides.read().await;
        overrides
            .get(relative_path)
            .cloned()
            .unwrap_or_else(|| self.default_response.clone())
    }

    /// Relative paths queried so far, in call order.
    pub async fn calls(&self) -> Vec<PathBuf> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

impl Default for MockOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OwnershipOracle for MockOracle {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn probe_path(&self) -> Option<PathBuf> {
        self.probe_path.clone()
    }

    async fn query(&self, _root: &WorkspaceRoot, relative_path: &Path) -> OracleResult {
        self.calls.write().await.push(relative_path.to_path_buf());
        let response = self.get_response(relative_path).await;
        if response.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(response.delay_ms)).await;
        }
        response.result
    }
}
