//! Common test utilities for integration tests
//!
//! Provides workspace fixtures and a gated oracle whose answers the test
//! releases one at a time, so request interleavings are deterministic.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::{mpsc, Semaphore};

use code_ownership::adapters::fs::LocalFs;
use code_ownership::domain::models::{OracleResult, ResolverConfig, WorkspaceRoot};
use code_ownership::domain::ports::{OwnershipOracle, WorkspaceFs};
use code_ownership::OwnershipContext;

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Workspace root over a fresh temp dir, named `name`.
pub fn temp_workspace(name: &str) -> (TempDir, WorkspaceRoot) {
    let dir = temp_dir();
    let root = WorkspaceRoot::new(name, dir.path());
    (dir, root)
}

/// Write `contents` to `relative` under `root`, creating parent dirs.
pub fn write_file(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
    }
    std::fs::write(&path, contents).expect("Failed to write file");
    path
}

/// Oracle JSON payload.
pub fn payload(team_name: &str, team_yml: &str) -> String {
    serde_json::json!({ "team_name": team_name, "team_yml": team_yml }).to_string()
}

/// Context over the local disk with no artificial latency.
pub fn context_with(oracle: Arc<dyn OwnershipOracle>) -> OwnershipContext {
    let fs: Arc<dyn WorkspaceFs> = Arc::new(LocalFs::new());
    OwnershipContext::with_parts(oracle, fs, ResolverConfig { min_latency_ms: 0 })
}

/// Setup test logging
///
/// Call this at the beginning of tests that need logging.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Oracle that blocks each query until the test opens its gate.
///
/// Every query reports its relative path on the `started` channel before
/// waiting, so tests can sequence "R1 in flight, R2 issued" precisely.
pub struct GatedOracle {
    gates: Mutex<HashMap<PathBuf, Arc<Semaphore>>>,
    answers: Mutex<HashMap<PathBuf, OracleResult>>,
    started: mpsc::UnboundedSender<PathBuf>,
}

impl GatedOracle {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<PathBuf>) {
        let (started, rx) = mpsc::unbounded_channel();
        let oracle = Arc::new(Self {
            gates: Mutex::new(HashMap::new()),
            answers: Mutex::new(HashMap::new()),
            started,
        });
        (oracle, rx)
    }

    pub fn answer(&self, relative: impl Into<PathBuf>, result: OracleResult) {
        self.answers.lock().unwrap().insert(relative.into(), result);
    }

    /// Let one pending (or future) query for `relative` complete.
    pub fn release(&self, relative: impl AsRef<Path>) {
        self.gate(relative.as_ref()).add_permits(1);
    }

    fn gate(&self, relative: &Path) -> Arc<Semaphore> {
        Arc::clone(
            self.gates
                .lock()
                .unwrap()
                .entry(relative.to_path_buf())
                .or_insert_with(|| Arc::new(Semaphore::new(0))),
        )
    }
}

#[async_trait]
impl OwnershipOracle for GatedOracle {
    fn name(&self) -> &'static str {
        "gated"
    }

    fn probe_path(&self) -> Option<PathBuf> {
        None
    }

    async fn query(&self, _root: &WorkspaceRoot, relative_path: &Path) -> OracleResult {
        let gate = self.gate(relative_path);
        let _ = self.started.send(relative_path.to_path_buf());
        gate.acquire().await.expect("gate closed").forget();
        self.answers
            .lock()
            .unwrap()
            .get(relative_path)
            .cloned()
            .unwrap_or_else(|| Ok(payload("Some Team", "config/teams/some_team.yml")))
    }
}

/// Wait for the next query to reach the oracle.
pub async fn next_started(rx: &mut mpsc::UnboundedReceiver<PathBuf>) -> PathBuf {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("oracle was never queried")
        .expect("oracle dropped")
}
