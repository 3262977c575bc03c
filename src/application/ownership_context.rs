//! Process-wide ownership context.
//!
//! Owns the status board, the workspace router and the oracle, and exposes
//! the callbacks an editor-like presenter drives: active file changes,
//! workspace changes, explicit re-runs and the "show ownership info" command.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::info;

use crate::adapters::fs::LocalFs;
use crate::adapters::oracles::OracleRegistry;
use crate::domain::models::{Action, Config, Resolution, ResolverConfig, StatusSnapshot, WorkspaceRoot};
use crate::domain::ports::{OwnershipOracle, WorkspaceFs};
use crate::services::{ResolverDeps, RoutedRequest, StatusBoard, WorkspaceRouter};

/// What the "show ownership info" command displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnershipInfo {
    pub message: String,
    pub actions: Vec<Action>,
}

pub struct OwnershipContext {
    board: Arc<StatusBoard>,
    router: WorkspaceRouter,
    oracle_name: &'static str,
    active_file: RwLock<Option<PathBuf>>,
}

impl OwnershipContext {
    /// Build a context with the oracle named by `config.oracle.kind` on the local disk.
    pub fn new(config: &Config) -> Self {
        let fs: Arc<dyn WorkspaceFs> = Arc::new(LocalFs::new());
        let oracle = OracleRegistry::new(config.oracle.clone(), Arc::clone(&fs)).configured();
        Self::with_parts(oracle, fs, config.resolver.clone())
    }

    pub fn with_parts(
        oracle: Arc<dyn OwnershipOracle>,
        fs: Arc<dyn WorkspaceFs>,
        settings: ResolverConfig,
    ) -> Self {
        let board = Arc::new(StatusBoard::new());
        let oracle_name = oracle.name();
        let router = WorkspaceRouter::new(ResolverDeps {
            oracle,
            fs,
            board: Arc::clone(&board),
            settings,
        });
        info!(oracle = oracle_name, "ownership context ready");
        Self {
            board,
            router,
            oracle_name,
            active_file: RwLock::new(None),
        }
    }

    pub fn oracle_name(&self) -> &'static str {
        self.oracle_name
    }

    pub fn board(&self) -> &Arc<StatusBoard> {
        &self.board
    }

    pub fn router(&self) -> &WorkspaceRouter {
        &self.router
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.board.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.board.subscribe()
    }

    pub async fn active_file(&self) -> Option<PathBuf> {
        self.active_file.read().await.clone()
    }

    pub async fn on_workspaces_changed(&self, added: Vec<WorkspaceRoot>, removed: &[WorkspaceRoot]) {
        self.router.on_workspaces_changed(added, removed).await;
    }

    /// The editor focused `file`, or closed its last editor (`None`).
    pub async fn on_active_file_changed(&self, file: Option<PathBuf>) -> Option<Resolution> {
        Some(self.focus(file).await?.run().await)
    }

    /// Record the focus change and claim its ticket without running the lookup.
    ///
    /// Callers that run lookups concurrently call this in event order and run
    /// the returned request later; focus always follows the order of calls.
    pub async fn focus(&self, file: Option<PathBuf>) -> Option<RoutedRequest> {
        *self.active_file.write().await = file.clone();
        match file {
            Some(file) => {
                self.board.set_visible(true);
                self.router.route(&file).await
            }
            None => {
                // Nothing focused: drop whatever is still in flight.
                self.board.claim_focus();
                self.board.set_visible(false);
                None
            }
        }
    }

    /// Re-run resolution for `file`, or for the active file when `None`.
    pub async fn request_rerun(&self, file: Option<PathBuf>) -> Option<Resolution> {
        Some(self.prepare_rerun(file).await?.run().await)
    }

    /// Like [`OwnershipContext::focus`], for a re-run.
    pub async fn prepare_rerun(&self, file: Option<PathBuf>) -> Option<RoutedRequest> {
        let target = match file {
            Some(file) => {
                *self.active_file.write().await = Some(file.clone());
                file
            }
            None => self.active_file().await?,
        };
        info!(file = %target.display(), "re-running ownership check");
        self.router.route(&target).await
    }

    /// Message and actions for the currently shown owner, if any.
    pub fn ownership_info(&self) -> Option<OwnershipInfo> {
        let snapshot = self.board.snapshot();
        let record = snapshot.record?;
        Some(OwnershipInfo {
            message: format!("{} is owned by {}", record.file_name(), record.team_name()),
            actions: record.actions().to_vec(),
        })
    }

    /// Resolve a single file without going through the active-file flow.
    pub async fn resolve(&self, file: &Path) -> Option<Resolution> {
        self.router.route_and_run(file).await
    }

    /// Dispose every resolver; pending results are dropped.
    pub async fn shutdown(&self) {
        self.router.dispose_all().await;
        info!("ownership context shut down");
    }
}
