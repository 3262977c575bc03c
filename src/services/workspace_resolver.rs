//! Per-workspace ownership resolution.
//!
//! One resolver owns one workspace's configuration state and request
//! counter. Every resolve call bumps the counter; a result may only reach the
//! shared [`StatusBoard`] while its request id is still the latest and its
//! focus ticket still current. Superseded lookups finish and log, but their
//! results are dropped.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use super::config_enricher::ConfigEnricher;
use super::ownership_parser::{self, NoOwnerReason, ParsedOwnership};
use super::status_board::{FocusTicket, StatusBoard};
use crate::domain::errors::OwnershipError;
use crate::domain::models::{
    ConfiguredState, OwnershipRecord, Resolution, ResolverConfig, StatusSnapshot, WorkspaceRoot,
};
use crate::domain::ports::{OwnershipOracle, WorkspaceFs};

/// Collaborators shared by every resolver.
#[derive(Clone)]
pub struct ResolverDeps {
    pub oracle: Arc<dyn OwnershipOracle>,
    pub fs: Arc<dyn WorkspaceFs>,
    pub board: Arc<StatusBoard>,
    pub settings: ResolverConfig,
}

/// Point-in-time view of a resolver's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceState {
    pub root: WorkspaceRoot,
    pub configured: ConfiguredState,
    pub last_record: Option<OwnershipRecord>,
    pub latest_request_id: u64,
    pub disposed: bool,
}

pub struct WorkspaceResolver {
    root: WorkspaceRoot,
    oracle: Arc<dyn OwnershipOracle>,
    fs: Arc<dyn WorkspaceFs>,
    enricher: ConfigEnricher,
    board: Arc<StatusBoard>,
    settings: ResolverConfig,
    configured: OnceCell<bool>,
    request_counter: AtomicU64,
    last_record: Mutex<Option<OwnershipRecord>>,
    disposed: AtomicBool,
    last_ticket: Mutex<Option<FocusTicket>>,
    probe_task: Mutex<Option<JoinHandle<()>>>,
}

impl WorkspaceResolver {
    /// Build a resolver and start its tooling probe in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(root: WorkspaceRoot, deps: ResolverDeps) -> Arc<Self> {
        let resolver = Arc::new(Self {
            root,
            enricher: ConfigEnricher::new(Arc::clone(&deps.fs)),
            oracle: deps.oracle,
            fs: deps.fs,
            board: deps.board,
            settings: deps.settings,
            configured: OnceCell::new(),
            request_counter: AtomicU64::new(0),
            last_record: Mutex::new(None),
            disposed: AtomicBool::new(false),
            last_ticket: Mutex::new(None),
            probe_task: Mutex::new(None),
        });

        let probing = Arc::clone(&resolver);
        let handle = tokio::spawn(async move {
            probing.is_configured().await;
        });
        *resolver
            .probe_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle);

        resolver
    }

    pub fn root(&self) -> &WorkspaceRoot {
        &self.root
    }

    /// Probe result; the probe runs at most once per resolver.
    pub async fn is_configured(&self) -> bool {
        *self.configured.get_or_init(|| self.probe()).await
    }

    async fn probe(&self) -> bool {
        let Some(relative) = self.oracle.probe_path() else {
            debug!(workspace = %self.root.name(), oracle = self.oracle.name(), "oracle needs no tooling");
            return true;
        };
        let path = self.root.resolve(&relative);
        let found = self.fs.exists(&path).await;
        info!(
            workspace = %self.root.name(),
            probe = %path.display(),
            configured = found,
            "ownership tooling probe finished"
        );
        found
    }

    pub fn state(&self) -> WorkspaceState {
        let configured = self
            .configured
            .get()
            .map_or(ConfiguredState::Unknown, |c| ConfiguredState::from(*c));
        WorkspaceState {
            root: self.root.clone(),
            configured,
            last_record: self.last_record(),
            latest_request_id: self.request_counter.load(Ordering::SeqCst),
            disposed: self.is_disposed(),
        }
    }

    pub fn last_record(&self) -> Option<OwnershipRecord> {
        self.last_record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Stop publishing: in-flight requests become stale and the probe is aborted.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.request_counter.fetch_add(1, Ordering::SeqCst);

        // A lookup of ours that still holds focus will never finish; stop the spinner.
        let ticket = *self
            .last_ticket
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(ticket) = ticket {
            self.board
                .publish_if(ticket, || true, |snapshot| snapshot.working = false);
        }

        if let Some(handle) = self
            .probe_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
        info!(workspace = %self.root.name(), "workspace resolver disposed");
    }

    /// Resolve ownership of `file` on behalf of the focus holder `ticket`.
    pub async fn resolve_for_file(&self, file: &Path, ticket: FocusTicket) -> Resolution {
        let request_id = self.begin_request(ticket);
        self.run_request(file, request_id, ticket).await
    }

    /// Number a new request; every earlier one becomes stale.
    pub fn begin_request(&self, ticket: FocusTicket) -> u64 {
        *self
            .last_ticket
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(ticket);
        self.request_counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Run a request numbered by [`WorkspaceResolver::begin_request`].
    #[instrument(skip(self, file, ticket), fields(workspace = %self.root.name(), file = %file.display()))]
    pub async fn run_request(&self, file: &Path, request_id: u64, ticket: FocusTicket) -> Resolution {
        if self.is_disposed() {
            return Resolution::Superseded;
        }

        if !self.is_configured().await {
            debug!(request_id, "workspace not configured, oracle not consulted");
            let applied = self.finish(request_id, ticket, ConfiguredState::Unconfigured, None, None);
            return if applied {
                Resolution::Unconfigured
            } else {
                Resolution::Superseded
            };
        }

        let started = self.publish(request_id, ticket, |snapshot| {
            snapshot.working = true;
            snapshot.configured = ConfiguredState::Configured;
        });
        if !started {
            return Resolution::Superseded;
        }

        if self.settings.min_latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.settings.min_latency_ms)).await;
        }
        if !self.is_current(request_id, ticket) {
            debug!(request_id, "superseded before the oracle was consulted");
            return Resolution::Superseded;
        }

        let outcome = self.lookup(file).await;

        let applied = match &outcome {
            Resolution::OwnedBy(record) => self.finish(
                request_id,
                ticket,
                ConfiguredState::Configured,
                Some(record.clone()),
                None,
            ),
            Resolution::Error(detail) => self.finish(
                request_id,
                ticket,
                ConfiguredState::Configured,
                None,
                Some(detail.clone()),
            ),
            _ => self.finish(request_id, ticket, ConfiguredState::Configured, None, None),
        };

        if applied {
            outcome
        } else {
            info!(request_id, "discarding stale ownership result");
            Resolution::Superseded
        }
    }

    /// Oracle, parser and enricher for one file. Never touches shared status.
    async fn lookup(&self, file: &Path) -> Resolution {
        let Some(relative) = self.root.relative_path(file) else {
            let err = OwnershipError::OutsideWorkspace {
                path: file.display().to_string(),
                workspace: self.root.name().to_string(),
            };
            error!(error = %err, "cannot resolve ownership");
            return Resolution::Error(err.to_string());
        };

        let payload = match self.oracle.query(&self.root, &relative).await {
            Ok(payload) => payload,
            Err(failure) => {
                error!(oracle = self.oracle.name(), error = %failure, "ownership oracle failed");
                return Resolution::Error(OwnershipError::from(failure).to_string());
            }
        };

        match ownership_parser::parse(&payload) {
            Err(failure) => {
                error!(payload = %payload, error = %failure, "Error parsing command output");
                Resolution::Error(OwnershipError::from(failure).to_string())
            }
            Ok(ParsedOwnership::NoOwner(NoOwnerReason::Unowned)) => {
                info!("file is unowned");
                Resolution::NoOwner
            }
            Ok(ParsedOwnership::NoOwner(NoOwnerReason::MissingFields(fields))) => {
                warn!(missing = ?fields, "oracle answered without an owner");
                Resolution::NoOwner
            }
            Ok(ParsedOwnership::Owned {
                team_name,
                team_config_ref,
            }) => {
                let team_config_path = self.root.resolve(&team_config_ref);
                let handle = self.enricher.enrich(&team_config_path).await;
                info!(team = %team_name, "ownership resolved");
                Resolution::OwnedBy(OwnershipRecord::new(
                    file,
                    team_name,
                    team_config_path,
                    handle.as_deref(),
                ))
            }
        }
    }

    fn is_current_request(&self, request_id: u64) -> bool {
        !self.is_disposed() && self.request_counter.load(Ordering::SeqCst) == request_id
    }

    fn is_current(&self, request_id: u64, ticket: FocusTicket) -> bool {
        self.is_current_request(request_id) && self.board.is_focused(ticket)
    }

    fn publish(
        &self,
        request_id: u64,
        ticket: FocusTicket,
        update: impl FnOnce(&mut StatusSnapshot),
    ) -> bool {
        self.board
            .publish_if(ticket, || self.is_current_request(request_id), update)
    }

    /// Publish a terminal outcome and remember it as the workspace's last record.
    fn finish(
        &self,
        request_id: u64,
        ticket: FocusTicket,
        configured: ConfiguredState,
        record: Option<OwnershipRecord>,
        error: Option<String>,
    ) -> bool {
        self.publish(request_id, ticket, |snapshot| {
            *self
                .last_record
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = record.clone();
            snapshot.working = false;
            snapshot.configured = configured;
            snapshot.record = record;
            snapshot.error = error;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::fs::LocalFs;
    use crate::adapters::oracles::{MockOracle, MockResponse};
    use crate::domain::models::{OracleFailure, Phase};

    fn deps(oracle: Arc<dyn OwnershipOracle>) -> ResolverDeps {
        ResolverDeps {
            oracle,
            fs: Arc::new(LocalFs::new()),
            board: Arc::new(StatusBoard::new()),
            settings: ResolverConfig { min_latency_ms: 0 },
        }
    }

    #[tokio::test]
    async fn test_owned_publishes_record() {
        let dir = tempfile::tempdir().unwrap();
        let deps = deps(Arc::new(MockOracle::new()));
        let board = Arc::clone(&deps.board);
        let resolver = WorkspaceResolver::spawn(WorkspaceRoot::new("ws", dir.path()), deps);

        let file = dir.path().join("app/a.rb");
        let resolution = resolver.resolve_for_file(&file, board.claim_focus()).await;

        let record = resolution.record().cloned().unwrap();
        assert_eq!(record.team_name(), "Some Team");
        assert_eq!(record.team_config_path(), dir.path().join("config/teams/some_team.yml"));
        assert_eq!(board.snapshot().phase, Phase::Idle);
        assert_eq!(board.snapshot().record, Some(record.clone()));
        assert_eq!(board.snapshot().configured, ConfiguredState::Configured);
        assert_eq!(resolver.last_record(), Some(record));
        assert_eq!(resolver.state().latest_request_id, 1);
    }

    #[tokio::test]
    async fn test_failure_clears_record_and_sets_error() {
        let dir = tempfile::tempdir().unwrap();
        let oracle = Arc::new(MockOracle::new());
        oracle
            .set_response_for_file(
                "broken.rb",
                MockResponse::failure(OracleFailure::ProcessFailure {
                    exit_code: Some(1),
                    stderr: "boom".to_string(),
                }),
            )
            .await;
        let deps = deps(oracle);
        let board = Arc::clone(&deps.board);
        let resolver = WorkspaceResolver::spawn(WorkspaceRoot::new("ws", dir.path()), deps);

        resolver
            .resolve_for_file(&dir.path().join("ok.rb"), board.claim_focus())
            .await;
        assert!(board.snapshot().record.is_some());

        let resolution = resolver
            .resolve_for_file(&dir.path().join("broken.rb"), board.claim_focus())
            .await;
        assert!(resolution.is_error());
        let snapshot = board.snapshot();
        assert_eq!(snapshot.phase, Phase::Error);
        assert!(snapshot.record.is_none());
        assert!(snapshot.error.unwrap().contains("boom"));
        assert!(resolver.last_record().is_none());
    }

    #[tokio::test]
    async fn test_file_outside_workspace_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let deps = deps(Arc::new(MockOracle::new()));
        let board = Arc::clone(&deps.board);
        let resolver = WorkspaceResolver::spawn(WorkspaceRoot::new("ws", dir.path()), deps);

        let resolution = resolver
            .resolve_for_file(Path::new("/definitely/elsewhere.rb"), board.claim_focus())
            .await;
        assert!(matches!(resolution, Resolution::Error(msg) if msg.contains("outside workspace")));
    }

    #[tokio::test]
    async fn test_unconfigured_skips_oracle() {
        let dir = tempfile::tempdir().unwrap();
        let oracle = Arc::new(MockOracle::new().with_probe_path("bin/codeownership"));
        let deps = deps(Arc::clone(&oracle) as Arc<dyn OwnershipOracle>);
        let board = Arc::clone(&deps.board);
        let resolver = WorkspaceResolver::spawn(WorkspaceRoot::new("ws", dir.path()), deps);

        let resolution = resolver
            .resolve_for_file(&dir.path().join("a.rb"), board.claim_focus())
            .await;
        assert_eq!(resolution, Resolution::Unconfigured);
        assert_eq!(oracle.call_count().await, 0);
        assert_eq!(board.snapshot().configured, ConfiguredState::Unconfigured);
        assert_eq!(board.snapshot().phase, Phase::Idle);
        assert_eq!(resolver.state().configured, ConfiguredState::Unconfigured);
    }

    #[tokio::test]
    async fn test_disposed_resolver_never_publishes() {
        let dir = tempfile::tempdir().unwrap();
        let deps = deps(Arc::new(MockOracle::new()));
        let board = Arc::clone(&deps.board);
        let resolver = WorkspaceResolver::spawn(WorkspaceRoot::new("ws", dir.path()), deps);
        resolver.dispose();

        let resolution = resolver
            .resolve_for_file(&dir.path().join("a.rb"), board.claim_focus())
            .await;
        assert_eq!(resolution, Resolution::Superseded);
        assert!(board.snapshot().record.is_none());
        assert!(resolver.state().disposed);
    }

    #[tokio::test]
    async fn test_dispose_stops_spinner_of_focused_request() {
        let dir = tempfile::tempdir().unwrap();
        let deps = deps(Arc::new(MockOracle::new()));
        let board = Arc::clone(&deps.board);
        let resolver = WorkspaceResolver::spawn(WorkspaceRoot::new("ws", dir.path()), deps);

        let ticket = board.claim_focus();
        let request_id = resolver.begin_request(ticket);
        assert!(board.publish_if(ticket, || true, |snapshot| snapshot.working = true));
        assert_eq!(board.snapshot().phase, Phase::Working);

        resolver.dispose();
        assert_eq!(board.snapshot().phase, Phase::Idle);
        assert_eq!(
            resolver
                .run_request(&dir.path().join("a.rb"), request_id, ticket)
                .await,
            Resolution::Superseded
        );
    }

    #[tokio::test]
    async fn test_dispose_leaves_other_focus_alone() {
        let dir = tempfile::tempdir().unwrap();
        let deps = deps(Arc::new(MockOracle::new()));
        let board = Arc::clone(&deps.board);
        let resolver = WorkspaceResolver::spawn(WorkspaceRoot::new("ws", dir.path()), deps);

        resolver.begin_request(board.claim_focus());
        // Focus moved to a lookup in some other workspace.
        let elsewhere = board.claim_focus();
        board.publish_if(elsewhere, || true, |snapshot| snapshot.working = true);

        resolver.dispose();
        assert!(board.snapshot().working);
    }

    #[tokio::test]
    async fn test_later_request_makes_earlier_stale() {
        let dir = tempfile::tempdir().unwrap();
        let deps = deps(Arc::new(MockOracle::new()));
        let board = Arc::clone(&deps.board);
        let resolver = WorkspaceResolver::spawn(WorkspaceRoot::new("ws", dir.path()), deps);

        let first_ticket = board.claim_focus();
        let first = resolver.begin_request(first_ticket);
        let second_ticket = board.claim_focus();
        let second = resolver.begin_request(second_ticket);

        // Running out of order must not let the older request publish.
        let file = dir.path().join("b.rb");
        assert!(resolver.run_request(&file, second, second_ticket).await.record().is_some());
        assert_eq!(
            resolver
                .run_request(&dir.path().join("a.rb"), first, first_ticket)
                .await,
            Resolution::Superseded
        );
        assert_eq!(board.snapshot().record.unwrap().file_path(), file);
    }
}
