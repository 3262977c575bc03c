//! Routes files to the resolver of the workspace that contains them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::status_board::{FocusTicket, StatusBoard};
use super::workspace_resolver::{ResolverDeps, WorkspaceResolver};
use crate::domain::models::{Resolution, WorkspaceRoot};

/// A request already numbered and holding focus, ready to run.
///
/// Routing is ordered by the caller; running may happen on any task.
pub struct RoutedRequest {
    resolver: Arc<WorkspaceResolver>,
    file: PathBuf,
    request_id: u64,
    ticket: FocusTicket,
}

impl RoutedRequest {
    pub fn resolver(&self) -> &Arc<WorkspaceResolver> {
        &self.resolver
    }

    pub fn ticket(&self) -> FocusTicket {
        self.ticket
    }

    pub async fn run(self) -> Resolution {
        self.resolver
            .run_request(&self.file, self.request_id, self.ticket)
            .await
    }
}

/// Tracks one resolver per open workspace, keyed by workspace name.
pub struct WorkspaceRouter {
    deps: ResolverDeps,
    resolvers: RwLock<HashMap<String, Arc<WorkspaceResolver>>>,
}

impl WorkspaceRouter {
    pub fn new(deps: ResolverDeps) -> Self {
        Self {
            deps,
            resolvers: RwLock::new(HashMap::new()),
        }
    }

    pub fn board(&self) -> &Arc<StatusBoard> {
        &self.deps.board
    }

    /// Track `root`, replacing and disposing any resolver with the same name.
    pub async fn add_workspace(&self, root: WorkspaceRoot) -> Arc<WorkspaceResolver> {
        let name = root.name().to_string();
        let resolver = WorkspaceResolver::spawn(root, self.deps.clone());
        let previous = self
            .resolvers
            .write()
            .await
            .insert(name.clone(), Arc::clone(&resolver));
        if let Some(previous) = previous {
            previous.dispose();
            info!(workspace = %name, "workspace replaced");
        } else {
            info!(workspace = %name, root = %resolver.root().path().display(), "workspace added");
        }
        resolver
    }

    /// Stop tracking the workspace called `name`. Returns whether it existed.
    pub async fn remove_workspace(&self, name: &str) -> bool {
        let removed = self.resolvers.write().await.remove(name);
        match removed {
            Some(resolver) => {
                resolver.dispose();
                info!(workspace = %name, "workspace removed");
                true
            }
            None => false,
        }
    }

    /// Apply a workspace-change event: removals first, then additions.
    pub async fn on_workspaces_changed(&self, added: Vec<WorkspaceRoot>, removed: &[WorkspaceRoot]) {
        for root in removed {
            self.remove_workspace(root.name()).await;
        }
        for root in added {
            self.add_workspace(root).await;
        }
    }

    /// Resolver whose root is the longest prefix of `file`.
    pub async fn resolver_for(&self, file: &Path) -> Option<Arc<WorkspaceResolver>> {
        let resolvers = self.resolvers.read().await;
        resolvers
            .values()
            .filter(|resolver| resolver.root().contains(file))
            .max_by(|a, b| {
                a.root()
                    .depth()
                    .cmp(&b.root().depth())
                    .then_with(|| b.root().name().cmp(a.root().name()))
            })
            .cloned()
    }

    /// Claim focus for `file` and number a request in its workspace.
    ///
    /// Focus moves even when no workspace contains `file`, so older lookups
    /// can no longer publish.
    pub async fn route(&self, file: &Path) -> Option<RoutedRequest> {
        let ticket = self.deps.board.claim_focus();
        let Some(resolver) = self.resolver_for(file).await else {
            debug!(file = %file.display(), "file is outside every tracked workspace");
            return None;
        };
        let request_id = resolver.begin_request(ticket);
        Some(RoutedRequest {
            resolver,
            file: file.to_path_buf(),
            request_id,
            ticket,
        })
    }

    /// Resolve `file` in its workspace; `None` when no workspace contains it.
    pub async fn route_and_run(&self, file: &Path) -> Option<Resolution> {
        Some(self.route(file).await?.run().await)
    }

    pub async fn workspaces(&self) -> Vec<WorkspaceRoot> {
        let mut roots: Vec<_> = self
            .resolvers
            .read()
            .await
            .values()
            .map(|resolver| resolver.root().clone())
            .collect();
        roots.sort_by(|a, b| a.name().cmp(b.name()));
        roots
    }

    pub async fn resolver(&self, name: &str) -> Option<Arc<WorkspaceResolver>> {
        self.resolvers.read().await.get(name).cloned()
    }

    /// Dispose every resolver.
    pub async fn dispose_all(&self) {
        let drained: Vec<_> = self.resolvers.write().await.drain().collect();
        for (_, resolver) in drained {
            resolver.dispose();
        }
    }
}
