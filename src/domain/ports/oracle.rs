//! Oracle port - interface for ownership backends.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::domain::models::{OracleResult, WorkspaceRoot};

/// Something that can answer "who owns this file" inside a workspace.
///
/// Implementations never propagate process or parse trouble as a panic or
/// an `Err` from the call itself beyond the typed [`OracleResult`] failure;
/// the resolver decides what each failure means for the operator.
#[async_trait]
pub trait OwnershipOracle: Send + Sync {
    /// Oracle type name.
    fn name(&self) -> &'static str;

    /// Workspace-relative path whose existence means this oracle is installed.
    ///
    /// `None` means every workspace counts as configured.
    fn probe_path(&self) -> Option<PathBuf>;

    /// Query ownership for `relative_path` under `root`.
    ///
    /// The payload on success is a JSON object with `team_name` and `team_yml`.
    async fn query(&self, root: &WorkspaceRoot, relative_path: &Path) -> OracleResult;
}
