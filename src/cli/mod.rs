//! Command-line interface.

pub mod commands;
pub mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::application::OwnershipContext;
use crate::domain::models::{Config, WorkspaceRoot};

#[derive(Parser, Debug)]
#[command(name = "code-ownership", version, about = "Show which team owns a file")]
pub struct Cli {
    /// Emit JSON instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    /// Extra config file merged above .code-ownership/config.yaml
    #[arg(long, global = true, env = "CODE_OWNERSHIP_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the owner of one file
    ForFile(commands::for_file::ForFileArgs),
    /// Follow editor events on stdin and print status changes
    Watch(commands::watch::WatchArgs),
}

/// Print a command failure and exit non-zero.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let payload = serde_json::json!({ "error": format!("{err:#}") });
        eprintln!("{payload}");
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}

/// Absolute form of `path`, canonical when it exists.
pub(crate) fn absolute_path(path: &Path) -> Result<PathBuf> {
    if let Ok(canonical) = std::fs::canonicalize(path) {
        return Ok(canonical);
    }
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()
        .context("Failed to get current directory")?
        .join(path))
}

/// Make a workspace root absolute, keeping its name.
pub(crate) fn absolute_root(root: &WorkspaceRoot) -> Result<WorkspaceRoot> {
    Ok(WorkspaceRoot::new(root.name(), absolute_path(root.path())?))
}

/// Build a context tracking `workspaces`, or the current directory when empty.
pub(crate) async fn open_context(
    config: &Config,
    workspaces: &[WorkspaceRoot],
) -> Result<OwnershipContext> {
    let roots = if workspaces.is_empty() {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        vec![WorkspaceRoot::from_path(absolute_path(&cwd)?)]
    } else {
        workspaces.iter().map(absolute_root).collect::<Result<Vec<_>>>()?
    };

    let ctx = OwnershipContext::new(config);
    ctx.on_workspaces_changed(roots, &[]).await;
    Ok(ctx)
}
