//! `watch`: follow editor events read line by line from stdin.
//!
//! Each line is either a file path (the active editor changed) or a
//! command: `:rerun [path]`, `:add [name=]dir`, `:remove name`, `:info`,
//! `:close`, `:quit`. Every distinct status label is printed as it changes.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::application::OwnershipContext;
use crate::cli::{absolute_path, absolute_root, open_context};
use crate::domain::models::{Config, StatusSnapshot, WorkspaceRoot};

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Workspace root as `name=dir` or `dir` (repeatable, defaults to the current directory)
    #[arg(short = 'w', long = "workspace", value_name = "ROOT")]
    pub workspaces: Vec<WorkspaceRoot>,
}

/// One parsed stdin line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchInput {
    Focus(PathBuf),
    Rerun(Option<PathBuf>),
    Add(WorkspaceRoot),
    Remove(String),
    Info,
    Close,
    Quit,
}

impl WatchInput {
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let Some(command) = line.strip_prefix(':') else {
            return Ok(Some(Self::Focus(PathBuf::from(line))));
        };

        let (verb, rest) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(verb, rest)| (verb, rest.trim()));
        let input = match verb {
            "rerun" => Self::Rerun((!rest.is_empty()).then(|| PathBuf::from(rest))),
            "add" if !rest.is_empty() => Self::Add(rest.parse()?),
            "remove" if !rest.is_empty() => Self::Remove(rest.to_string()),
            "info" => Self::Info,
            "close" => Self::Close,
            "quit" | "exit" => Self::Quit,
            _ => return Err(format!("unknown command: {line}")),
        };
        Ok(Some(input))
    }
}

pub async fn execute(args: WatchArgs, config: &Config, json_mode: bool) -> Result<()> {
    let ctx = Arc::new(open_context(config, &args.workspaces).await?);
    let printer = tokio::spawn(print_changes(ctx.subscribe(), json_mode));
    let mut inflight = JoinSet::new();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = match WatchInput::parse(&line) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };
        debug!(?input, "watch input");

        match input {
            WatchInput::Focus(path) => {
                // Focus is claimed here, in line order; only the lookup runs concurrently.
                if let Some(request) = ctx.focus(Some(absolute_path(&path)?)).await {
                    inflight.spawn(async move {
                        request.run().await;
                    });
                }
            }
            WatchInput::Rerun(path) => {
                let file = path.as_deref().map(absolute_path).transpose()?;
                if let Some(request) = ctx.prepare_rerun(file).await {
                    inflight.spawn(async move {
                        request.run().await;
                    });
                }
            }
            WatchInput::Add(root) => {
                ctx.on_workspaces_changed(vec![absolute_root(&root)?], &[]).await;
            }
            WatchInput::Remove(name) => {
                if !ctx.router().remove_workspace(&name).await {
                    warn!(workspace = %name, "no such workspace");
                }
            }
            WatchInput::Info => print_info(&ctx, json_mode),
            WatchInput::Close => {
                ctx.focus(None).await;
            }
            WatchInput::Quit => break,
        }

        // Reap finished lookups so the set does not grow unbounded.
        while inflight.try_join_next().is_some() {}
    }

    ctx.shutdown().await;
    inflight.abort_all();
    while inflight.join_next().await.is_some() {}
    printer.abort();
    Ok(())
}

fn print_info(ctx: &OwnershipContext, json_mode: bool) {
    let info = ctx.ownership_info();
    if json_mode {
        println!("{}", serde_json::json!({ "info": info }));
        return;
    }
    match info {
        Some(info) => {
            println!("{}", info.message);
            for action in info.actions {
                println!("  {} -> {}", action.title, action.target);
            }
        }
        None => println!("No owner to show"),
    }
}

async fn print_changes(mut rx: watch::Receiver<StatusSnapshot>, json_mode: bool) {
    let mut last: Option<String> = None;
    loop {
        let snapshot = rx.borrow_and_update().clone();
        let line = render(&snapshot, json_mode);
        if last.as_deref() != Some(line.as_str()) {
            println!("{line}");
            last = Some(line);
        }
        if rx.changed().await.is_err() {
            break;
        }
    }
}

fn render(snapshot: &StatusSnapshot, json_mode: bool) -> String {
    if json_mode {
        serde_json::json!({
            "phase": snapshot.phase,
            "label": snapshot.label(),
            "visible": snapshot.visible,
            "team_name": snapshot.record.as_ref().map(|r| r.team_name().to_string()),
            "error": snapshot.error,
        })
        .to_string()
    } else if snapshot.visible {
        snapshot.label().to_string()
    } else {
        "(hidden)".to_string()
    }
}
