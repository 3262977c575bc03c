//! `for-file`: resolve the owner of a single file and exit.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::output::{output, CommandOutput};
use crate::cli::{absolute_path, open_context};
use crate::domain::models::{Action, Config, Resolution, WorkspaceRoot};

#[derive(Args, Debug)]
pub struct ForFileArgs {
    /// File to look up
    pub path: PathBuf,

    /// Workspace root as `name=dir` or `dir` (repeatable, defaults to the current directory)
    #[arg(short = 'w', long = "workspace", value_name = "ROOT")]
    pub workspaces: Vec<WorkspaceRoot>,
}

#[derive(Debug, Serialize)]
pub struct ForFileOutput {
    pub file: String,
    pub workspace: Option<String>,
    pub outcome: &'static str,
    pub team_name: Option<String>,
    pub team_config: Option<String>,
    pub actions: Vec<Action>,
    pub error: Option<String>,
    pub label: String,
}

impl CommandOutput for ForFileOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.label.clone()];
        match self.outcome {
            "owned" => {
                if let Some(config) = &self.team_config {
                    lines.push(format!("Team config: {config}"));
                }
                for action in &self.actions {
                    lines.push(format!("  {} -> {}", action.title, action.target));
                }
            }
            "error" => {
                if let Some(error) = &self.error {
                    lines.push(format!("Details: {error}"));
                }
            }
            "outside_workspaces" => {
                lines = vec![format!("{} is not inside any workspace", self.file)];
            }
            _ => {}
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: ForFileArgs, config: &Config, json_mode: bool) -> Result<()> {
    let ctx = open_context(config, &args.workspaces).await?;
    let file = absolute_path(&args.path)?;

    let workspace = ctx
        .router()
        .resolver_for(&file)
        .await
        .map(|resolver| resolver.root().name().to_string());
    let resolution = ctx.on_active_file_changed(Some(file.clone())).await;
    let label = ctx.snapshot().label().to_string();
    ctx.shutdown().await;

    let mut out = ForFileOutput {
        file: file.display().to_string(),
        workspace,
        outcome: "outside_workspaces",
        team_name: None,
        team_config: None,
        actions: Vec::new(),
        error: None,
        label,
    };

    match resolution {
        Some(Resolution::OwnedBy(record)) => {
            out.outcome = "owned";
            out.team_name = Some(record.team_name().to_string());
            out.team_config = Some(record.team_config_path().display().to_string());
            out.actions = record.actions().to_vec();
        }
        Some(Resolution::NoOwner) => out.outcome = "no_owner",
        Some(Resolution::Error(detail)) => {
            out.outcome = "error";
            out.error = Some(detail);
        }
        Some(Resolution::Unconfigured) => out.outcome = "unconfigured",
        Some(Resolution::Superseded) => out.outcome = "superseded",
        None => {}
    }

    output(&out, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(outcome: &'static str) -> ForFileOutput {
        ForFileOutput {
            file: "/ws/app/a.rb".to_string(),
            workspace: Some("ws".to_string()),
            outcome,
            team_name: Some("Payments".to_string()),
            team_config: Some("/ws/config/teams/payments.yml".to_string()),
            actions: vec![Action::slack_channel("payments-eng")],
            error: None,
            label: "$(account) Owner: Payments".to_string(),
        }
    }

    #[test]
    fn test_human_output_lists_actions() {
        let text = sample("owned").to_human();
        assert!(text.starts_with("$(account) Owner: Payments"));
        assert!(text.contains("Team config: /ws/config/teams/payments.yml"));
        assert!(text.contains("Slack: #payments-eng -> https://slack.com/app_redirect?channel=payments-eng"));
    }

    #[test]
    fn test_outside_workspaces_message() {
        let text = sample("outside_workspaces").to_human();
        assert_eq!(text, "/ws/app/a.rb is not inside any workspace");
    }

    #[test]
    fn test_json_output_shape() {
        let json = sample("owned").to_json();
        assert_eq!(json["outcome"], "owned");
        assert_eq!(json["team_name"], "Payments");
        assert_eq!(json["actions"][0]["title"], "Slack: #payments-eng");
    }
}
