//! Ownership records and resolution outcomes.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Team name the oracle uses to say "nobody owns this".
pub const UNOWNED_TEAM: &str = "Unowned";

/// A descriptive follow-up the presentation layer can offer for a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub title: String,
    pub target: String,
}

impl Action {
    /// Open the team configuration document.
    pub fn view_team_config(path: &Path) -> Self {
        Self {
            title: "View team config".to_string(),
            target: file_uri(path),
        }
    }

    /// Jump to the team's chat channel. `handle` carries no leading `#`.
    pub fn slack_channel(handle: &str) -> Self {
        Self {
            title: format!("Slack: #{handle}"),
            target: format!(
                "https://slack.com/app_redirect?channel={}",
                urlencoding::encode(handle)
            ),
        }
    }
}

fn file_uri(path: &Path) -> String {
    let raw = path.to_string_lossy().replace('\\', "/");
    let encoded = raw
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    if encoded.starts_with('/') {
        format!("file://{encoded}")
    } else {
        format!("file:///{encoded}")
    }
}

/// Validated answer to "which team owns this file".
///
/// Immutable once built. A new resolution replaces the record wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipRecord {
    file_path: PathBuf,
    team_name: String,
    team_config_path: PathBuf,
    actions: Vec<Action>,
}

impl OwnershipRecord {
    pub fn new(
        file_path: impl Into<PathBuf>,
        team_name: impl Into<String>,
        team_config_path: impl Into<PathBuf>,
        slack_handle: Option<&str>,
    ) -> Self {
        let team_config_path = team_config_path.into();
        let mut actions = Vec::with_capacity(2);
        if let Some(handle) = slack_handle {
            actions.push(Action::slack_channel(handle));
        }
        actions.push(Action::view_team_config(&team_config_path));

        Self {
            file_path: file_path.into(),
            team_name: team_name.into(),
            team_config_path,
            actions,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn team_name(&self) -> &str {
        &self.team_name
    }

    pub fn team_config_path(&self) -> &Path {
        &self.team_config_path
    }

    /// Ordered actions; the last one always opens the team config.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn file_name(&self) -> String {
        self.file_path.file_name().map_or_else(
            || self.file_path.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        )
    }
}

/// Terminal outcome of one resolution request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    OwnedBy(OwnershipRecord),
    NoOwner,
    Error(String),
    /// The workspace has no ownership tooling; the oracle was not consulted.
    Unconfigured,
    /// A newer request (or a focus change) superseded this one; nothing was published.
    Superseded,
}

impl Resolution {
    pub fn record(&self) -> Option<&OwnershipRecord> {
        match self {
            Self::OwnedBy(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}
