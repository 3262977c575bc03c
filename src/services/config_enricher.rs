//! Best-effort lookup of a team's chat channel from its config document.

use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::domain::errors::OwnershipResult;
use crate::domain::ports::WorkspaceFs;

#[derive(Debug, Default, Deserialize)]
struct TeamConfigDocument {
    #[serde(default)]
    slack: Option<SlackSection>,
}

#[derive(Debug, Default, Deserialize)]
struct SlackSection {
    #[serde(default)]
    room_for_humans: Option<String>,
}

/// Derives secondary attributes from a team config document.
///
/// Never fails: an unreadable document or absent field yields `None`.
#[derive(Clone)]
pub struct ConfigEnricher {
    fs: Arc<dyn WorkspaceFs>,
}

impl ConfigEnricher {
    pub fn new(fs: Arc<dyn WorkspaceFs>) -> Self {
        Self { fs }
    }

    /// Chat channel handle without the leading `#`.
    pub async fn enrich(&self, team_config_path: &Path) -> Option<String> {
        match self.read_channel(team_config_path).await {
            Ok(handle) => handle,
            Err(e) => {
                debug!(
                    team_config = %team_config_path.display(),
                    error = %e,
                    "team config enrichment skipped"
                );
                None
            }
        }
    }

    async fn read_channel(&self, team_config_path: &Path) -> OwnershipResult<Option<String>> {
        let contents = self.fs.read_to_string(team_config_path).await?;
        let document: TeamConfigDocument = serde_yaml::from_str(&contents)?;
        Ok(document
            .slack
            .and_then(|slack| slack.room_for_humans)
            .and_then(|room| normalize_handle(&room)))
    }
}

/// Strip one leading `#`; blank handles count as absent.
pub fn normalize_handle(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let handle = trimmed.strip_prefix('#').unwrap_or(trimmed).trim();
    if handle.is_empty() {
        None
    } else {
        Some(handle.to_string())
    }
}
