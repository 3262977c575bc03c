//! Externally observable ownership status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ownership::OwnershipRecord;

/// Resolution phase shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Working,
    Error,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Working => write!(f, "working"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Whether ownership tooling was found for the focused workspace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfiguredState {
    #[default]
    Unknown,
    Configured,
    Unconfigured,
}

impl From<bool> for ConfiguredState {
    fn from(configured: bool) -> Self {
        if configured {
            Self::Configured
        } else {
            Self::Unconfigured
        }
    }
}

/// Icon + text for a status bar style presenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLabel {
    pub icon: &'static str,
    pub text: String,
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$({}) {}", self.icon, self.text)
    }
}

/// The single piece of process-wide state presentation layers read.
///
/// `working` and `error` are tracked separately so an error stays visible
/// while a later request is in flight; `phase` is derived from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub phase: Phase,
    pub record: Option<OwnershipRecord>,
    pub configured: ConfiguredState,
    pub working: bool,
    pub error: Option<String>,
    /// False once the active editor closed; presenters hide the label.
    pub visible: bool,
    pub updated_at: DateTime<Utc>,
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            record: None,
            configured: ConfiguredState::Unknown,
            working: false,
            error: None,
            visible: true,
            updated_at: Utc::now(),
        }
    }
}

impl StatusSnapshot {
    /// Re-derive `phase` after the flags changed.
    pub fn recompute(&mut self) {
        self.phase = if self.error.is_some() {
            Phase::Error
        } else if self.working {
            Phase::Working
        } else {
            Phase::Idle
        };
        self.updated_at = Utc::now();
    }

    /// User-visible label.
    ///
    /// Precedence: error, working, owned, not configured, none.
    pub fn label(&self) -> StatusLabel {
        if self.error.is_some() {
            return StatusLabel {
                icon: "error",
                text: "Owner: error checking ownership!".to_string(),
            };
        }
        if self.working {
            return StatusLabel {
                icon: "loading~spin",
                text: "Owner: running...".to_string(),
            };
        }
        if let Some(record) = &self.record {
            return StatusLabel {
                icon: "account",
                text: format!("Owner: {}", record.team_name()),
            };
        }
        if self.configured == ConfiguredState::Unconfigured {
            return StatusLabel {
                icon: "circle-slash",
                text: "Owner: not configured".to_string(),
            };
        }
        StatusLabel {
            icon: "warning",
            text: "Owner: none".to_string(),
        }
    }
}
