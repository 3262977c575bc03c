//! Interprets raw oracle payloads.
//!
//! The oracle speaks a single JSON object with `team_name` and `team_yml`.
//! Anything that is not a JSON object is a validation failure; an object
//! that asserts nothing useful is "no owner", which is not an error.

use serde_json::Value;
use tracing::warn;

use crate::domain::errors::ValidationFailure;
use crate::domain::models::UNOWNED_TEAM;

/// Why a well-formed payload still yields no owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoOwnerReason {
    /// One or both required string fields were absent.
    MissingFields(Vec<&'static str>),
    /// The oracle answered with the `Unowned` sentinel.
    Unowned,
}

/// Validated oracle claim, before the team config path is made absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedOwnership {
    Owned {
        team_name: String,
        /// Workspace-relative path of the team config document
        team_config_ref: String,
    },
    NoOwner(NoOwnerReason),
}

pub fn parse(raw: &str) -> Result<ParsedOwnership, ValidationFailure> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationFailure::Empty);
    }

    let value: Value =
        serde_json::from_str(trimmed).map_err(|e| ValidationFailure::Malformed(e.to_string()))?;
    let Some(object) = value.as_object() else {
        return Err(ValidationFailure::Malformed(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    };

    let team_name = object.get("team_name").and_then(Value::as_str);
    let team_yml = object.get("team_yml").and_then(Value::as_str);

    let mut missing = Vec::new();
    if team_name.is_none() {
        warn!("Missing expected property `team_name` in command output");
        missing.push("team_name");
    }
    if team_yml.is_none() {
        warn!("Missing expected property `team_yml` in command output");
        missing.push("team_yml");
    }

    match (team_name, team_yml) {
        (Some(UNOWNED_TEAM), Some(_)) => Ok(ParsedOwnership::NoOwner(NoOwnerReason::Unowned)),
        (Some(team_name), Some(team_yml)) => Ok(ParsedOwnership::Owned {
            team_name: team_name.to_string(),
            team_config_ref: team_yml.to_string(),
        }),
        _ => Ok(ParsedOwnership::NoOwner(NoOwnerReason::MissingFields(missing))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
