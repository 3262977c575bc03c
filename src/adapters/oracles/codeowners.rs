//! CODEOWNERS file oracle.
//!
//! Answers from `.github/CODEOWNERS` in the same payload shape the command
//! oracle produces, so the resolver treats both identically.

use async_trait::async_trait;
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use super::ownership_payload;
use crate::domain::models::{OracleFailure, OracleResult, WorkspaceRoot, UNOWNED_TEAM};
use crate::domain::ports::{OwnershipOracle, WorkspaceFs};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

pub struct CodeownersOracle {
    fs: Arc<dyn WorkspaceFs>,
    codeowners_path: PathBuf,
}

impl CodeownersOracle {
    pub fn new(fs: Arc<dyn WorkspaceFs>, codeowners_path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            codeowners_path: codeowners_path.into(),
        }
    }

    /// First owner of the first line whose pattern matches `target`.
    ///
    /// `Some(None)` means a line matched but listed no owners.
    fn lookup<'a>(contents: &'a str, target: &str) -> Option<Option<&'a str>> {
        contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .find_map(|line| {
                let mut parts = line.split_whitespace();
                let pattern = parts.next()?;
                pattern_matches(pattern, target).then(|| parts.next())
            })
    }
}

/// Glob match of a CODEOWNERS pattern against `/relative/path`.
fn pattern_matches(pattern: &str, target: &str) -> bool {
    let mut base = pattern.to_string();
    if base.ends_with('/') {
        base.push_str("**");
    }

    let mut candidates = if base.starts_with('/') {
        vec![base]
    } else {
        vec![format!("/{base}"), format!("/**/{base}")]
    };
    // A bare directory name also owns everything below it.
    let nested: Vec<String> = candidates
        .iter()
        .filter(|c| !c.ends_with("**"))
        .map(|c| format!("{c}/**"))
        .collect();
    candidates.extend(nested);

    candidates.iter().any(|candidate| match Pattern::new(candidate) {
        Ok(compiled) => compiled.matches_with(target, MATCH_OPTIONS),
        Err(e) => {
            debug!(pattern = %candidate, error = %e, "skipping invalid CODEOWNERS pattern");
            false
        }
    })
}

#[async_trait]
impl OwnershipOracle for CodeownersOracle {
    fn name(&self) -> &'static str {
        "codeowners"
    }

    fn probe_path(&self) -> Option<PathBuf> {
        Some(self.codeowners_path.clone())
    }

    async fn query(&self, root: &WorkspaceRoot, relative_path: &Path) -> OracleResult {
        let file = root.resolve(&self.codeowners_path);
        let contents = self
            .fs
            .read_to_string(&file)
            .await
            .map_err(|e| OracleFailure::ProcessFailure {
                exit_code: None,
                stderr: format!("cannot read {}: {e}", file.display()),
            })?;

        let target = format!("/{}", relative_path.to_string_lossy().replace('\\', "/"));
        let team = Self::lookup(&contents, &target)
            .flatten()
            .unwrap_or(UNOWNED_TEAM);
        info!(workspace = %root.name(), file = %target, team, "codeowners lookup");

        Ok(ownership_payload(
            team,
            &self.codeowners_path.to_string_lossy(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::fs::LocalFs;

    const CODEOWNERS: &str = "\
# Payments
/app/payments/ @payments-team
*.md @docs-team

/app/legacy.rb
lib/ @platform-team @infra
";

    #[test]
    fn test_anchored_directory() {
        assert!(pattern_matches("/app/payments/", "/app/payments/charge.rb"));
        assert!(pattern_matches("/app/payments/", "/app/payments/deep/x.rb"));
        assert!(!pattern_matches("/app/payments/", "/lib/app/payments/x.rb"));
    }

    #[test]
    fn test_unanchored_pattern_matches_any_depth() {
        assert!(pattern_matches("*.md", "/README.md"));
        assert!(pattern_matches("*.md", "/docs/guide.md"));
        assert!(!pattern_matches("*.md", "/docs/guide.rb"));
        assert!(pattern_matches("lib/", "/engines/lib/a.rb"));
    }

    #[test]
    fn test_bare_directory_owns_contents() {
        assert!(pattern_matches("/config", "/config/routes.rb"));
    }

    #[test]
    fn test_lookup_first_match_wins() {
        let owner = CodeownersOracle::lookup(CODEOWNERS, "/app/payments/README.md");
        assert_eq!(owner, Some(Some("@payments-team")));
    }

    #[test]
    fn test_lookup_line_without_owner() {
        assert_eq!(CodeownersOracle::lookup(CODEOWNERS, "/app/legacy.rb"), Some(None));
        assert_eq!(CodeownersOracle::lookup(CODEOWNERS, "/app/other.rb"), None);
    }

    #[tokio::test]
    async fn test_query_payload() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".github")).unwrap();
        std::fs::write(dir.path().join(".github/CODEOWNERS"), CODEOWNERS).unwrap();
        let root = WorkspaceRoot::new("ws", dir.path());
        let oracle = CodeownersOracle::new(Arc::new(LocalFs::new()), ".github/CODEOWNERS");

        let payload = oracle.query(&root, Path::new("lib/tasks/a.rake")).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(json["team_name"], "@platform-team");
        assert_eq!(json["team_yml"], ".github/CODEOWNERS");

        let payload = oracle.query(&root, Path::new("app/other.rb")).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(json["team_name"], UNOWNED_TEAM);
    }

    #[tokio::test]
    async fn test_missing_codeowners_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let root = WorkspaceRoot::new("ws", dir.path());
        let oracle = CodeownersOracle::new(Arc::new(LocalFs::new()), ".github/CODEOWNERS");
        let result = oracle.query(&root, Path::new("a.rb")).await;
        assert!(matches!(result, Err(OracleFailure::ProcessFailure { .. })));
    }
}
