//! External ownership command oracle.
//!
//! Runs `bin/<tool> for_file "<relative path>" --json` from the workspace root.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{info, warn};

use crate::domain::models::{OracleConfig, OracleFailure, OracleResult, WorkspaceRoot};
use crate::domain::ports::OwnershipOracle;

/// Command oracle configuration.
#[derive(Debug, Clone)]
pub struct CommandOracleConfig {
    /// Tool name under the workspace's `bin/` directory
    pub tool: String,
    /// Optional upper bound on one invocation
    pub timeout_ms: Option<u64>,
}

impl Default for CommandOracleConfig {
    fn default() -> Self {
        Self {
            tool: "codeownership".to_string(),
            timeout_ms: None,
        }
    }
}

impl From<&OracleConfig> for CommandOracleConfig {
    fn from(config: &OracleConfig) -> Self {
        Self {
            tool: config.tool.clone(),
            timeout_ms: config.timeout_ms,
        }
    }
}

/// Oracle backed by the workspace's ownership CLI.
pub struct CommandOracle {
    config: CommandOracleConfig,
}

impl CommandOracle {
    pub fn new(config: CommandOracleConfig) -> Self {
        Self { config }
    }

    /// Workspace-relative location of the tool.
    fn tool_path(&self) -> PathBuf {
        Path::new("bin").join(&self.config.tool)
    }

    fn build_args(relative_path: &Path) -> Vec<String> {
        vec![
            "for_file".to_string(),
            relative_path.to_string_lossy().into_owned(),
            "--json".to_string(),
        ]
    }

    /// Shell-style rendering of the invocation, for the log.
    fn command_line(&self, relative_path: &Path) -> String {
        format!(
            "{} for_file \"{}\" --json",
            self.tool_path().display(),
            relative_path.display()
        )
    }

    /// Turn captured process output into an oracle answer.
    fn interpret(exit_code: Option<i32>, success: bool, stdout: &str, stderr: &str) -> OracleResult {
        if !success || !stderr.is_empty() {
            return Err(OracleFailure::ProcessFailure {
                exit_code,
                stderr: stderr.to_string(),
            });
        }
        if stdout.is_empty() {
            return Err(OracleFailure::EmptyOutput);
        }
        Ok(stdout.to_string())
    }
}

#[async_trait]
impl OwnershipOracle for CommandOracle {
    fn name(&self) -> &'static str {
        "command"
    }

    fn probe_path(&self) -> Option<PathBuf> {
        Some(self.tool_path())
    }

    async fn query(&self, root: &WorkspaceRoot, relative_path: &Path) -> OracleResult {
        let program = root.resolve(self.tool_path());
        info!(workspace = %root.name(), "command: {}", self.command_line(relative_path));

        let mut cmd = Command::new(&program);
        cmd.args(Self::build_args(relative_path))
            .current_dir(root.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match self.config.timeout_ms {
            Some(after_ms) => {
                match tokio::time::timeout(Duration::from_millis(after_ms), cmd.output()).await {
                    Ok(output) => output,
                    Err(_) => {
                        warn!(workspace = %root.name(), after_ms, "ownership command timed out");
                        return Err(OracleFailure::Timeout { after_ms });
                    }
                }
            }
            None => cmd.output().await,
        };

        let output = output.map_err(|e| OracleFailure::ProcessFailure {
            exit_code: None,
            stderr: format!("failed to spawn {}: {e}", program.display()),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        info!(workspace = %root.name(), "stdout: {stdout}");
        if !stderr.is_empty() {
            warn!(workspace = %root.name(), exit_code = ?output.status.code(), "stderr: {stderr}");
        }

        Self::interpret(output.status.code(), output.status.success(), &stdout, &stderr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args() {
        let args = CommandOracle::build_args(Path::new("app/models/user.rb"));
        assert_eq!(args, vec!["for_file", "app/models/user.rb", "--json"]);
    }

    #[test]
    fn test_command_line_and_probe_path() {
        let oracle = CommandOracle::new(CommandOracleConfig::default());
        assert_eq!(
            oracle.command_line(Path::new("a b.rb")),
            "bin/codeownership for_file \"a b.rb\" --json"
        );
        assert_eq!(oracle.probe_path(), Some(PathBuf::from("bin/codeownership")));
    }

    #[test]
    fn test_interpret() {
        assert_eq!(
            CommandOracle::interpret(Some(0), true, "{}", ""),
            Ok("{}".to_string())
        );
        assert_eq!(
            CommandOracle::interpret(Some(0), true, "", ""),
            Err(OracleFailure::EmptyOutput)
        );
        assert!(matches!(
            CommandOracle::interpret(Some(1), false, "{}", ""),
            Err(OracleFailure::ProcessFailure { exit_code: Some(1), .. })
        ));
        assert!(matches!(
            CommandOracle::interpret(Some(0), true, "{}", "deprecation warning"),
            Err(OracleFailure::ProcessFailure { .. })
        ));
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        fn workspace_with_tool(script: &str) -> (TempDir, WorkspaceRoot) {
            let dir = tempfile::tempdir().unwrap();
            let bin = dir.path().join("bin");
            std::fs::create_dir_all(&bin).unwrap();
            let tool = bin.join("codeownership");
            std::fs::write(&tool, format!("#!/bin/sh\n{script}\n")).unwrap();
            std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();
            let root = WorkspaceRoot::new("ws", dir.path());
            (dir, root)
        }

        fn oracle(timeout_ms: Option<u64>) -> CommandOracle {
            CommandOracle::new(CommandOracleConfig {
                tool: "codeownership".to_string(),
                timeout_ms,
            })
        }

        #[tokio::test]
        async fn test_passes_arguments_and_returns_stdout() {
            let (_dir, root) = workspace_with_tool(
                r#"echo "{\"team_name\":\"Payments\",\"team_yml\":\"$1|$2|$3\"}""#,
            );
            let payload = oracle(None)
                .query(&root, Path::new("app/a.rb"))
                .await
                .unwrap();
            assert_eq!(
                payload,
                r#"{"team_name":"Payments","team_yml":"for_file|app/a.rb|--json"}"#
            );
        }

        #[tokio::test]
        async fn test_runs_in_workspace_root() {
            let (dir, root) = workspace_with_tool("pwd");
            let payload = oracle(None).query(&root, Path::new("a.rb")).await.unwrap();
            let expected = dir.path().canonicalize().unwrap();
            assert_eq!(PathBuf::from(payload).canonicalize().unwrap(), expected);
        }

        #[tokio::test]
        async fn test_non_zero_exit_is_process_failure() {
            let (_dir, root) = workspace_with_tool("echo 'no such file' >&2\nexit 3");
            let result = oracle(None).query(&root, Path::new("a.rb")).await;
            assert_eq!(
                result,
                Err(OracleFailure::ProcessFailure {
                    exit_code: Some(3),
                    stderr: "no such file".to_string(),
                })
            );
        }

        #[tokio::test]
        async fn test_empty_output() {
            let (_dir, root) = workspace_with_tool("exit 0");
            let result = oracle(None).query(&root, Path::new("a.rb")).await;
            assert_eq!(result, Err(OracleFailure::EmptyOutput));
        }

        #[tokio::test]
        async fn test_timeout() {
            let (_dir, root) = workspace_with_tool("sleep 5");
            let result = oracle(Some(100)).query(&root, Path::new("a.rb")).await;
            assert_eq!(result, Err(OracleFailure::Timeout { after_ms: 100 }));
        }

        #[tokio::test]
        async fn test_missing_tool_is_process_failure() {
            let dir = tempfile::tempdir().unwrap();
            let root = WorkspaceRoot::new("ws", dir.path());
            let result = oracle(None).query(&root, Path::new("a.rb")).await;
            assert!(matches!(
                result,
                Err(OracleFailure::ProcessFailure { exit_code: None, .. })
            ));
        }
    }
}
