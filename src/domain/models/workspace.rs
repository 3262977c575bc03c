//! Workspace roots tracked by the router.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

/// A workspace root directory plus the stable name it is tracked under.
///
/// Roots are never mutated; a changed workspace is removed and re-added.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkspaceRoot {
    name: String,
    path: PathBuf,
}

impl WorkspaceRoot {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Build a root named after the last component of `path`.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Self { name, path }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `file` lies under this root (component-wise, not string prefix).
    pub fn contains(&self, file: &Path) -> bool {
        file.starts_with(&self.path)
    }

    /// Number of normal components in the root, used for longest-prefix matching.
    pub fn depth(&self) -> usize {
        self.path
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .count()
    }

    /// Path of `file` relative to this root, if it lies under it.
    pub fn relative_path(&self, file: &Path) -> Option<PathBuf> {
        file.strip_prefix(&self.path).ok().map(Path::to_path_buf)
    }

    /// Absolute path for a workspace-relative reference.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.path.join(relative)
    }
}

impl fmt::Display for WorkspaceRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.path.display())
    }
}

/// Parses `name=dir` or a bare `dir`.
impl FromStr for WorkspaceRoot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("workspace path cannot be empty".to_string());
        }
        match s.split_once('=') {
            Some((name, path)) if !name.is_empty() && !path.is_empty() => {
                Ok(Self::new(name, path))
            }
            Some(_) => Err(format!("invalid workspace root '{s}', expected name=dir")),
            None => Ok(Self::from_path(s)),
        }
    }
}
