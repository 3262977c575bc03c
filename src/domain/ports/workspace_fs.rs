//! Filesystem port used for tooling probes and team config reads.

use async_trait::async_trait;
use std::path::Path;

use crate::domain::errors::OwnershipResult;

#[async_trait]
pub trait WorkspaceFs: Send + Sync {
    /// Whether `path` exists. Errors count as "does not exist".
    async fn exists(&self, path: &Path) -> bool;

    /// Read a UTF-8 document.
    async fn read_to_string(&self, path: &Path) -> OwnershipResult<String>;
}
