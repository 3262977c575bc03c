//! `WorkspaceFs` backed by the local disk through `tokio::fs`.

use async_trait::async_trait;
use std::path::Path;

use crate::domain::errors::OwnershipResult;
use crate::domain::ports::WorkspaceFs;

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WorkspaceFs for LocalFs {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn read_to_string(&self, path: &Path) -> OwnershipResult<String> {
        Ok(tokio::fs::read_to_string(path).await?)
    }
}
