//! Oracle registry and factory.

use std::sync::Arc;

use crate::domain::models::{OracleConfig, OracleType};
use crate::domain::ports::{OwnershipOracle, WorkspaceFs};

use super::codeowners::CodeownersOracle;
use super::command::{CommandOracle, CommandOracleConfig};
use super::mock::MockOracle;

/// Builds the configured oracle implementation.
pub struct OracleRegistry {
    config: OracleConfig,
    fs: Arc<dyn WorkspaceFs>,
}

impl OracleRegistry {
    pub fn new(config: OracleConfig, fs: Arc<dyn WorkspaceFs>) -> Self {
        Self { config, fs }
    }

    /// Create an oracle by type.
    pub fn create_by_type(&self, oracle_type: OracleType) -> Arc<dyn OwnershipOracle> {
        match oracle_type {
            OracleType::Command => Arc::new(CommandOracle::new(CommandOracleConfig::from(&self.config))),
            OracleType::Codeowners => Arc::new(CodeownersOracle::new(
                Arc::clone(&self.fs),
                self.config.codeowners_path.clone(),
            )),
            OracleType::Mock => Arc::new(MockOracle::new()),
        }
    }

    /// Create the oracle named by `oracle.kind`.
    pub fn configured(&self) -> Arc<dyn OwnershipOracle> {
        self.create_by_type(self.config.kind)
    }
}
