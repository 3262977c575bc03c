//! Ownership resolution services.

pub mod config_enricher;
pub mod ownership_parser;
pub mod status_board;
pub mod workspace_resolver;
pub mod workspace_router;

pub use config_enricher::ConfigEnricher;
pub use ownership_parser::{NoOwnerReason, ParsedOwnership};
pub use status_board::{FocusTicket, StatusBoard};
pub use workspace_resolver::{ResolverDeps, WorkspaceResolver, WorkspaceState};
pub use workspace_router::{RoutedRequest, WorkspaceRouter};
