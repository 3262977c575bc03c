//! CLI command implementations.

pub mod for_file;
pub mod watch;
