//! Adapters for external systems: ownership oracles and the local disk.

pub mod fs;
pub mod oracles;
