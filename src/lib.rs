//! Tessera - composable mutation commands over backend-agnostic relations
//!
//! Tessera generates create, update and delete commands for named relations,
//! composes them into pipelines that thread each result into the next stage,
//! and indexes them in a per-relation registry.

#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

// Re-export workspace crates
pub use common_config as config;
pub use common_error as error;
pub use tessera_command as command;
pub use tessera_core as core;
pub use tessera_storage as storage;

/// Tessera version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
