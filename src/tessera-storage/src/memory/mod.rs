//! In-memory backend.
//!
//! This module provides a non-persistent relation implementation and the
//! adapter that generates commands for it.
//!
//! # Design
//!
//! - Relations are views: a shared `Vec<Tuple>` plus an equality restriction
//! - Domain helpers (`by_id`, ...) are registered per relation by name
//! - The adapter ships Create, Update and Delete templates
//!
//! # Usage
//!
//! ```rust,ignore
//! use tessera_storage::{MemoryAdapter, MemoryRelation};
//!
//! let users = MemoryRelation::new("users").with_restriction_helper("by_id", "id");
//! let repositories = Repositories::new().with(Arc::new(MemoryAdapter::new()));
//! ```

mod adapter;
mod commands;
mod relation;

pub use adapter::MemoryAdapter;
pub use commands::{CreateTuples, DeleteTuples, UpdateTuples};
pub use relation::{HelperFn, MemoryRelation};
