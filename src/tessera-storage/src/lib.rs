//! Storage backends for Tessera.
//!
//! This crate provides the reference backend for the command engine:
//!
//! - [`MemoryRelation`]: tuples held in process memory, with restricted views
//!   and named helpers
//! - [`MemoryAdapter`]: the `memory` adapter with Create, Update and Delete
//!   templates
//!
//! Production backends implement [`tessera_core::Relation`] and
//! [`tessera_command::Adapter`] the same way.

pub mod memory;

pub use memory::{CreateTuples, DeleteTuples, HelperFn, MemoryAdapter, MemoryRelation, UpdateTuples};
