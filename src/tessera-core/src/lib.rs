//! Core data model for Tessera.
//!
//! This crate provides the vocabulary shared by every other crate:
//! - [`Value`] and [`Tuple`] for data passed to and returned from relations
//! - [`OperationType`] and [`ResultArity`] describing commands
//! - [`Relation`], the contract a backend implements, and [`Relations`]

mod identifiers;
mod proptest_utils;
mod relation;
mod relations;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use identifiers::{AdapterId, RelationName, camelize};
pub use relation::{HelperOutput, Relation, RelationHandle, relation_eq};
pub use relations::Relations;
pub use types::{OperationType, ResultArity, Tuple, Value};
