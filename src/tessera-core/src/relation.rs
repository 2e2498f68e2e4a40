//! The relation contract consumed by commands.
//!
//! A relation is an opaque handle onto a backend-held collection of tuples. The
//! engine only ever touches it through the mutation primitives and the named
//! helpers declared here; how a backend stores or restricts data is its own
//! business.

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use common_error::{TesseraError, TesseraResult};

use crate::identifiers::AdapterId;
use crate::types::{Tuple, Value};

/// Shared handle to a relation.
pub type RelationHandle = Arc<dyn Relation>;

/// What a relation helper produced.
#[derive(Debug, Clone)]
pub enum HelperOutput {
    /// A derived relation (for example a restricted view).
    Relation(RelationHandle),
    /// Any other value.
    Value(Value),
}

impl HelperOutput {
    /// Get the derived relation, if the helper produced one.
    pub fn into_relation(self) -> Option<RelationHandle> {
        match self {
            Self::Relation(relation) => Some(relation),
            Self::Value(_) => None,
        }
    }

    /// Get the plain value, if the helper produced one.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Relation(_) => None,
        }
    }
}

/// Backend-specific mutable collection of tuples.
///
/// # Contract
///
/// - Primitives may perform I/O and block; the engine adds no timeout.
/// - Failures are returned as-is and surface unmodified to the command caller.
/// - `helper` exposes domain methods (finders, restrictions) by name.
pub trait Relation: Send + Sync + Debug {
    /// Relation name used by command classes and registries.
    fn name(&self) -> &str;

    /// Identifier of the adapter that owns this relation.
    fn adapter(&self) -> &AdapterId;

    /// Insert a tuple, returning what the backend stored.
    fn insert(&self, tuple: Tuple) -> TesseraResult<Value>;

    /// Apply `changes` to the tuples this relation covers, returning the updated tuples.
    fn update(&self, changes: &Tuple) -> TesseraResult<Value>;

    /// Delete the tuples this relation covers, returning the deleted tuples.
    fn delete(&self) -> TesseraResult<Value>;

    /// Invoke a domain helper by name.
    fn helper(&self, name: &str, _args: &[Value]) -> TesseraResult<HelperOutput> {
        Err(TesseraError::unknown_helper(format!(
            "relation `{}` does not define `{name}`",
            self.name()
        )))
    }

    /// Names of the helpers this relation defines.
    fn helper_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Structural equality with another relation handle.
    ///
    /// Handles pointing at the same allocation are always equal; backends
    /// override this when distinct handles can denote the same relation.
    fn same_relation(&self, _other: &dyn Relation) -> bool {
        false
    }

    /// Access to the concrete type for backend-specific downcasts.
    fn as_any(&self) -> &dyn Any;
}

/// Whether two handles denote the same relation.
pub fn relation_eq(left: &RelationHandle, right: &RelationHandle) -> bool {
    Arc::ptr_eq(left, right) || left.same_relation(right.as_ref())
}
