//! Identifiers for adapters and relations.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Relation name as declared by a relation and referenced by command classes.
pub type RelationName = String;

/// Identifier of a backend adapter (`memory`, `sql`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdapterId(String);

impl AdapterId {
    /// Identifier of the reference in-memory adapter.
    pub const MEMORY: &'static str = "memory";

    /// Create an adapter identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name segment used in class names (`memory` becomes `Memory`).
    pub fn class_segment(&self) -> String {
        camelize(&self.0)
    }
}

impl fmt::Display for AdapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AdapterId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AdapterId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for AdapterId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Convert a snake_case identifier into CamelCase.
///
/// ```rust
/// use tessera_core::camelize;
///
/// assert_eq!(camelize("users"), "Users");
/// assert_eq!(camelize("user_tasks"), "UserTasks");
/// ```
pub fn camelize(ident: &str) -> String {
    ident
        .split(['_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect()
}
