//! Operation variants and result arity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use common_error::TesseraError;

/// The closed set of mutating operations a command can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    /// Insert new tuples.
    Create,
    /// Change existing tuples.
    Update,
    /// Remove tuples.
    Delete,
}

impl OperationType {
    /// All operations, in declaration order.
    pub const ALL: [Self; 3] = [Self::Create, Self::Update, Self::Delete];

    /// Lowercase symbol used as the registry key (`create`, `update`, `delete`).
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Capitalized name used in class names.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for OperationType {
    type Err = TesseraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(TesseraError::configuration(format!(
                "unknown operation `{other}`"
            ))),
        }
    }
}

/// Declared shape of a command's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultArity {
    /// A single tuple.
    One,
    /// A sequence of tuples.
    #[default]
    Many,
}

impl fmt::Display for ResultArity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => f.write_str("one"),
            Self::Many => f.write_str("many"),
        }
    }
}
