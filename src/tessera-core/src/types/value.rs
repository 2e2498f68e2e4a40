//! Runtime value representation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single row exchanged with a relation: column name to value.
pub type Tuple = HashMap<String, Value>;

/// Runtime value passed into and returned from commands.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    /// Null value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit floating point.
    Float64(f64),
    /// UTF-8 string.
    String(String),
    /// Sequence of values, usually tuples.
    Array(Vec<Value>),
    /// A tuple.
    Map(Tuple),
}

impl Value {
    /// Build a tuple value from column/value pairs.
    pub fn tuple<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get as boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_int64(&self) -> Option<i64> {
        match self {
            Self::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as f64.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float64(&self) -> Option<f64> {
        match self {
            Self::Float64(f) => Some(*f),
            Self::Int64(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get as string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as an array slice.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Try to get as a tuple.
    pub fn as_map(&self) -> Option<&Tuple> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a column when this value is a tuple.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(column))
    }

    /// Merge the columns of `other` into this tuple, `other` winning on conflicts.
    ///
    /// Returns `None` unless both values are tuples.
    pub fn merge(&self, other: &Value) -> Option<Value> {
        let (Self::Map(left), Self::Map(right)) = (self, other) else {
            return None;
        };
        let mut merged = left.clone();
        merged.extend(right.iter().map(|(k, v)| (k.clone(), v.clone())));
        Some(Self::Map(merged))
    }

    /// Tuples carried by this value.
    ///
    /// A map is one tuple, an array yields its map elements and every other
    /// value carries none.
    pub fn tuples(&self) -> Vec<&Tuple> {
        match self {
            Self::Map(map) => vec![map],
            Self::Array(values) => values.iter().filter_map(Value::as_map).collect(),
            _ => Vec::new(),
        }
    }

    /// Get the type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Bool(_) => "Bool",
            Self::Int64(_) => "Int64",
            Self::Float64(_) => "Float64",
            Self::String(_) => "String",
            Self::Array(_) => "Array",
            Self::Map(_) => "Map",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int64(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int64(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float64(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<Tuple> for Value {
    fn from(map: Tuple) -> Self {
        Self::Map(map)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Self::Array(values)
    }
}

impl From<Vec<Tuple>> for Value {
    fn from(tuples: Vec<Tuple>) -> Self {
        Self::Array(tuples.into_iter().map(Value::Map).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(42i64).as_int64(), Some(42));
        assert_eq!(Value::from(2.5f64).as_float64(), Some(2.5));
        assert_eq!(Value::from("hello").as_str(), Some("hello"));
        assert!(Value::Null.is_null());
        assert!(Value::default().is_null());
    }

    #[test]
    fn test_tuple_access() {
        let user = Value::tuple([("id", Value::from(1)), ("name", Value::from("Jane"))]);
        assert_eq!(user.get("id"), Some(&Value::Int64(1)));
        assert_eq!(user.get("missing"), None);
        assert_eq!(Value::from(1).get("id"), None);
    }

    #[test]
    fn test_merge_prefers_right() {
        let task = Value::tuple([("title", "Task One")]);
        let owner = Value::tuple([("user_id", Value::from(1)), ("title", Value::from("Other"))]);

        let merged = task.merge(&owner).unwrap();
        assert_eq!(merged.get("user_id"), Some(&Value::Int64(1)));
        assert_eq!(merged.get("title"), Some(&Value::from("Other")));

        assert!(task.merge(&Value::Null).is_none());
    }

    #[test]
    fn test_tuples_flattening() {
        let one = Value::tuple([("id", 1)]);
        assert_eq!(one.tuples().len(), 1);

        let many = Value::Array(vec![one.clone(), Value::from(7), one.clone()]);
        assert_eq!(many.tuples().len(), 2);

        assert!(Value::Null.tuples().is_empty());
    }

    #[test]
    fn test_value_type_names() {
        assert_eq!(Value::Null.type_name(), "Null");
        assert_eq!(Value::Bool(true).type_name(), "Bool");
        assert_eq!(Value::tuple([("a", 1)]).type_name(), "Map");
    }
}
