//! Command instances: a class bound to a relation.

use std::fmt;

use log::trace;

use common_error::TesseraResult;
use tessera_core::{
    AdapterId, HelperOutput, OperationType, RelationHandle, ResultArity, Value, relation_eq,
};

use crate::class::CommandClass;

/// Outcome of forwarding a helper call to a relation.
#[derive(Debug, Clone, PartialEq)]
pub enum Forwarded<T> {
    /// The helper produced a relation; `T` is rebound to it.
    Rebound(T),
    /// The helper produced a plain value.
    Value(Value),
}

impl<T> Forwarded<T> {
    /// The rebound object, if the helper produced a relation.
    pub fn rebound(self) -> Option<T> {
        match self {
            Self::Rebound(inner) => Some(inner),
            Self::Value(_) => None,
        }
    }

    /// The plain value, if the helper produced one.
    pub fn value(self) -> Option<Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Rebound(_) => None,
        }
    }

    /// Transform the rebound object.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Forwarded<U> {
        match self {
            Self::Rebound(inner) => Forwarded::Rebound(f(inner)),
            Self::Value(value) => Forwarded::Value(value),
        }
    }
}

/// An executable command bound to one relation.
///
/// Commands are immutable: [`Command::curry`] and [`Command::with`] return a
/// new command and leave the receiver untouched.
#[derive(Clone)]
pub struct Command {
    class: CommandClass,
    relation: RelationHandle,
    curried: Vec<Value>,
}

impl Command {
    pub(crate) fn new(class: CommandClass, relation: RelationHandle) -> Self {
        Self {
            class,
            relation,
            curried: Vec::new(),
        }
    }

    /// The class this command was built from.
    pub fn class(&self) -> &CommandClass {
        &self.class
    }

    /// The bound relation.
    pub fn relation(&self) -> &RelationHandle {
        &self.relation
    }

    /// Operation performed.
    pub fn operation(&self) -> OperationType {
        self.class.operation()
    }

    /// Adapter of the class, if declared.
    pub fn adapter(&self) -> Option<&AdapterId> {
        self.class.adapter()
    }

    /// Display name of the class.
    pub fn name(&self) -> &str {
        self.class.name()
    }

    /// Declared result arity.
    pub fn result(&self) -> ResultArity {
        self.class.result()
    }

    /// Whether the class carries `marker`.
    pub fn has_marker(&self, marker: &str) -> bool {
        self.class.has_marker(marker)
    }

    /// Whether this command performs `operation` through `adapter`.
    ///
    /// `None` matches commands of any adapter.
    pub fn is_kind_of(&self, operation: OperationType, adapter: Option<&str>) -> bool {
        self.operation() == operation
            && adapter.is_none_or(|id| self.adapter().is_some_and(|own| own.as_str() == id))
    }

    /// Input bound by [`Command::curry`], if any.
    pub fn curried_args(&self) -> &[Value] {
        &self.curried
    }

    /// A new command with `input` bound as its leading argument.
    ///
    /// Any previously curried input is replaced.
    pub fn curry(&self, input: impl Into<Value>) -> Self {
        Self {
            class: self.class.clone(),
            relation: self.relation.clone(),
            curried: vec![input.into()],
        }
    }

    /// Bind or override the input; same as [`Command::curry`].
    pub fn with(&self, input: impl Into<Value>) -> Self {
        self.curry(input)
    }

    /// A new command of the same class bound to `relation`, keeping curried input.
    pub fn rebind(&self, relation: RelationHandle) -> Self {
        Self {
            class: self.class.clone(),
            relation,
            curried: self.curried.clone(),
        }
    }

    /// Run the body and shape the result by the declared arity.
    ///
    /// Explicit `args` override the curried input; with no `args` the
    /// curried input is used.
    pub fn call(&self, args: &[Value]) -> TesseraResult<Value> {
        trace!("Calling {} with {} argument(s)", self.name(), args.len());
        let input = if args.is_empty() { &self.curried[..] } else { args };
        Ok(shape(self.result(), self.execute(input)?))
    }

    /// Run the body with the curried input followed by `threaded`.
    ///
    /// This is how a pipeline hands a predecessor's result to the next
    /// stage: the stage keeps its own input and receives the result as a
    /// trailing argument.
    pub fn call_threaded(&self, threaded: &[Value]) -> TesseraResult<Value> {
        trace!("Threading {} value(s) into {}", threaded.len(), self.name());
        let mut full = Vec::with_capacity(self.curried.len() + threaded.len());
        full.extend_from_slice(&self.curried);
        full.extend_from_slice(threaded);
        Ok(shape(self.result(), self.execute(&full)?))
    }

    /// Run the body with exactly `args`, without curried input or result shaping.
    pub fn execute(&self, args: &[Value]) -> TesseraResult<Value> {
        self.class.body().execute(self, args)
    }

    /// Call a helper defined by the bound relation.
    ///
    /// A helper producing a relation yields a command of the same class bound
    /// to it; any other output is returned as a value.
    pub fn invoke_helper(&self, name: &str, args: &[Value]) -> TesseraResult<Forwarded<Self>> {
        Ok(match self.relation.helper(name, args)? {
            HelperOutput::Relation(relation) => Forwarded::Rebound(self.rebind(relation)),
            HelperOutput::Value(value) => Forwarded::Value(value),
        })
    }
}

/// Shape a raw body result by arity.
///
/// `One` takes the first element of an array (null when empty); `Many` wraps
/// a lone tuple and turns null into an empty array.
fn shape(result: ResultArity, value: Value) -> Value {
    match (result, value) {
        (ResultArity::One, Value::Array(values)) => values.into_iter().next().unwrap_or_default(),
        (ResultArity::Many, Value::Map(tuple)) => Value::Array(vec![Value::Map(tuple)]),
        (ResultArity::Many, Value::Null) => Value::Array(Vec::new()),
        (_, value) => value,
    }
}

impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class
            && relation_eq(&self.relation, &other.relation)
            && self.curried == other.curried
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("class", &self.class.name())
            .field("relation", &self.relation.name())
            .field("curried", &self.curried)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_one() {
        let tuple = Value::tuple([("id", 1)]);
        assert_eq!(
            shape(ResultArity::One, Value::Array(vec![tuple.clone(), Value::Null])),
            tuple
        );
        assert_eq!(shape(ResultArity::One, Value::Array(Vec::new())), Value::Null);
        assert_eq!(shape(ResultArity::One, tuple.clone()), tuple);
    }

    #[test]
    fn test_shape_many() {
        let tuple = Value::tuple([("id", 1)]);
        assert_eq!(
            shape(ResultArity::Many, tuple.clone()),
            Value::Array(vec![tuple.clone()])
        );
        assert_eq!(shape(ResultArity::Many, Value::Null), Value::Array(Vec::new()));
        assert_eq!(
            shape(ResultArity::Many, Value::Array(vec![tuple.clone()])),
            Value::Array(vec![tuple])
        );
    }

    #[test]
    fn test_forwarded_accessors() {
        let rebound: Forwarded<u8> = Forwarded::Rebound(1);
        assert_eq!(rebound.clone().map(|n| n + 1), Forwarded::Rebound(2));
        assert_eq!(rebound.rebound(), Some(1));

        let value: Forwarded<u8> = Forwarded::Value(Value::from(3));
        assert_eq!(value.clone().rebound(), None);
        assert_eq!(value.value(), Some(Value::Int64(3)));
    }
}
