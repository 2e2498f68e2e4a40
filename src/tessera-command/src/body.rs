//! Command bodies: the `execute` behavior carried by a class.

use std::fmt;
use std::sync::Arc;

use common_error::{TesseraError, TesseraResult};
use tessera_core::Value;

use crate::command::Command;

/// Shared, immutable command body.
pub type BodyRef = Arc<dyn CommandBody>;

/// The `execute` contract of a command.
///
/// `args` holds the curried input (when bound) followed by call-site
/// arguments and any result threaded from a predecessor stage. The body
/// reaches the bound relation through `command.relation()`.
pub trait CommandBody: Send + Sync {
    /// Run the operation.
    fn execute(&self, command: &Command, args: &[Value]) -> TesseraResult<Value>;

    /// Short label used when displaying classes.
    fn label(&self) -> &str {
        "custom"
    }
}

impl fmt::Debug for dyn CommandBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommandBody({})", self.label())
    }
}

/// Body of a class with no template: every call fails with `NotImplemented`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unimplemented;

impl CommandBody for Unimplemented {
    fn execute(&self, command: &Command, _args: &[Value]) -> TesseraResult<Value> {
        Err(TesseraError::not_implemented(format!(
            "{}#execute",
            command.class().name()
        )))
    }

    fn label(&self) -> &str {
        "unimplemented"
    }
}

/// Body backed by a closure.
pub struct FnBody<F> {
    label: String,
    f: F,
}

impl<F> FnBody<F>
where
    F: Fn(&Command, &[Value]) -> TesseraResult<Value> + Send + Sync,
{
    /// Wrap a closure under a display label.
    pub fn new(label: impl Into<String>, f: F) -> Self {
        Self {
            label: label.into(),
            f,
        }
    }
}

impl<F> CommandBody for FnBody<F>
where
    F: Fn(&Command, &[Value]) -> TesseraResult<Value> + Send + Sync,
{
    fn execute(&self, command: &Command, args: &[Value]) -> TesseraResult<Value> {
        (self.f)(command, args)
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// Build a shared body from a closure.
pub fn body_fn<F>(f: F) -> BodyRef
where
    F: Fn(&Command, &[Value]) -> TesseraResult<Value> + Send + Sync + 'static,
{
    Arc::new(FnBody::new("custom", f))
}
