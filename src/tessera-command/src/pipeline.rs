//! Sequential composition of commands.
//!
//! `a >> b` builds a [`Pipeline`] whose call runs `a` with the call-site
//! arguments, then hands `a`'s result to `b` as a trailing argument after
//! `b`'s own curried input.
//! Pipelines nest (`(a >> b) >> c`), and each stage only ever sees the result
//! of the stage right before it, so grouping does not change the outcome.
//!
//! # Forwarding
//!
//! A pipeline forwards a fixed set of calls to its first command, descending
//! through nested left-hand pipelines: [`Pipeline::with`],
//! [`Pipeline::curry`], [`Pipeline::invoke_helper`],
//! [`Pipeline::relation`] and [`Pipeline::first_command`]. Calls that yield
//! a new command rebuild the pipeline around it.

use std::fmt;
use std::ops::Shr;
use std::sync::Arc;

use log::trace;

use common_error::{TesseraError, TesseraResult};
use tessera_core::{RelationHandle, Value};

use crate::command::{Command, Forwarded};

/// Closure signature of a non-command stage.
pub type StageFn = dyn Fn(&[Value]) -> TesseraResult<Value> + Send + Sync;

/// A stage without a typed command contract.
#[derive(Clone)]
pub struct Callable {
    name: String,
    f: Arc<StageFn>,
}

impl Callable {
    /// Wrap a closure as a named stage.
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> TesseraResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    /// Stage name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the closure.
    pub fn call(&self, args: &[Value]) -> TesseraResult<Value> {
        (self.f)(args)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callable").field(&self.name).finish()
    }
}

/// One step of a pipeline.
#[derive(Debug, Clone)]
pub enum Stage {
    /// A command.
    Command(Command),
    /// A nested pipeline.
    Pipeline(Box<Pipeline>),
    /// An arbitrary closure.
    Callable(Callable),
}

impl Stage {
    /// A stage that returns the threaded result unchanged.
    pub fn noop() -> Self {
        Self::Callable(Callable::new("noop", |args| {
            Ok(args.last().cloned().unwrap_or_default())
        }))
    }

    /// A closure stage.
    pub fn from_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> TesseraResult<Value> + Send + Sync + 'static,
    {
        Self::Callable(Callable::new(name, f))
    }

    /// Run the stage.
    pub fn call(&self, args: &[Value]) -> TesseraResult<Value> {
        match self {
            Self::Command(command) => command.call(args),
            Self::Pipeline(pipeline) => pipeline.call(args),
            Self::Callable(callable) => {
                trace!("Calling stage {}", callable.name());
                callable.call(args)
            }
        }
    }

    /// Run the stage with a predecessor's result.
    ///
    /// Commands keep their curried input and receive `threaded` after it;
    /// pipelines thread it into their first stage.
    pub fn call_threaded(&self, threaded: &[Value]) -> TesseraResult<Value> {
        match self {
            Self::Command(command) => command.call_threaded(threaded),
            Self::Pipeline(pipeline) => pipeline.call_threaded(threaded),
            Self::Callable(callable) => {
                trace!("Calling stage {}", callable.name());
                callable.call(threaded)
            }
        }
    }

    /// The first command reachable from this stage.
    pub fn first_command(&self) -> Option<&Command> {
        match self {
            Self::Command(command) => Some(command),
            Self::Pipeline(pipeline) => pipeline.first_command(),
            Self::Callable(_) => None,
        }
    }

    fn display_name(&self) -> String {
        match self {
            Self::Command(command) => command.name().to_string(),
            Self::Pipeline(pipeline) => format!("({pipeline})"),
            Self::Callable(callable) => callable.name().to_string(),
        }
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Stage>) {
        match self {
            Self::Pipeline(pipeline) => {
                pipeline.left.collect_leaves(out);
                pipeline.right.collect_leaves(out);
            }
            leaf => out.push(leaf),
        }
    }

    fn map_first_command(
        &self,
        f: impl FnOnce(&Command) -> TesseraResult<Command>,
    ) -> TesseraResult<Self> {
        match self {
            Self::Command(command) => Ok(Self::Command(f(command)?)),
            Self::Pipeline(pipeline) => Ok(Self::Pipeline(Box::new(pipeline.map_first(f)?))),
            Self::Callable(callable) => Err(TesseraError::value_error(format!(
                "cannot forward to stage `{}`: it is not a command",
                callable.name()
            ))),
        }
    }
}

impl From<Command> for Stage {
    fn from(command: Command) -> Self {
        Self::Command(command)
    }
}

impl From<Pipeline> for Stage {
    fn from(pipeline: Pipeline) -> Self {
        Self::Pipeline(Box::new(pipeline))
    }
}

impl From<Callable> for Stage {
    fn from(callable: Callable) -> Self {
        Self::Callable(callable)
    }
}

/// Two stages run in sequence, the left result threaded into the right.
#[derive(Debug, Clone)]
pub struct Pipeline {
    left: Box<Stage>,
    right: Box<Stage>,
}

impl Pipeline {
    /// Compose `left` then `right`.
    pub fn new(left: impl Into<Stage>, right: impl Into<Stage>) -> Self {
        Self {
            left: Box::new(left.into()),
            right: Box::new(right.into()),
        }
    }

    /// Left-hand stage.
    pub fn left(&self) -> &Stage {
        &self.left
    }

    /// Right-hand stage.
    pub fn right(&self) -> &Stage {
        &self.right
    }

    /// Leaf stages in execution order.
    pub fn stages(&self) -> Vec<&Stage> {
        let mut out = Vec::new();
        self.left.collect_leaves(&mut out);
        self.right.collect_leaves(&mut out);
        out
    }

    /// Number of leaf stages.
    pub fn len(&self) -> usize {
        self.stages().len()
    }

    /// Always false: a pipeline has at least two stages.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Run the left stage with `args`, then the right stage with its result.
    ///
    /// The first failing stage aborts the pipeline; later stages do not run.
    pub fn call(&self, args: &[Value]) -> TesseraResult<Value> {
        let threaded = self.left.call(args)?;
        self.thread_right(threaded)
    }

    /// Run the pipeline as a later stage of an enclosing pipeline.
    pub fn call_threaded(&self, threaded: &[Value]) -> TesseraResult<Value> {
        let threaded = self.left.call_threaded(threaded)?;
        self.thread_right(threaded)
    }

    fn thread_right(&self, threaded: Value) -> TesseraResult<Value> {
        trace!("Threading result into {}", self.right.display_name());
        self.right.call_threaded(&[threaded])
    }

    /// The first command of the pipeline.
    pub fn first_command(&self) -> Option<&Command> {
        self.left.first_command()
    }

    /// Relation of the first command.
    pub fn relation(&self) -> Option<&RelationHandle> {
        self.first_command().map(Command::relation)
    }

    /// Rebind the first command's input; the rest of the pipeline is kept.
    pub fn with(&self, input: impl Into<Value>) -> TesseraResult<Self> {
        let input = input.into();
        self.map_first(|command| Ok(command.with(input)))
    }

    /// Curry the first command; the rest of the pipeline is kept.
    pub fn curry(&self, input: impl Into<Value>) -> TesseraResult<Self> {
        let input = input.into();
        self.map_first(|command| Ok(command.curry(input)))
    }

    /// Forward a relation helper to the first command.
    ///
    /// When the helper yields a relation, the result is this pipeline with its
    /// first command rebound to that relation.
    pub fn invoke_helper(&self, name: &str, args: &[Value]) -> TesseraResult<Forwarded<Self>> {
        let first = self.first_command().ok_or_else(|| {
            TesseraError::value_error("pipeline has no command to forward to")
        })?;
        match first.invoke_helper(name, args)? {
            Forwarded::Rebound(command) => {
                Ok(Forwarded::Rebound(self.map_first(|_| Ok(command))?))
            }
            Forwarded::Value(value) => Ok(Forwarded::Value(value)),
        }
    }

    fn map_first(&self, f: impl FnOnce(&Command) -> TesseraResult<Command>) -> TesseraResult<Self> {
        Ok(Self {
            left: Box::new(self.left.map_first_command(f)?),
            right: self.right.clone(),
        })
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} >> {}", self.left.display_name(), self.right.display_name())
    }
}

/// Compose two stages; same as `left >> right`.
pub fn compose(left: impl Into<Stage>, right: impl Into<Stage>) -> Pipeline {
    Pipeline::new(left, right)
}

impl<S: Into<Stage>> Shr<S> for Command {
    type Output = Pipeline;

    fn shr(self, rhs: S) -> Pipeline {
        Pipeline::new(self, rhs)
    }
}

impl<S: Into<Stage>> Shr<S> for Pipeline {
    type Output = Pipeline;

    fn shr(self, rhs: S) -> Pipeline {
        Pipeline::new(self, rhs)
    }
}

impl<S: Into<Stage>> Shr<S> for Stage {
    type Output = Pipeline;

    fn shr(self, rhs: S) -> Pipeline {
        Pipeline::new(self, rhs)
    }
}
