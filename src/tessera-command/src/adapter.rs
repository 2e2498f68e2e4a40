//! Adapter contract: command templates plus the class extension hook.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use log::debug;

use common_error::TesseraResult;
use tessera_core::{AdapterId, OperationType, ResultArity, Value};

use crate::body::BodyRef;
use crate::class::CommandClass;

/// Options passed to the factory and on to the extension hook.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassOptions {
    /// Adapter whose template the class is built from.
    pub adapter: AdapterId,
    /// Result arity override.
    pub result: Option<ResultArity>,
    /// Adapter-specific settings, opaque to the engine.
    pub extra: HashMap<String, Value>,
}

impl ClassOptions {
    /// Options for `adapter`.
    pub fn new(adapter: impl Into<AdapterId>) -> Self {
        Self {
            adapter: adapter.into(),
            result: None,
            extra: HashMap::new(),
        }
    }

    /// Override the result arity.
    pub fn with_result(mut self, result: ResultArity) -> Self {
        self.result = Some(result);
        self
    }

    /// Add an adapter-specific setting.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// A backend adapter as seen by the command engine.
///
/// # Contract
///
/// - `command_template` returns the base body for an operation, or `None`
///   when the adapter cannot perform it.
/// - `extend_command_class` receives every class targeting this adapter
///   exactly once and returns a class with the same identity, possibly
///   decorated through [`CommandClass::decorate`].
pub trait Adapter: Send + Sync + Debug {
    /// Adapter identifier.
    fn id(&self) -> &AdapterId;

    /// Base body for `operation`.
    fn command_template(&self, operation: OperationType) -> Option<BodyRef>;

    /// Extension hook. The default leaves the class untouched.
    fn extend_command_class(
        &self,
        class: CommandClass,
        _options: &ClassOptions,
    ) -> TesseraResult<CommandClass> {
        Ok(class)
    }
}

/// Shared handle to an adapter.
pub type AdapterHandle = Arc<dyn Adapter>;

/// Run the extension hook of `adapter` unless it already ran for `class`.
pub(crate) fn extend_class(
    adapter: &dyn Adapter,
    class: CommandClass,
    options: &ClassOptions,
) -> TesseraResult<CommandClass> {
    if class.is_extended() {
        return Ok(class);
    }
    debug!("Extending {} with adapter `{}`", class.name(), adapter.id());
    let extended = adapter.extend_command_class(class, options)?;
    Ok(extended.mark_extended())
}

/// Adapters by identifier.
#[derive(Debug, Default, Clone)]
pub struct Repositories {
    adapters: HashMap<AdapterId, AdapterHandle>,
}

impl Repositories {
    /// Create a new empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter under its own identifier, replacing any previous one.
    pub fn register(&mut self, adapter: AdapterHandle) -> Option<AdapterHandle> {
        self.adapters.insert(adapter.id().clone(), adapter)
    }

    /// Builder-style [`Repositories::register`].
    pub fn with(mut self, adapter: AdapterHandle) -> Self {
        self.register(adapter);
        self
    }

    /// Get an adapter by identifier.
    pub fn get(&self, id: &str) -> Option<&AdapterHandle> {
        self.adapters.get(id)
    }

    /// Check if an adapter is registered.
    pub fn exists(&self, id: &str) -> bool {
        self.adapters.contains_key(id)
    }

    /// List adapter identifiers, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.adapters.keys().map(AdapterId::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of adapters.
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl FromIterator<AdapterHandle> for Repositories {
    fn from_iter<T: IntoIterator<Item = AdapterHandle>>(iter: T) -> Self {
        let mut repositories = Self::new();
        for adapter in iter {
            repositories.register(adapter);
        }
        repositories
    }
}
