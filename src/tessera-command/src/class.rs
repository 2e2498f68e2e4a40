//! Command class descriptors.
//!
//! A [`CommandClass`] describes one kind of command: the operation, the
//! adapter whose template it uses, the relation it targets, a display name,
//! the result arity and the body that executes it. Classes are immutable;
//! customization and adapter extension both produce new descriptors.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use common_error::TesseraResult;
use tessera_core::{AdapterId, OperationType, RelationHandle, RelationName, ResultArity, Value, camelize};

use crate::body::{BodyRef, FnBody, Unimplemented};
use crate::command::Command;

/// Identity of a class: adapter, relation and operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandClassKey {
    /// Adapter whose template the class uses.
    pub adapter: Option<AdapterId>,
    /// Relation the class targets.
    pub relation: Option<RelationName>,
    /// Operation performed.
    pub operation: OperationType,
}

impl CommandClassKey {
    /// Key of a generated class.
    pub fn new(
        adapter: impl Into<AdapterId>,
        relation: impl Into<RelationName>,
        operation: OperationType,
    ) -> Self {
        Self {
            adapter: Some(adapter.into()),
            relation: Some(relation.into()),
            operation,
        }
    }

    /// Display name `<Namespace>::<Adapter>::Commands::<Operation>[<Relation>]`.
    ///
    /// Segments that are not set are left out.
    pub fn class_name(&self, namespace: Option<&str>) -> String {
        let mut name = String::new();
        if let Some(namespace) = namespace.filter(|ns| !ns.is_empty()) {
            name.push_str(namespace);
            name.push_str("::");
        }
        if let Some(adapter) = &self.adapter {
            name.push_str(&adapter.class_segment());
            name.push_str("::");
        }
        name.push_str("Commands::");
        name.push_str(self.operation.class_name());
        if let Some(relation) = &self.relation {
            name.push('[');
            name.push_str(&camelize(relation));
            name.push(']');
        }
        name
    }
}

/// Behavior overrides applied to a class under construction.
///
/// This is what a factory body customizer and [`CommandClass::decorate`]
/// receive: the class identity is fixed, only behavior can change.
#[derive(Debug, Clone, Default)]
pub struct BodyCustomizer {
    body: Option<BodyRef>,
    result: Option<ResultArity>,
    markers: BTreeSet<String>,
}

impl BodyCustomizer {
    /// Replace the execute body.
    pub fn body(mut self, body: BodyRef) -> Self {
        self.body = Some(body);
        self
    }

    /// Replace the execute body with a closure.
    pub fn execute<F>(self, f: F) -> Self
    where
        F: Fn(&Command, &[Value]) -> TesseraResult<Value> + Send + Sync + 'static,
    {
        self.body(Arc::new(FnBody::new("custom", f)))
    }

    /// Declare the result arity.
    pub fn result(mut self, result: ResultArity) -> Self {
        self.result = Some(result);
        self
    }

    /// Add a behavior marker.
    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.markers.insert(marker.into());
        self
    }

    /// The body currently set, if any.
    pub fn current_body(&self) -> Option<&BodyRef> {
        self.body.as_ref()
    }
}

/// Builder for hand-declared classes.
///
/// ```rust,ignore
/// let class = CommandClass::builder(OperationType::Create)
///     .relation("users")
///     .result(ResultArity::One)
///     .execute(|command, args| command.relation().insert(first_tuple(args)?))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ClassBuilder {
    key: CommandClassKey,
    name: Option<String>,
    namespace: Option<String>,
    default_result: ResultArity,
    custom: BodyCustomizer,
}

impl ClassBuilder {
    /// Start a class for `operation` with no adapter, relation or body.
    pub fn new(operation: OperationType) -> Self {
        Self {
            key: CommandClassKey {
                adapter: None,
                relation: None,
                operation,
            },
            name: None,
            namespace: None,
            default_result: ResultArity::default(),
            custom: BodyCustomizer::default(),
        }
    }

    /// Set the adapter identifier.
    pub fn adapter(mut self, adapter: impl Into<AdapterId>) -> Self {
        self.key.adapter = Some(adapter.into());
        self
    }

    /// Set the target relation.
    pub fn relation(mut self, relation: impl Into<RelationName>) -> Self {
        self.key.relation = Some(relation.into());
        self
    }

    /// Set an explicit display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Prefix for the generated display name.
    pub fn namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }

    /// Result arity used when none is declared.
    pub fn default_result(mut self, result: ResultArity) -> Self {
        self.default_result = result;
        self
    }

    /// Replace the execute body.
    pub fn body(mut self, body: BodyRef) -> Self {
        self.custom = self.custom.body(body);
        self
    }

    /// Replace the execute body with a closure.
    pub fn execute<F>(mut self, f: F) -> Self
    where
        F: Fn(&Command, &[Value]) -> TesseraResult<Value> + Send + Sync + 'static,
    {
        self.custom = self.custom.execute(f);
        self
    }

    /// Declare the result arity.
    pub fn result(mut self, result: ResultArity) -> Self {
        self.custom = self.custom.result(result);
        self
    }

    /// Add a behavior marker.
    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.custom = self.custom.marker(marker);
        self
    }

    /// Apply a body customizer.
    pub fn customize(mut self, f: impl FnOnce(BodyCustomizer) -> BodyCustomizer) -> Self {
        self.custom = f(self.custom);
        self
    }

    /// Finish the class.
    pub fn build(self) -> CommandClass {
        let name = self
            .name
            .unwrap_or_else(|| self.key.class_name(self.namespace.as_deref()));
        CommandClass {
            inner: Arc::new(ClassDescriptor {
                name,
                result: self.custom.result.unwrap_or(self.default_result),
                body: self.custom.body.unwrap_or_else(|| Arc::new(Unimplemented)),
                markers: self.custom.markers,
                key: self.key,
                extended: false,
            }),
        }
    }
}

#[derive(Debug)]
struct ClassDescriptor {
    key: CommandClassKey,
    name: String,
    result: ResultArity,
    body: BodyRef,
    markers: BTreeSet<String>,
    extended: bool,
}

/// An immutable command class. Cloning is cheap.
#[derive(Clone)]
pub struct CommandClass {
    inner: Arc<ClassDescriptor>,
}

impl CommandClass {
    /// Start declaring a class by hand.
    pub fn builder(operation: OperationType) -> ClassBuilder {
        ClassBuilder::new(operation)
    }

    /// Bind the class to a relation. No I/O happens here.
    pub fn build(&self, relation: RelationHandle) -> Command {
        Command::new(self.clone(), relation)
    }

    /// Class identity.
    pub fn key(&self) -> &CommandClassKey {
        &self.inner.key
    }

    /// Operation performed by instances of this class.
    pub fn operation(&self) -> OperationType {
        self.inner.key.operation
    }

    /// Operation under which instances are registered.
    pub fn register_as(&self) -> OperationType {
        self.inner.key.operation
    }

    /// Adapter identifier, if declared.
    pub fn adapter(&self) -> Option<&AdapterId> {
        self.inner.key.adapter.as_ref()
    }

    /// Target relation name, if declared.
    pub fn relation(&self) -> Option<&str> {
        self.inner.key.relation.as_deref()
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Declared result arity.
    pub fn result(&self) -> ResultArity {
        self.inner.result
    }

    /// Execute body.
    pub fn body(&self) -> &BodyRef {
        &self.inner.body
    }

    /// Behavior markers.
    pub fn markers(&self) -> impl Iterator<Item = &str> {
        self.inner.markers.iter().map(String::as_str)
    }

    /// Whether the class carries `marker`.
    pub fn has_marker(&self, marker: &str) -> bool {
        self.inner.markers.contains(marker)
    }

    /// Whether an adapter extension hook already ran for this class.
    pub fn is_extended(&self) -> bool {
        self.inner.extended
    }

    /// Produce a new class with the same identity and customized behavior.
    ///
    /// Extension hooks use this to decorate the class they are handed.
    pub fn decorate(&self, f: impl FnOnce(BodyCustomizer) -> BodyCustomizer) -> Self {
        let current = BodyCustomizer {
            body: Some(Arc::clone(&self.inner.body)),
            result: Some(self.inner.result),
            markers: self.inner.markers.clone(),
        };
        let custom = f(current);
        Self {
            inner: Arc::new(ClassDescriptor {
                key: self.inner.key.clone(),
                name: self.inner.name.clone(),
                result: custom.result.unwrap_or(self.inner.result),
                body: custom.body.unwrap_or_else(|| Arc::clone(&self.inner.body)),
                markers: custom.markers,
                extended: self.inner.extended,
            }),
        }
    }

    pub(crate) fn mark_extended(self) -> Self {
        if self.inner.extended {
            return self;
        }
        Self {
            inner: Arc::new(ClassDescriptor {
                key: self.inner.key.clone(),
                name: self.inner.name.clone(),
                result: self.inner.result,
                body: Arc::clone(&self.inner.body),
                markers: self.inner.markers.clone(),
                extended: true,
            }),
        }
    }
}

impl PartialEq for CommandClass {
    /// Structural equality; whether the extension hook ran is not compared.
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        let (a, b) = (&self.inner, &other.inner);
        a.key == b.key
            && a.name == b.name
            && a.result == b.result
            && a.markers == b.markers
            && Arc::ptr_eq(&a.body, &b.body)
    }
}

impl fmt::Debug for CommandClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandClass")
            .field("name", &self.inner.name)
            .field("operation", &self.inner.key.operation)
            .field("result", &self.inner.result)
            .field("body", &self.inner.body)
            .field("markers", &self.inner.markers)
            .field("extended", &self.inner.extended)
            .finish()
    }
}

impl fmt::Display for CommandClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_class_name() {
        let key = CommandClassKey::new("memory", "users", OperationType::Create);
        assert_eq!(key.class_name(None), "Memory::Commands::Create[Users]");
        assert_eq!(key.class_name(Some("ROM")), "ROM::Memory::Commands::Create[Users]");
        assert_eq!(key.class_name(Some("")), "Memory::Commands::Create[Users]");
    }

    #[test]
    fn test_name_without_adapter_or_relation() {
        let class = CommandClass::builder(OperationType::Delete).build();
        assert_eq!(class.name(), "Commands::Delete");

        let class = CommandClass::builder(OperationType::Update).relation("user_tasks").build();
        assert_eq!(class.name(), "Commands::Update[UserTasks]");
    }

    #[test]
    fn test_builder_defaults() {
        let class = CommandClass::builder(OperationType::Create)
            .adapter("memory")
            .relation("users")
            .build();

        assert_eq!(class.register_as(), OperationType::Create);
        assert_eq!(class.relation(), Some("users"));
        assert_eq!(class.adapter().map(AdapterId::as_str), Some("memory"));
        assert_eq!(class.result(), ResultArity::Many);
        assert_eq!(class.body().label(), "unimplemented");
        assert!(!class.is_extended());
    }

    #[test]
    fn test_explicit_name_and_result() {
        let class = CommandClass::builder(OperationType::Create)
            .name("Test::Create")
            .result(ResultArity::One)
            .marker("audited")
            .build();

        assert_eq!(class.name(), "Test::Create");
        assert_eq!(class.result(), ResultArity::One);
        assert!(class.has_marker("audited"));
        assert_eq!(class.markers().collect::<Vec<_>>(), vec!["audited"]);
    }

    #[test]
    fn test_decorate_keeps_identity() {
        let class = CommandClass::builder(OperationType::Create)
            .adapter("memory")
            .relation("users")
            .build();
        let decorated = class.decorate(|custom| custom.marker("super_command"));

        assert_eq!(decorated.key(), class.key());
        assert_eq!(decorated.name(), class.name());
        assert!(decorated.has_marker("super_command"));
        assert!(!class.has_marker("super_command"));
        assert_ne!(decorated, class);
    }

    #[test]
    fn test_extended_flag_ignored_by_equality() {
        let class = CommandClass::builder(OperationType::Update).relation("users").build();
        let extended = class.clone().mark_extended();

        assert!(extended.is_extended());
        assert!(!class.is_extended());
        assert_eq!(extended, class);
    }
}
