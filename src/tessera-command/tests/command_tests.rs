//! Factory, registry and pipeline behavior against scripted relations.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common_config::{CommandConfig, RegistryConfig};
use common_error::{TesseraError, TesseraResult};
use proptest::prelude::*;
use tessera_command::{
    Adapter, BodyRef, ClassOptions, CommandClass, CommandFactory, RegistryBuilder, Repositories,
    Stage, body_fn, registry,
};
use tessera_core::testing::{RecordedCall, RecordingRelation};
use tessera_core::{AdapterId, OperationType, RelationHandle, Relations, ResultArity, Tuple, Value};

/// Adapter with a Create template only, counting extension hook calls.
#[derive(Debug)]
struct CountingAdapter {
    id: AdapterId,
    extended: AtomicUsize,
}

impl CountingAdapter {
    fn new(id: &str) -> Self {
        Self {
            id: AdapterId::new(id),
            extended: AtomicUsize::new(0),
        }
    }

    fn extended(&self) -> usize {
        self.extended.load(Ordering::SeqCst)
    }
}

impl Adapter for CountingAdapter {
    fn id(&self) -> &AdapterId {
        &self.id
    }

    fn command_template(&self, operation: OperationType) -> Option<BodyRef> {
        match operation {
            OperationType::Create => Some(body_fn(|command, args| {
                let tuple = args
                    .first()
                    .and_then(Value::as_map)
                    .cloned()
                    .ok_or_else(|| TesseraError::value_error("expected a tuple"))?;
                command.relation().insert(tuple)
            })),
            _ => None,
        }
    }

    fn extend_command_class(
        &self,
        class: CommandClass,
        _options: &ClassOptions,
    ) -> TesseraResult<CommandClass> {
        self.extended.fetch_add(1, Ordering::SeqCst);
        Ok(class.decorate(|custom| custom.marker("super_command")))
    }
}

fn tuple(pairs: &[(&str, &str)]) -> Tuple {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), Value::from(*v)))
        .collect()
}

fn setup() -> (Arc<CountingAdapter>, CommandFactory) {
    let adapter = Arc::new(CountingAdapter::new("test"));
    let factory = CommandFactory::new(Repositories::new().with(adapter.clone()));
    (adapter, factory)
}

#[test]
fn test_unregistered_adapter_is_configuration_error() {
    let (_, factory) = setup();
    let result = factory.build_class(OperationType::Create, "users", &ClassOptions::new("sql"));
    assert!(matches!(result, Err(TesseraError::Configuration(_))));
    assert!(factory.is_empty());
}

#[test]
fn test_missing_template_is_configuration_error() {
    let (_, factory) = setup();
    let result = factory.build_class(OperationType::Delete, "users", &ClassOptions::new("test"));
    assert!(matches!(result, Err(TesseraError::Configuration(_))));
}

#[test]
fn test_build_class_is_cached() {
    let (adapter, factory) = setup();
    let options = ClassOptions::new("test");

    let first = factory
        .build_class_with(OperationType::Create, "users", &options, |custom| {
            custom.marker("audited")
        })
        .unwrap();
    let second = factory
        .build_class_with(OperationType::Create, "users", &options, |custom| {
            custom.marker("ignored")
        })
        .unwrap();

    assert_eq!(first, second);
    assert!(second.has_marker("audited"));
    assert!(!second.has_marker("ignored"));
    assert_eq!(factory.len(), 1);
    assert_eq!(adapter.extended(), 1);
    assert_eq!(factory.cached(first.key()), Some(first.clone()));

    factory.clear();
    assert!(factory.is_empty());
}

#[test]
fn test_class_name_and_namespace() {
    let adapter = Arc::new(CountingAdapter::new("test"));
    let factory = CommandFactory::with_config(
        Repositories::new().with(adapter),
        CommandConfig::default()
            .with_namespace("ROM")
            .with_default_result(ResultArity::One),
    );

    let class = factory
        .build_class(OperationType::Create, "user_tasks", &ClassOptions::new("test"))
        .unwrap();
    assert_eq!(class.name(), "ROM::Test::Commands::Create[UserTasks]");
    assert_eq!(class.result(), ResultArity::One);

    let many = factory
        .build_class(
            OperationType::Create,
            "users",
            &ClassOptions::new("test").with_result(ResultArity::Many),
        )
        .unwrap();
    assert_eq!(many.result(), ResultArity::Many);
}

#[test]
fn test_extension_hook_runs_once_per_class() {
    let (adapter, factory) = setup();
    let users: RelationHandle = Arc::new(RecordingRelation::new("users", "test"));
    let relations = Relations::new().with(users.clone());

    let generated = factory
        .build_class(OperationType::Create, "users", &ClassOptions::new("test"))
        .unwrap();
    let declared = factory
        .declare(OperationType::Create, "test", |class| {
            class.relation("users").name("Test::DeclaredCreate")
        })
        .unwrap();
    assert!(generated.is_extended());
    assert!(declared.is_extended());
    assert!(declared.build(users.clone()).has_marker("super_command"));
    assert_eq!(adapter.extended(), 2);

    for _ in 0..2 {
        let built = registry(&relations, factory.repositories(), [&declared]).unwrap();
        assert_eq!(
            built.get("users", OperationType::Create),
            Some(&declared.build(users.clone()))
        );
        let built = registry(&relations, factory.repositories(), [&generated]).unwrap();
        assert_eq!(
            built.get("users", OperationType::Create),
            Some(&generated.build(users.clone()))
        );
    }
    assert_eq!(adapter.extended(), 2);
}

#[test]
fn test_declare_errors() {
    let (adapter, factory) = setup();

    let unknown = factory.declare(OperationType::Create, "sql", |class| class.relation("users"));
    assert!(matches!(unknown, Err(TesseraError::Configuration(_))));

    let missing = factory.declare(OperationType::Delete, "test", |class| class.relation("users"));
    assert!(matches!(missing, Err(TesseraError::Configuration(_))));
    assert_eq!(adapter.extended(), 0);
}

#[test]
fn test_explicit_input_overrides_curried() {
    let (_, factory) = setup();
    let jane = tuple(&[("name", "Jane")]);
    let joe = tuple(&[("name", "Joe")]);
    let users = Arc::new(
        RecordingRelation::new("users", "test")
            .expect_insert(jane.clone(), Value::Map(jane.clone()))
            .expect_insert(joe.clone(), Value::Map(joe.clone())),
    );
    let create = factory
        .build_class(
            OperationType::Create,
            "users",
            &ClassOptions::new("test").with_result(ResultArity::One),
        )
        .unwrap()
        .build(users.clone())
        .curry(Value::Map(jane.clone()));

    assert_eq!(create.call(&[Value::Map(joe.clone())]).unwrap(), Value::Map(joe.clone()));
    assert_eq!(create.call(&[]).unwrap(), Value::Map(jane.clone()));
    assert_eq!(
        users.calls(),
        vec![RecordedCall::Insert(joe), RecordedCall::Insert(jane)]
    );
}

#[test]
fn test_registry_rejects_unresolvable_classes() {
    let (_, factory) = setup();
    let relations = Relations::new()
        .with(Arc::new(RecordingRelation::new("users", "test")))
        .with(Arc::new(RecordingRelation::new("logs", "sql")));

    let anonymous = CommandClass::builder(OperationType::Create).build();
    let missing = CommandClass::builder(OperationType::Create).relation("tasks").build();
    let orphan = CommandClass::builder(OperationType::Create).relation("logs").build();

    let repositories = factory.repositories();
    assert!(matches!(
        registry(&relations, repositories, [&anonymous]),
        Err(TesseraError::Configuration(_))
    ));
    assert!(matches!(
        registry(&relations, repositories, [&missing]),
        Err(TesseraError::UnknownRelation(name)) if name == "tasks"
    ));
    assert!(matches!(
        registry(&relations, repositories, [&orphan]),
        Err(TesseraError::UnknownAdapter(id)) if id == "sql"
    ));
}

#[test]
fn test_registry_duplicates() {
    let (_, factory) = setup();
    let relations = Relations::new().with(Arc::new(RecordingRelation::new("users", "test")));
    let first = CommandClass::builder(OperationType::Create)
        .relation("users")
        .name("First")
        .build();
    let second = CommandClass::builder(OperationType::Create)
        .relation("users")
        .name("Second")
        .build();

    let built = registry(&relations, factory.repositories(), [&first, &second]).unwrap();
    assert_eq!(built.len(), 1);
    assert_eq!(built.get("users", OperationType::Create).unwrap().name(), "Second");
    assert_eq!(built.relations(), vec!["users"]);
    assert_eq!(
        built.relation("users").unwrap().operations(),
        vec![OperationType::Create]
    );

    let strict = RegistryBuilder::new(&relations, factory.repositories())
        .with_config(RegistryConfig::strict())
        .build([&first, &second]);
    assert!(matches!(strict, Err(TesseraError::Configuration(_))));
}

#[test]
fn test_pipeline_threads_results() {
    let (_, factory) = setup();
    let user = tuple(&[("name", "Jane")]);
    let task = tuple(&[("title", "Task One")]);

    let users = Arc::new(
        RecordingRelation::new("users", "test").expect_insert(user.clone(), Value::Map(task.clone())),
    );
    let tasks = Arc::new(
        RecordingRelation::new("tasks", "test")
            .expect_insert(task.clone(), Value::Map(task.clone())),
    );

    let class = |relation: &str| {
        factory
            .build_class(
                OperationType::Create,
                relation,
                &ClassOptions::new("test").with_result(ResultArity::One),
            )
            .unwrap()
    };
    let create_user = class("users").build(users.clone());
    let create_task = class("tasks").build(tasks.clone());

    let pipeline = create_user.curry(Value::Map(user.clone())) >> create_task;
    assert_eq!(pipeline.call(&[]).unwrap(), Value::Map(task.clone()));
    assert_eq!(users.calls(), vec![RecordedCall::Insert(user)]);
    assert_eq!(tasks.calls(), vec![RecordedCall::Insert(task)]);
}

#[test]
fn test_pipeline_stops_at_first_failure() {
    let (_, factory) = setup();
    let failing: RelationHandle = Arc::new(RecordingRelation::new("users", "test").failing("boom"));
    let tasks = Arc::new(RecordingRelation::new("tasks", "test"));

    let options = ClassOptions::new("test");
    let create_user = factory
        .build_class(OperationType::Create, "users", &options)
        .unwrap()
        .build(failing);
    let create_task = factory
        .build_class(OperationType::Create, "tasks", &options)
        .unwrap()
        .build(tasks.clone());

    let pipeline = create_user >> create_task >> Stage::noop();
    let result = pipeline.call(&[Value::tuple([("name", "Jane")])]);
    assert!(matches!(result, Err(TesseraError::ExecutionError(message)) if message == "boom"));
    assert!(tasks.calls().is_empty());
}

proptest! {
    #[test]
    fn prop_class_identity(relation in "[a-z]{1,8}(_[a-z]{1,8}){0,2}", op_idx in 0usize..3) {
        let operation = OperationType::ALL[op_idx];
        let class = CommandClass::builder(operation)
            .adapter("test")
            .relation(relation.clone())
            .build();

        prop_assert_eq!(class.register_as(), operation);
        prop_assert_eq!(class.relation(), Some(relation.as_str()));
        prop_assert!(class.name().starts_with("Test::Commands::"));
        let expected_suffix = format!("[{}]", tessera_core::camelize(&relation));
        prop_assert!(class.name().ends_with(&expected_suffix));
        prop_assert!(!class.name().contains('_'));
    }
}
