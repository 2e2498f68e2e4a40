//! Memory adapter driven through the command factory.

use std::sync::Arc;

use common_error::TesseraError;
use tessera_command::{Adapter, ClassOptions, CommandFactory, Repositories};
use tessera_core::{OperationType, Relation, ResultArity, Value};
use tessera_storage::{MemoryAdapter, MemoryRelation};

fn factory() -> CommandFactory {
    CommandFactory::new(Repositories::new().with(Arc::new(MemoryAdapter::new())))
}

fn jane() -> Value {
    Value::tuple([("id", Value::from(1)), ("name", Value::from("Jane"))])
}

fn joe() -> Value {
    Value::tuple([("id", Value::from(2)), ("name", Value::from("Joe"))])
}

#[test]
fn test_templates_for_every_operation() {
    let adapter = MemoryAdapter::new();
    assert_eq!(adapter.id().as_str(), "memory");
    for operation in OperationType::ALL {
        assert!(adapter.command_template(operation).is_some());
    }
    assert_eq!(
        adapter.command_template(OperationType::Create).unwrap().label(),
        "memory.create"
    );
}

#[test]
fn test_create_inserts_each_tuple() {
    let users = MemoryRelation::new("users");
    let create = factory()
        .build_class(OperationType::Create, "users", &ClassOptions::new("memory"))
        .unwrap()
        .build(users.clone().into_handle());

    let created = create.call(&[Value::Array(vec![jane(), joe()])]).unwrap();
    assert_eq!(created, Value::Array(vec![jane(), joe()]));
    assert_eq!(users.len().unwrap(), 2);
}

#[test]
fn test_create_one_returns_single_tuple() {
    let users = MemoryRelation::new("users");
    let create = factory()
        .build_class(
            OperationType::Create,
            "users",
            &ClassOptions::new("memory").with_result(ResultArity::One),
        )
        .unwrap()
        .build(users.into_handle());

    assert_eq!(create.curry(jane()).call(&[]).unwrap(), jane());
}

#[test]
fn test_create_rejects_missing_or_invalid_input() {
    let create = factory()
        .build_class(OperationType::Create, "users", &ClassOptions::new("memory"))
        .unwrap()
        .build(MemoryRelation::new("users").into_handle());

    assert!(matches!(create.call(&[]), Err(TesseraError::ValueError(_))));
    assert!(matches!(
        create.call(&[Value::from("Jane")]),
        Err(TesseraError::ValueError(_))
    ));
}

#[test]
fn test_update_through_restriction_helper() {
    let users = MemoryRelation::new("users")
        .with_tuples([jane(), joe()].iter().filter_map(|v| v.as_map().cloned()))
        .unwrap()
        .with_restriction_helper("by_id", "id");
    let update = factory()
        .build_class(OperationType::Update, "users", &ClassOptions::new("memory"))
        .unwrap()
        .build(users.clone().into_handle());

    let update = update
        .invoke_helper("by_id", &[Value::from(2)])
        .unwrap()
        .rebound()
        .unwrap();
    let updated = update
        .call(&[Value::tuple([("name", "Joseph")])])
        .unwrap();

    assert_eq!(
        updated,
        Value::Array(vec![Value::tuple([
            ("id", Value::from(2)),
            ("name", Value::from("Joseph"))
        ])])
    );
    assert!(matches!(
        update.call(&[Value::from(3)]),
        Err(TesseraError::ValueError(_))
    ));
}

#[test]
fn test_delete_ignores_arguments() {
    let users = MemoryRelation::new("users")
        .with_tuples(jane().as_map().cloned())
        .unwrap();
    let delete = factory()
        .build_class(OperationType::Delete, "users", &ClassOptions::new("memory"))
        .unwrap()
        .build(users.clone().into_handle());

    assert_eq!(delete.call(&[Value::from("ignored")]).unwrap(), Value::Array(vec![jane()]));
    assert!(users.is_empty().unwrap());
    assert_eq!(delete.call(&[]).unwrap(), Value::Array(Vec::new()));
}

#[test]
fn test_custom_adapter_id() {
    let adapter = MemoryAdapter::with_id("sandbox");
    let relation = MemoryRelation::new("users").with_adapter("sandbox");
    assert_eq!(adapter.id().as_str(), "sandbox");
    assert_eq!(relation.adapter(), adapter.id());
}
