//! Command templates of the memory adapter.

use common_error::{TesseraError, TesseraResult, ensure, value_err};
use tessera_command::{Command, CommandBody};
use tessera_core::Value;

/// Inserts every tuple carried by the primary argument.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateTuples;

impl CommandBody for CreateTuples {
    fn execute(&self, command: &Command, args: &[Value]) -> TesseraResult<Value> {
        let input = primary(command, args)?;
        let tuples = input.tuples();
        ensure!(
            !tuples.is_empty(),
            ValueError: "{} expects tuples, got {}", command.name(), input.type_name()
        );

        let mut inserted = Vec::with_capacity(tuples.len());
        for tuple in tuples {
            inserted.push(command.relation().insert(tuple.clone())?);
        }
        Ok(Value::Array(inserted))
    }

    fn label(&self) -> &str {
        "memory.create"
    }
}

/// Applies the primary argument as changes to the relation's tuples.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateTuples;

impl CommandBody for UpdateTuples {
    fn execute(&self, command: &Command, args: &[Value]) -> TesseraResult<Value> {
        let input = primary(command, args)?;
        let Some(changes) = input.as_map() else {
            value_err!(
                "{} expects a tuple of changes, got {}",
                command.name(),
                input.type_name()
            );
        };
        command.relation().update(changes)
    }

    fn label(&self) -> &str {
        "memory.update"
    }
}

/// Deletes the tuples the relation covers. Arguments are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteTuples;

impl CommandBody for DeleteTuples {
    fn execute(&self, command: &Command, _args: &[Value]) -> TesseraResult<Value> {
        command.relation().delete()
    }

    fn label(&self) -> &str {
        "memory.delete"
    }
}

fn primary<'a>(command: &Command, args: &'a [Value]) -> TesseraResult<&'a Value> {
    args.first().ok_or_else(|| {
        TesseraError::value_error(format!("{} called without input", command.name()))
    })
}
