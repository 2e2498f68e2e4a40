//! Registry of built commands, keyed by relation name and operation.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use log::{debug, warn};

use common_config::RegistryConfig;
use common_error::{TesseraError, TesseraResult, config_err, ensure};
use tessera_core::{OperationType, Relations};

use crate::adapter::{ClassOptions, Repositories, extend_class};
use crate::class::CommandClass;
use crate::command::Command;

/// Commands registered for one relation, by operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationCommands {
    commands: HashMap<OperationType, Command>,
}

impl RelationCommands {
    /// Command registered for `operation`.
    pub fn get(&self, operation: OperationType) -> Option<&Command> {
        self.commands.get(&operation)
    }

    /// Registered operations, in declaration order.
    pub fn operations(&self) -> Vec<OperationType> {
        OperationType::ALL
            .into_iter()
            .filter(|op| self.commands.contains_key(op))
            .collect()
    }

    /// Iterate over `(operation, command)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (OperationType, &Command)> {
        self.commands.iter().map(|(op, command)| (*op, command))
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no command is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Read-only mapping relation name → operation → command.
///
/// Built once by [`RegistryBuilder`]; lookups need no locking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandRegistry {
    relations: HashMap<String, RelationCommands>,
}

impl CommandRegistry {
    /// Command for `operation` on `relation`.
    pub fn get(&self, relation: &str, operation: OperationType) -> Option<&Command> {
        self.relations.get(relation)?.get(operation)
    }

    /// Commands registered for `relation`.
    pub fn relation(&self, relation: &str) -> Option<&RelationCommands> {
        self.relations.get(relation)
    }

    /// Relation names with at least one command, sorted.
    pub fn relations(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.relations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Iterate over `(relation, commands)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RelationCommands)> {
        self.relations.iter().map(|(name, commands)| (name.as_str(), commands))
    }

    /// Total number of registered commands.
    pub fn len(&self) -> usize {
        self.relations.values().map(RelationCommands::len).sum()
    }

    /// Whether no command is registered.
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

/// Builds a [`CommandRegistry`] from relations, adapters and classes.
#[derive(Debug)]
pub struct RegistryBuilder<'a> {
    relations: &'a Relations,
    repositories: &'a Repositories,
    config: RegistryConfig,
}

impl<'a> RegistryBuilder<'a> {
    /// Create a builder over `relations` and `repositories`.
    pub fn new(relations: &'a Relations, repositories: &'a Repositories) -> Self {
        Self {
            relations,
            repositories,
            config: RegistryConfig::default(),
        }
    }

    /// Set the registry configuration.
    pub fn with_config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve, extend and build every class.
    ///
    /// Each class is bound to the relation it names; the relation's adapter
    /// supplies the extension hook, which is skipped for classes that were
    /// already extended. A later class registered under the same relation and
    /// operation replaces an earlier one unless overwrites are disabled.
    pub fn build<'c, I>(&self, classes: I) -> TesseraResult<CommandRegistry>
    where
        I: IntoIterator<Item = &'c CommandClass>,
    {
        let mut relations: HashMap<String, RelationCommands> = HashMap::new();

        for class in classes {
            let Some(relation_name) = class.relation() else {
                config_err!("{} does not name a relation", class.name());
            };
            let relation = self
                .relations
                .get(relation_name)
                .ok_or_else(|| TesseraError::unknown_relation(relation_name))?;
            let adapter = self
                .repositories
                .get(relation.adapter().as_str())
                .ok_or_else(|| TesseraError::unknown_adapter(relation.adapter().as_str()))?;

            let options = ClassOptions::new(relation.adapter().clone());
            let class = extend_class(adapter.as_ref(), class.clone(), &options)?;
            let command = class.build(relation.clone());
            let operation = class.register_as();

            let commands = relations.entry(relation_name.to_string()).or_default();
            match commands.commands.entry(operation) {
                Entry::Occupied(mut slot) => {
                    ensure!(
                        self.config.allow_overwrite,
                        Configuration: "duplicate `{operation}` command for relation `{relation_name}`"
                    );
                    warn!(
                        "Replacing {} with {} for {relation_name}.{operation}",
                        slot.get().name(),
                        command.name()
                    );
                    slot.insert(command);
                }
                Entry::Vacant(slot) => {
                    debug!("Registered {} as {relation_name}.{operation}", command.name());
                    slot.insert(command);
                }
            }
        }

        Ok(CommandRegistry { relations })
    }
}

/// Build a registry with the default configuration.
pub fn registry<'c, I>(
    relations: &Relations,
    repositories: &Repositories,
    classes: I,
) -> TesseraResult<CommandRegistry>
where
    I: IntoIterator<Item = &'c CommandClass>,
{
    RegistryBuilder::new(relations, repositories).build(classes)
}
