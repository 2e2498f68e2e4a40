//! Configuration management for Tessera.
//!
//! Provides settings for command class factories and registry builders.

use serde::{Deserialize, Serialize};

use common_error::TesseraResult;
use tessera_core::ResultArity;

/// Global Tessera configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TesseraConfig {
    /// Command class configuration.
    pub commands: CommandConfig,
    /// Registry configuration.
    pub registry: RegistryConfig,
}

impl TesseraConfig {
    /// Parse a configuration from JSON. Missing sections take their defaults.
    pub fn from_json_str(json: &str) -> TesseraResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the command configuration.
    pub fn with_commands(mut self, commands: CommandConfig) -> Self {
        self.commands = commands;
        self
    }

    /// Set the registry configuration.
    pub fn with_registry(mut self, registry: RegistryConfig) -> Self {
        self.registry = registry;
        self
    }
}

/// Command class configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    /// Prefix for generated class names (`ROM` gives `ROM::Memory::Commands::Create[Users]`).
    pub namespace: Option<String>,
    /// Result arity of classes that do not declare one.
    pub default_result: ResultArity,
}

impl CommandConfig {
    /// Set the class name namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set the default result arity.
    pub fn with_default_result(mut self, result: ResultArity) -> Self {
        self.default_result = result;
        self
    }
}

/// Registry builder configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Let a later class replace an earlier one registered under the same
    /// relation and operation. When false the duplicate is a configuration error.
    pub allow_overwrite: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            allow_overwrite: true,
        }
    }
}

impl RegistryConfig {
    /// Reject duplicate registry keys.
    pub fn strict() -> Self {
        Self {
            allow_overwrite: false,
        }
    }
}
