//! Unit tests for common-config crate

use common_config::{CommandConfig, RegistryConfig, TesseraConfig};
use common_error::TesseraError;
use tessera_core::ResultArity;

#[test]
fn test_tessera_config_default() {
    let config = TesseraConfig::default();

    assert_eq!(config.commands.namespace, None);
    assert_eq!(config.commands.default_result, ResultArity::Many);
    assert!(config.registry.allow_overwrite);
}

#[test]
fn test_registry_config_strict() {
    let config = RegistryConfig::strict();
    assert!(!config.allow_overwrite);
    assert_ne!(config, RegistryConfig::default());
}

#[test]
fn test_command_config_builders() {
    let config = CommandConfig::default()
        .with_namespace("ROM")
        .with_default_result(ResultArity::One);

    assert_eq!(config.namespace.as_deref(), Some("ROM"));
    assert_eq!(config.default_result, ResultArity::One);
}

#[test]
fn test_config_serialization() {
    let config = TesseraConfig::default()
        .with_commands(CommandConfig::default().with_namespace("ROM"))
        .with_registry(RegistryConfig::strict());

    let json = serde_json::to_string(&config).unwrap();
    let deserialized = TesseraConfig::from_json_str(&json).unwrap();

    assert_eq!(deserialized, config);
}

#[test]
fn test_partial_json_uses_defaults() {
    let config = TesseraConfig::from_json_str(r#"{"commands": {"default_result": "one"}}"#).unwrap();

    assert_eq!(config.commands.default_result, ResultArity::One);
    assert_eq!(config.commands.namespace, None);
    assert!(config.registry.allow_overwrite);
}

#[test]
fn test_invalid_json() {
    let err = TesseraConfig::from_json_str(r#"{"commands": {"default_result": "several"}}"#)
        .unwrap_err();
    assert!(matches!(err, TesseraError::SerdeJson(_)));
}
