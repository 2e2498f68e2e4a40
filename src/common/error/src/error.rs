//! Core error types for Tessera.

use thiserror::Error;

/// Result type alias using `TesseraError`.
pub type TesseraResult<T> = std::result::Result<T, TesseraError>;

/// Error type for command construction, registration and execution.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TesseraError {
    /// Unknown adapter/operation combination, or an incomplete class declaration.
    #[error("ConfigurationError: {0}")]
    Configuration(String),

    /// A command class names a relation the relations collection does not hold.
    #[error("UnknownRelationError: {0}")]
    UnknownRelation(String),

    /// No adapter is registered under a relation's adapter identifier.
    #[error("UnknownAdapterError: {0}")]
    UnknownAdapter(String),

    /// A relation was asked for a helper it does not define.
    #[error("UnknownHelperError: {0}")]
    UnknownHelper(String),

    /// Command body without a concrete implementation.
    #[error("NotImplementedError: {0}")]
    NotImplemented(String),

    /// Invalid value provided.
    #[error("ValueError: {0}")]
    ValueError(String),

    /// Failure raised while executing a command or relation primitive.
    #[error("ExecutionError: {0}")]
    ExecutionError(String),

    /// JSON serialization error.
    #[error("SerdeJsonError: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl TesseraError {
    /// Create a new `Configuration` error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a new `UnknownRelation` error.
    pub fn unknown_relation<S: Into<String>>(name: S) -> Self {
        Self::UnknownRelation(name.into())
    }

    /// Create a new `UnknownAdapter` error.
    pub fn unknown_adapter<S: Into<String>>(id: S) -> Self {
        Self::UnknownAdapter(id.into())
    }

    /// Create a new `UnknownHelper` error.
    pub fn unknown_helper<S: Into<String>>(msg: S) -> Self {
        Self::UnknownHelper(msg.into())
    }

    /// Create a new `NotImplemented` error.
    pub fn not_implemented<S: Into<String>>(msg: S) -> Self {
        Self::NotImplemented(msg.into())
    }

    /// Create a new `ValueError`.
    pub fn value_error<S: Into<String>>(msg: S) -> Self {
        Self::ValueError(msg.into())
    }

    /// Create a new `ExecutionError`.
    pub fn execution<S: Into<String>>(msg: S) -> Self {
        Self::ExecutionError(msg.into())
    }
}

/// Ensure a condition holds, returning an error if not.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $variant:ident: $($msg:tt)*) => {
        if !$cond {
            return Err($crate::TesseraError::$variant(format!($($msg)*)));
        }
    };
    ($cond:expr, $msg:expr) => {
        if !$cond {
            return Err($crate::TesseraError::ExecutionError($msg.to_string()));
        }
    };
}

/// Return early with a `ValueError`.
#[macro_export]
macro_rules! value_err {
    ($($arg:tt)*) => {
        return Err($crate::TesseraError::ValueError(format!($($arg)*)))
    };
}

/// Return early with a `Configuration` error.
#[macro_export]
macro_rules! config_err {
    ($($arg:tt)*) => {
        return Err($crate::TesseraError::Configuration(format!($($arg)*)))
    };
}
