//! Error types and result aliases for Tessera.
//!
//! Every crate in the workspace reports failures through [`TesseraError`].
//! Errors raised inside a command body or a relation primitive travel back to
//! the caller untouched; nothing in the engine wraps or swallows them.

mod error;

pub use error::{TesseraError, TesseraResult};
