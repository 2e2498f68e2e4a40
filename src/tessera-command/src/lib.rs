//! Command engine for Tessera.
//!
//! This crate builds, composes and indexes mutating commands over abstract
//! relations.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐   build_class   ┌──────────────┐   build(relation)   ┌───────────┐
//! │ CommandFactory │ ──────────────▶ │ CommandClass │ ──────────────────▶ │  Command  │
//! │  + Repositories│                 │  (immutable) │                     │  curry    │
//! └────────────────┘                 └──────────────┘                     └───────────┘
//!         │ extend_command_class            │                              │ >>
//!         ▼                                 ▼                              ▼
//!     Adapter hook                    RegistryBuilder                   Pipeline
//!                                  relation → op → Command
//! ```
//!
//! # Key Components
//!
//! - [`CommandFactory`]: resolves an [`Adapter`] template per operation, runs
//!   the adapter's extension hook once and caches the class by
//!   `(adapter, relation, operation)`
//! - [`CommandClass`]: immutable descriptor; [`CommandClass::builder`] for
//!   hand-declared classes, [`CommandClass::decorate`] for extension hooks
//! - [`Command`]: a class bound to a relation, with currying and helper
//!   forwarding
//! - [`Pipeline`]: `left >> right` composition threading results
//! - [`RegistryBuilder`] / [`registry`]: relation → operation → command
//!
//! # Example
//!
//! ```rust,ignore
//! let factory = CommandFactory::new(repositories);
//! let create = factory
//!     .build_class(OperationType::Create, "users", &ClassOptions::new("memory"))?
//!     .build(users);
//!
//! let created = create.curry(Value::tuple([("name", "Jane")])).call(&[])?;
//! ```

mod adapter;
mod body;
mod class;
mod command;
mod factory;
mod pipeline;
mod registry;

pub use adapter::{Adapter, AdapterHandle, ClassOptions, Repositories};
pub use body::{BodyRef, CommandBody, FnBody, Unimplemented, body_fn};
pub use class::{BodyCustomizer, ClassBuilder, CommandClass, CommandClassKey};
pub use command::{Command, Forwarded};
pub use factory::CommandFactory;
pub use pipeline::{Callable, Pipeline, Stage, StageFn, compose};
pub use registry::{CommandRegistry, RegistryBuilder, RelationCommands, registry};
