//! `MemoryAdapter`: templates for commands over [`MemoryRelation`]s.
//!
//! [`MemoryRelation`]: super::MemoryRelation

use std::sync::Arc;

use tessera_command::{Adapter, BodyRef};
use tessera_core::{AdapterId, OperationType};

use super::commands::{CreateTuples, DeleteTuples, UpdateTuples};

/// The in-memory adapter.
///
/// Every operation has a template; the extension hook is the default
/// identity.
#[derive(Debug, Clone)]
pub struct MemoryAdapter {
    id: AdapterId,
    create: BodyRef,
    update: BodyRef,
    delete: BodyRef,
}

impl MemoryAdapter {
    /// Create the adapter under the `memory` identifier.
    pub fn new() -> Self {
        Self::with_id(AdapterId::MEMORY)
    }

    /// Create the adapter under a custom identifier.
    pub fn with_id(id: impl Into<AdapterId>) -> Self {
        Self {
            id: id.into(),
            create: Arc::new(CreateTuples),
            update: Arc::new(UpdateTuples),
            delete: Arc::new(DeleteTuples),
        }
    }
}

impl Default for MemoryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Adapter for MemoryAdapter {
    fn id(&self) -> &AdapterId {
        &self.id
    }

    fn command_template(&self, operation: OperationType) -> Option<BodyRef> {
        let template = match operation {
            OperationType::Create => &self.create,
            OperationType::Update => &self.update,
            OperationType::Delete => &self.delete,
        };
        Some(Arc::clone(template))
    }
}
