//! Named collection of relations.

use std::collections::HashMap;

use crate::relation::RelationHandle;

/// Relations by name, as handed to the registry builder.
#[derive(Debug, Default, Clone)]
pub struct Relations {
    relations: HashMap<String, RelationHandle>,
}

impl Relations {
    /// Create a new empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a relation under its own name, replacing any previous one.
    pub fn register(&mut self, relation: RelationHandle) -> Option<RelationHandle> {
        self.relations.insert(relation.name().to_string(), relation)
    }

    /// Builder-style [`Relations::register`].
    pub fn with(mut self, relation: RelationHandle) -> Self {
        self.register(relation);
        self
    }

    /// Get a relation by name.
    pub fn get(&self, name: &str) -> Option<&RelationHandle> {
        self.relations.get(name)
    }

    /// Remove a relation.
    pub fn remove(&mut self, name: &str) -> Option<RelationHandle> {
        self.relations.remove(name)
    }

    /// List all relation names, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.relations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Check if a relation exists.
    pub fn exists(&self, name: &str) -> bool {
        self.relations.contains_key(name)
    }

    /// Number of relations.
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

impl FromIterator<RelationHandle> for Relations {
    fn from_iter<T: IntoIterator<Item = RelationHandle>>(iter: T) -> Self {
        let mut relations = Self::new();
        for relation in iter {
            relations.register(relation);
        }
        relations
    }
}
