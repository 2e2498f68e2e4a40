//! Testing utilities for code that drives relations.
//!
//! [`RecordingRelation`] stands in for a backend: it answers mutation calls
//! with canned values registered up front and records every call it receives.

use std::any::Any;
use std::sync::Mutex;

use common_error::{TesseraError, TesseraResult};

use crate::identifiers::AdapterId;
use crate::relation::Relation;
use crate::types::{Tuple, Value};

/// A mutation call observed by a [`RecordingRelation`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    /// `insert(tuple)`.
    Insert(Tuple),
    /// `update(changes)`.
    Update(Tuple),
    /// `delete()`.
    Delete,
}

#[derive(Debug, Default)]
struct Script {
    inserts: Vec<(Tuple, Value)>,
    updates: Vec<(Tuple, Value)>,
    delete: Option<Value>,
    failure: Option<String>,
    calls: Vec<RecordedCall>,
}

/// Relation double returning scripted results.
///
/// Unexpected calls fail with an `ExecutionError`, so a test learns both that
/// a primitive was reached and what it was given.
#[derive(Debug)]
pub struct RecordingRelation {
    name: String,
    adapter: AdapterId,
    script: Mutex<Script>,
}

impl RecordingRelation {
    /// Create a double for the relation `name` owned by `adapter`.
    pub fn new(name: impl Into<String>, adapter: impl Into<AdapterId>) -> Self {
        Self {
            name: name.into(),
            adapter: adapter.into(),
            script: Mutex::new(Script::default()),
        }
    }

    /// Answer `insert(input)` with `returns`.
    pub fn expect_insert(self, input: Tuple, returns: Value) -> Self {
        self.with_script(|script| script.inserts.push((input, returns)))
    }

    /// Answer `update(changes)` with `returns`.
    pub fn expect_update(self, changes: Tuple, returns: Value) -> Self {
        self.with_script(|script| script.updates.push((changes, returns)))
    }

    /// Answer `delete()` with `returns`.
    pub fn expect_delete(self, returns: Value) -> Self {
        self.with_script(|script| script.delete = Some(returns))
    }

    /// Make every primitive fail with `message`.
    pub fn failing(self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.with_script(|script| script.failure = Some(message))
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    fn with_script(self, f: impl FnOnce(&mut Script)) -> Self {
        f(&mut self.lock());
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        // A test that panicked while holding the lock already failed.
        self.script.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn record(&self, call: RecordedCall) -> TesseraResult<std::sync::MutexGuard<'_, Script>> {
        let mut script = self.lock();
        script.calls.push(call);
        if let Some(message) = &script.failure {
            return Err(TesseraError::execution(message.clone()));
        }
        Ok(script)
    }

    fn unexpected(&self, what: &str) -> TesseraError {
        TesseraError::execution(format!("{} received unexpected {what}", self.name))
    }
}

impl Relation for RecordingRelation {
    fn name(&self) -> &str {
        &self.name
    }

    fn adapter(&self) -> &AdapterId {
        &self.adapter
    }

    fn insert(&self, tuple: Tuple) -> TesseraResult<Value> {
        let script = self.record(RecordedCall::Insert(tuple.clone()))?;
        script
            .inserts
            .iter()
            .find(|(expected, _)| *expected == tuple)
            .map(|(_, returns)| returns.clone())
            .ok_or_else(|| self.unexpected(&format!("insert({tuple:?})")))
    }

    fn update(&self, changes: &Tuple) -> TesseraResult<Value> {
        let script = self.record(RecordedCall::Update(changes.clone()))?;
        script
            .updates
            .iter()
            .find(|(expected, _)| expected == changes)
            .map(|(_, returns)| returns.clone())
            .ok_or_else(|| self.unexpected(&format!("update({changes:?})")))
    }

    fn delete(&self) -> TesseraResult<Value> {
        let script = self.record(RecordedCall::Delete)?;
        script
            .delete
            .clone()
            .ok_or_else(|| self.unexpected("delete()"))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
