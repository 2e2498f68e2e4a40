//! `MemoryRelation`: a tuple collection held in process memory.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use common_error::{TesseraError, TesseraResult};
use tessera_core::{AdapterId, HelperOutput, Relation, RelationHandle, Tuple, Value};

/// Signature of a domain helper registered on a memory relation.
pub type HelperFn = dyn Fn(&MemoryRelation, &[Value]) -> TesseraResult<HelperOutput> + Send + Sync;

/// In-memory relation.
///
/// A relation is a view over a shared dataset, optionally narrowed by an
/// equality restriction. [`MemoryRelation::restrict`] returns another view
/// over the same dataset, so mutations through either view are visible to
/// both.
///
/// # Example
///
/// ```rust,ignore
/// let users = MemoryRelation::new("users").with_restriction_helper("by_id", "id");
/// users.insert(Value::tuple([("id", 1)]).as_map().cloned().unwrap())?;
///
/// let jane = users.restrict(tuple([("id", 1)]));
/// assert_eq!(jane.len()?, 1);
/// ```
#[derive(Clone)]
pub struct MemoryRelation {
    name: String,
    adapter: AdapterId,
    dataset: Arc<RwLock<Vec<Tuple>>>,
    restriction: Tuple,
    helpers: HashMap<String, Arc<HelperFn>>,
}

impl MemoryRelation {
    /// Create an empty relation owned by the memory adapter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            adapter: AdapterId::new(AdapterId::MEMORY),
            dataset: Arc::new(RwLock::new(Vec::new())),
            restriction: Tuple::new(),
            helpers: HashMap::new(),
        }
    }

    /// Report a different adapter identifier.
    pub fn with_adapter(mut self, adapter: impl Into<AdapterId>) -> Self {
        self.adapter = adapter.into();
        self
    }

    /// Seed the dataset with tuples.
    pub fn with_tuples(self, tuples: impl IntoIterator<Item = Tuple>) -> TesseraResult<Self> {
        self.write()?.extend(tuples);
        Ok(self)
    }

    /// Register a domain helper.
    pub fn with_helper<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&MemoryRelation, &[Value]) -> TesseraResult<HelperOutput> + Send + Sync + 'static,
    {
        self.helpers.insert(name.into(), Arc::new(f));
        self
    }

    /// Register a helper restricting `column` to the helper's first argument.
    ///
    /// `with_restriction_helper("by_id", "id")` makes `by_id(1)` return the
    /// view `restrict({id: 1})`.
    pub fn with_restriction_helper(self, name: impl Into<String>, column: impl Into<String>) -> Self {
        let name = name.into();
        let column = column.into();
        let helper_name = name.clone();
        self.with_helper(name, move |relation, args| {
            let value = args.first().cloned().ok_or_else(|| {
                TesseraError::value_error(format!("{helper_name} expects one argument"))
            })?;
            let criteria = Tuple::from([(column.clone(), value)]);
            Ok(HelperOutput::Relation(relation.restrict(criteria).into_handle()))
        })
    }

    /// A view over the same dataset, further restricted by `criteria`.
    pub fn restrict(&self, criteria: Tuple) -> Self {
        let mut view = self.clone();
        view.restriction.extend(criteria);
        view
    }

    /// Equality restriction applied by this view.
    pub fn restriction(&self) -> &Tuple {
        &self.restriction
    }

    /// Tuples visible through this view.
    pub fn tuples(&self) -> TesseraResult<Vec<Tuple>> {
        Ok(self
            .read()?
            .iter()
            .filter(|tuple| self.matches(tuple))
            .cloned()
            .collect())
    }

    /// Number of tuples visible through this view.
    pub fn len(&self) -> TesseraResult<usize> {
        Ok(self.read()?.iter().filter(|tuple| self.matches(tuple)).count())
    }

    /// Whether the view is empty.
    pub fn is_empty(&self) -> TesseraResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Share this relation as a handle.
    pub fn into_handle(self) -> RelationHandle {
        Arc::new(self)
    }

    fn matches(&self, tuple: &Tuple) -> bool {
        self.restriction
            .iter()
            .all(|(column, value)| tuple.get(column) == Some(value))
    }

    fn read(&self) -> TesseraResult<RwLockReadGuard<'_, Vec<Tuple>>> {
        self.dataset
            .read()
            .map_err(|_| TesseraError::execution(format!("relation `{}` is poisoned", self.name)))
    }

    fn write(&self) -> TesseraResult<RwLockWriteGuard<'_, Vec<Tuple>>> {
        self.dataset
            .write()
            .map_err(|_| TesseraError::execution(format!("relation `{}` is poisoned", self.name)))
    }
}

impl Relation for MemoryRelation {
    fn name(&self) -> &str {
        &self.name
    }

    fn adapter(&self) -> &AdapterId {
        &self.adapter
    }

    fn insert(&self, tuple: Tuple) -> TesseraResult<Value> {
        self.write()?.push(tuple.clone());
        Ok(Value::Map(tuple))
    }

    fn update(&self, changes: &Tuple) -> TesseraResult<Value> {
        let mut dataset = self.write()?;
        let mut updated = Vec::new();
        for tuple in dataset.iter_mut().filter(|tuple| self.matches(tuple)) {
            tuple.extend(changes.iter().map(|(k, v)| (k.clone(), v.clone())));
            updated.push(Value::Map(tuple.clone()));
        }
        Ok(Value::Array(updated))
    }

    fn delete(&self) -> TesseraResult<Value> {
        let mut dataset = self.write()?;
        let (deleted, kept): (Vec<Tuple>, Vec<Tuple>) =
            dataset.drain(..).partition(|tuple| self.matches(tuple));
        *dataset = kept;
        Ok(Value::from(deleted))
    }

    fn helper(&self, name: &str, args: &[Value]) -> TesseraResult<HelperOutput> {
        let helper = self.helpers.get(name).ok_or_else(|| {
            TesseraError::unknown_helper(format!("relation `{}` does not define `{name}`", self.name))
        })?;
        helper(self, args)
    }

    fn helper_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.helpers.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    fn same_relation(&self, other: &dyn Relation) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| self == other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl PartialEq for MemoryRelation {
    /// Views are equal when they share a dataset, name and restriction.
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.dataset, &other.dataset)
            && self.name == other.name
            && self.restriction == other.restriction
    }
}

impl fmt::Debug for MemoryRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryRelation")
            .field("name", &self.name)
            .field("adapter", &self.adapter)
            .field("restriction", &self.restriction)
            .field("helpers", &self.helper_names())
            .finish_non_exhaustive()
    }
}
