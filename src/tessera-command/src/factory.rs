//! Command class factory with a keyed, build-once cache.
//!
//! The factory resolves an adapter's template for an operation, applies an
//! optional body customizer, runs the adapter extension hook and caches the
//! result under its `(adapter, relation, operation)` key. The cache belongs
//! to the factory value; dropping the factory or calling
//! [`CommandFactory::clear`] tears it down.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, trace};

use common_config::CommandConfig;
use common_error::{TesseraResult, config_err};
use tessera_core::{AdapterId, OperationType, RelationName};

use crate::adapter::{AdapterHandle, ClassOptions, Repositories, extend_class};
use crate::class::{BodyCustomizer, ClassBuilder, CommandClass, CommandClassKey};

/// Builds and memoizes command classes.
///
/// The cache lock is held while a class is constructed, so concurrent
/// callers asking for the same key see exactly one construction and one
/// extension hook call. Extension hooks must not call back into the factory.
#[derive(Debug)]
pub struct CommandFactory {
    repositories: Repositories,
    config: CommandConfig,
    cache: Mutex<HashMap<CommandClassKey, CommandClass>>,
}

impl CommandFactory {
    /// Create a factory over `repositories` with the default configuration.
    pub fn new(repositories: Repositories) -> Self {
        Self::with_config(repositories, CommandConfig::default())
    }

    /// Create a factory with a custom configuration.
    pub fn with_config(repositories: Repositories, config: CommandConfig) -> Self {
        Self {
            repositories,
            config,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Adapters known to this factory.
    pub fn repositories(&self) -> &Repositories {
        &self.repositories
    }

    /// Factory configuration.
    pub fn config(&self) -> &CommandConfig {
        &self.config
    }

    /// Build (or fetch) the class for `operation` on `relation`.
    pub fn build_class(
        &self,
        operation: OperationType,
        relation: impl Into<RelationName>,
        options: &ClassOptions,
    ) -> TesseraResult<CommandClass> {
        self.build_class_with(operation, relation, options, |custom| custom)
    }

    /// Build (or fetch) a class, customizing its body on first construction.
    ///
    /// When the key is already cached the cached class is returned and
    /// `customize` is not applied.
    pub fn build_class_with<F>(
        &self,
        operation: OperationType,
        relation: impl Into<RelationName>,
        options: &ClassOptions,
        customize: F,
    ) -> TesseraResult<CommandClass>
    where
        F: FnOnce(BodyCustomizer) -> BodyCustomizer,
    {
        let relation = relation.into();
        let key = CommandClassKey::new(options.adapter.clone(), relation.clone(), operation);
        let mut cache = self.lock();
        if let Some(class) = cache.get(&key) {
            trace!("Class cache hit for {}", class.name());
            return Ok(class.clone());
        }

        let adapter = self.adapter(options)?;
        let mut builder = self.template_builder(operation, options)?.relation(relation);
        if let Some(result) = options.result {
            builder = builder.default_result(result);
        }
        let builder = builder.customize(customize);

        let class = extend_class(adapter.as_ref(), builder.build(), options)?;
        debug!("Built command class {}", class.name());
        cache.insert(key, class.clone());
        Ok(class)
    }

    /// Declare a class by hand on top of `adapter`'s template.
    ///
    /// `define` sets the relation, name, body or markers. The adapter's
    /// extension hook runs here, once, so the returned class already carries
    /// the hook's effect wherever it is built or registered. Declared classes
    /// are not cached.
    pub fn declare<F>(
        &self,
        operation: OperationType,
        adapter: impl Into<AdapterId>,
        define: F,
    ) -> TesseraResult<CommandClass>
    where
        F: FnOnce(ClassBuilder) -> ClassBuilder,
    {
        let options = ClassOptions::new(adapter);
        let handle = self.adapter(&options)?;
        let class = define(self.template_builder(operation, &options)?).build();
        let class = extend_class(handle.as_ref(), class, &options)?;
        debug!("Declared command class {}", class.name());
        Ok(class)
    }

    /// A cached class, if one was built for `key`.
    pub fn cached(&self, key: &CommandClassKey) -> Option<CommandClass> {
        self.lock().get(key).cloned()
    }

    /// Number of cached classes.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no class has been built yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every cached class.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn template_builder(
        &self,
        operation: OperationType,
        options: &ClassOptions,
    ) -> TesseraResult<ClassBuilder> {
        let adapter = self.adapter(options)?;
        let Some(template) = adapter.command_template(operation) else {
            config_err!("adapter `{}` has no template for `{operation}`", options.adapter);
        };

        Ok(ClassBuilder::new(operation)
            .adapter(options.adapter.clone())
            .namespace(self.config.namespace.clone())
            .default_result(self.config.default_result)
            .body(template))
    }

    fn adapter(&self, options: &ClassOptions) -> TesseraResult<&AdapterHandle> {
        let Some(adapter) = self.repositories.get(options.adapter.as_str()) else {
            config_err!("adapter `{}` is not registered", options.adapter);
        };
        Ok(adapter)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CommandClassKey, CommandClass>> {
        // Entries are immutable once inserted, so a poisoned cache is still consistent.
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
