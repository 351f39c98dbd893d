//! Resolution engine
//!
//! [`ConfigEngine`] owns the source chain, the resolved-value cache, the
//! process properties and the key registry. It is an ordinary value: build
//! one per process (or one per test) and share it behind an `Arc`.
//!
//! # Resolution
//!
//! A lookup proceeds in three steps:
//!
//! 1. If chain slot 0 holds a volatile source, it is asked first, live. An
//!    answer is returned as is and never cached.
//! 2. The cache is consulted. With `eager_resolution` enabled, an incomplete
//!    cache is first filled by [`ConfigEngine::resolve_all`].
//! 3. On a cache miss the key alone is resolved and the outcome, including
//!    "absent", is cached. This never marks the cache complete.
//!
//! Every chain mutation clears the whole cache while holding the chain write
//! lock. Cache writes only happen under the chain read lock, so an outcome
//! computed against an old chain can never outlive a mutation.

use super::cache::{CacheEntry, ResolvedCache, ResolvedValue};
use super::chain::SourceChain;
use crate::config::KeystoneSettings;
use crate::domain::Result;
use crate::keys::{KeyDefinition, KeyRegistry};
use crate::source::{ConfigSource, FileFormat, FileSource, ProcessProperties, SourceKind};
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

/// Engine behaviour switches
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Run eager resolution on the first lookup against an incomplete cache
    pub eager_resolution: bool,
    /// Token displayed instead of sensitive values
    pub redaction_token: String,
    /// Delimiter for list accessors
    pub list_delimiter: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            eager_resolution: true,
            redaction_token: crate::typed::REDACTION_TOKEN.to_string(),
            list_delimiter: ",".to_string(),
        }
    }
}

impl From<&KeystoneSettings> for EngineOptions {
    fn from(settings: &KeystoneSettings) -> Self {
        Self {
            eager_resolution: settings.application.eager_resolution,
            redaction_token: settings.masking.redaction_token.clone(),
            list_delimiter: settings.masking.list_delimiter.clone(),
        }
    }
}

/// Builder for [`ConfigEngine`]
#[derive(Debug, Default)]
pub struct EngineBuilder {
    options: EngineOptions,
    keys: KeyRegistry,
    properties: Option<ProcessProperties>,
}

impl EngineBuilder {
    /// Sets the engine options
    pub fn options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Enables or disables eager resolution
    pub fn eager_resolution(mut self, eager: bool) -> Self {
        self.options.eager_resolution = eager;
        self
    }

    /// Sets the declared keys
    pub fn keys(mut self, keys: KeyRegistry) -> Self {
        self.keys = keys;
        self
    }

    /// Shares an existing property store with the engine
    pub fn properties(mut self, properties: ProcessProperties) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Builds an engine whose chain holds the two base sources
    pub fn build(self) -> ConfigEngine {
        let properties = self.properties.unwrap_or_default();
        ConfigEngine {
            chain: RwLock::new(SourceChain::with_base(&properties)),
            cache: ResolvedCache::new(),
            properties,
            keys: RwLock::new(self.keys),
            options: self.options,
        }
    }
}

/// Multi-source configuration resolver
///
/// ```rust
/// use keystone::core::ConfigEngine;
/// use keystone::source::MapSource;
/// use std::sync::Arc;
///
/// let engine = ConfigEngine::new();
/// engine.append_source(Arc::new(MapSource::new("defaults").with_entry("browser", "chrome")));
/// engine.set_property("browser", "firefox");
///
/// // Properties sit ahead of appended sources
/// assert_eq!(engine.get("browser").as_deref(), Some("firefox"));
/// ```
pub struct ConfigEngine {
    chain: RwLock<SourceChain>,
    cache: ResolvedCache,
    properties: ProcessProperties,
    keys: RwLock<KeyRegistry>,
    options: EngineOptions,
}

impl Default for ConfigEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConfigEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigEngine")
            .field("chain", &*self.chain.read())
            .field("cached", &self.cache.len())
            .field("options", &self.options)
            .finish()
    }
}

impl ConfigEngine {
    /// Creates an engine with default options, no declared keys, and the
    /// two base sources
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts building an engine
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Builds an engine from settings, registering every configured file
    ///
    /// # Errors
    ///
    /// Returns an error if a sensitive pattern does not compile or a
    /// non-optional file source fails to load.
    pub fn from_settings(settings: &KeystoneSettings) -> Result<Self> {
        let mut keys = KeyRegistry::new();
        for pattern in &settings.masking.sensitive_patterns {
            keys = keys.with_sensitive_pattern(pattern)?;
        }
        for key in &settings.keys {
            keys.register(KeyDefinition::from(key));
        }

        let engine = Self::builder()
            .options(EngineOptions::from(settings))
            .keys(keys)
            .build();

        for source in &settings.sources {
            engine.register_file(&source.path, source.format, source.priority, source.optional)?;
        }

        tracing::info!(
            sources = engine.source_count(),
            declared_keys = engine.keys.read().len(),
            "Configuration engine assembled"
        );
        Ok(engine)
    }

    /// Engine options
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    // ---- chain management ------------------------------------------------

    fn mutate_chain<R>(&self, op: impl FnOnce(&mut SourceChain) -> R) -> R {
        let mut chain = self.chain.write();
        let result = op(&mut chain);
        self.cache.clear();
        result
    }

    /// Adds a source with the lowest precedence
    pub fn append_source(&self, source: Arc<dyn ConfigSource>) {
        crate::log_source_registered!(source, self.source_count());
        self.mutate_chain(|chain| chain.append(source));
    }

    /// Inserts a source at an explicit position (0 = highest precedence)
    ///
    /// # Errors
    ///
    /// Returns a validation error if `index` is past the end of the chain;
    /// the chain and cache are left untouched in that case.
    pub fn insert_source(&self, index: usize, source: Arc<dyn ConfigSource>) -> Result<()> {
        let mut chain = self.chain.write();
        let name = source.name().to_string();
        chain.insert_at(index, source)?;
        self.cache.clear();
        tracing::debug!(source = %name, index, "Source inserted");
        Ok(())
    }

    /// Inserts a source according to its priority, returning its index
    pub fn add_source(&self, source: Arc<dyn ConfigSource>) -> usize {
        let name = source.name().to_string();
        let priority = source.priority();
        let index = self.mutate_chain(|chain| chain.insert_by_priority(source));
        tracing::debug!(source = %name, priority, index, "Source added by priority");
        index
    }

    /// Removes the first source named `name`
    pub fn remove_source(&self, name: &str) -> bool {
        let mut chain = self.chain.write();
        let removed = chain.remove(name).is_some();
        if removed {
            self.cache.clear();
        }
        removed
    }

    /// Makes `source` the highest-precedence source
    ///
    /// Does nothing (and keeps the cache) when it already is; otherwise any
    /// other occurrence of the instance is removed first.
    pub fn ensure_front(&self, source: Arc<dyn ConfigSource>) {
        if self.chain.read().is_front(&source) {
            return;
        }
        let mut chain = self.chain.write();
        if chain.is_front(&source) {
            return;
        }
        chain.remove_instance(&source);
        // Index 0 is always in range.
        let _ = chain.insert_at(0, source);
        self.cache.clear();
    }

    /// Removes every source and reinstalls the two base sources
    pub fn reset(&self) {
        let properties = self.properties.clone();
        self.mutate_chain(|chain| chain.reset(&properties));
        tracing::info!("Source chain reset to base sources");
    }

    /// Loads a file and registers it by priority
    ///
    /// Returns `Ok(false)` when `optional` is set and the file does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns [`KeystoneError::SourceLoad`] if the file cannot be loaded.
    pub fn register_file(
        &self,
        path: impl AsRef<Path>,
        format: Option<FileFormat>,
        priority: Option<i32>,
        optional: bool,
    ) -> Result<bool> {
        let loaded = if optional {
            FileSource::load_optional(path, format)?
        } else {
            Some(FileSource::load(path, format)?)
        };

        match loaded {
            Some(source) => {
                let source = match priority {
                    Some(priority) => source.with_priority(priority),
                    None => source,
                };
                self.add_source(Arc::new(source));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Source names in precedence order
    pub fn source_names(&self) -> Vec<String> {
        self.chain.read().names()
    }

    /// Snapshot of the chain's sources in precedence order
    pub fn sources(&self) -> Vec<Arc<dyn ConfigSource>> {
        self.chain.read().iter().cloned().collect()
    }

    /// Number of sources in the chain
    pub fn source_count(&self) -> usize {
        self.chain.read().len()
    }

    // ---- properties --------------------------------------------------------

    /// The process-properties store backing the base property source
    pub fn properties(&self) -> &ProcessProperties {
        &self.properties
    }

    /// Sets a process property and invalidates the cache
    pub fn set_property(&self, key: impl Into<String>, value: impl Into<String>) {
        let _chain = self.chain.write();
        self.properties.set(key, value);
        self.cache.clear();
    }

    /// Removes a process property and invalidates the cache
    pub fn remove_property(&self, key: &str) -> Option<String> {
        let _chain = self.chain.write();
        let previous = self.properties.remove(key);
        self.cache.clear();
        previous
    }

    // ---- declared keys -----------------------------------------------------

    /// Declares a key after construction
    pub fn register_key(&self, key: KeyDefinition) {
        self.keys.write().register(key);
    }

    /// Declaration for `name`
    pub fn key(&self, name: &str) -> Option<KeyDefinition> {
        self.keys.read().get(name).cloned()
    }

    /// All declarations, sorted by name
    pub fn declared_keys(&self) -> Vec<KeyDefinition> {
        self.keys.read().iter().cloned().collect()
    }

    /// Names of the keys declared required, sorted
    pub fn required_keys(&self) -> Vec<String> {
        self.keys
            .read()
            .required()
            .map(|key| key.name().to_string())
            .collect()
    }

    /// Whether `name` is flagged or pattern-matched as sensitive
    pub fn is_sensitive(&self, name: &str) -> bool {
        self.keys.read().is_sensitive(name)
    }

    pub(crate) fn default_for(&self, name: &str) -> Option<String> {
        self.keys.read().default_for(name).map(str::to_string)
    }

    // ---- resolution --------------------------------------------------------

    /// Raw value for `key`, without applying defaults
    pub fn get(&self, key: &str) -> Option<String> {
        self.describe(key).map(|resolved| resolved.value)
    }

    /// Value for `key` together with the source that produced it
    pub fn describe(&self, key: &str) -> Option<ResolvedValue> {
        let chain = self.chain.read();

        let start = match volatile_front(&chain) {
            Some(front) => {
                if let Some(value) = front.lookup(key) {
                    return Some(ResolvedValue::new(value, front.as_ref()));
                }
                1
            }
            None => 0,
        };

        if self.options.eager_resolution && !self.cache.is_complete() {
            self.populate(&chain, start);
        }

        if let Some(entry) = self.cache.get(key) {
            return entry.into_value();
        }

        let outcome = chain.lookup_from(start, key);
        self.cache.insert(key, CacheEntry::from(outcome.clone()));
        tracing::trace!(key, found = outcome.is_some(), "Resolved key lazily");
        outcome
    }

    /// Resolves every interesting key and marks the cache complete
    ///
    /// Interesting keys are all declared keys plus every key exposed by an
    /// environment or process-properties source in the chain. Returns the
    /// number of keys that resolved to a value.
    pub fn resolve_all(&self) -> usize {
        let chain = self.chain.read();
        let start = if volatile_front(&chain).is_some() { 1 } else { 0 };
        self.populate(&chain, start)
    }

    fn populate(&self, chain: &SourceChain, start: usize) -> usize {
        let mut interesting: BTreeSet<String> = self.keys.read().names().into_iter().collect();
        for source in chain.iter() {
            if matches!(
                source.kind(),
                SourceKind::Environment | SourceKind::ProcessProperties
            ) {
                interesting.extend(source.keys());
            }
        }

        let mut found = 0;
        let entries: Vec<(String, CacheEntry)> = interesting
            .into_iter()
            .map(|key| {
                let outcome = chain.lookup_from(start, &key);
                if outcome.is_some() {
                    found += 1;
                }
                (key, CacheEntry::from(outcome))
            })
            .collect();

        let total = entries.len();
        self.cache.fill_complete(entries);
        tracing::debug!(keys = total, found, "Eager resolution complete");
        found
    }

    /// Clears the cache without touching the chain
    pub fn invalidate(&self) {
        let _chain = self.chain.write();
        self.cache.clear();
    }

    /// Whether eager resolution has filled the cache since the last change
    pub fn is_cache_complete(&self) -> bool {
        self.cache.is_complete()
    }

    /// Number of cached outcomes
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// All values known to the cache, eagerly resolving first
    ///
    /// Values from a volatile front source are not part of the snapshot.
    pub fn snapshot(&self) -> Vec<(String, ResolvedValue)> {
        if !self.cache.is_complete() {
            self.resolve_all();
        }
        self.cache.present_values()
    }
}

fn volatile_front(chain: &SourceChain) -> Option<&Arc<dyn ConfigSource>> {
    chain.first().filter(|front| front.is_volatile())
}
