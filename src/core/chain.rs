//! Ordered source chain
//!
//! Index 0 holds the highest-precedence source. The chain itself is a plain
//! data structure; the engine wraps it in a lock and invalidates its cache
//! on every mutation.

use super::cache::ResolvedValue;
use crate::domain::{KeystoneError, Result};
use crate::source::{ConfigSource, EnvSource, ProcessProperties, PropertySource};
use std::sync::Arc;

/// Ordered collection of sources, highest precedence first
#[derive(Clone, Default)]
pub struct SourceChain {
    sources: Vec<Arc<dyn ConfigSource>>,
}

impl SourceChain {
    /// Creates an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a chain holding only the two base sources:
    /// process properties, then the environment
    pub fn with_base(properties: &ProcessProperties) -> Self {
        let mut chain = Self::new();
        chain.install_base(properties);
        chain
    }

    fn install_base(&mut self, properties: &ProcessProperties) {
        self.sources
            .push(Arc::new(PropertySource::new(properties.clone())));
        self.sources.push(Arc::new(EnvSource::new()));
    }

    /// Removes every source and reinstalls the base sources
    pub fn reset(&mut self, properties: &ProcessProperties) {
        self.sources.clear();
        self.install_base(properties);
    }

    /// Adds a source with the lowest precedence
    pub fn append(&mut self, source: Arc<dyn ConfigSource>) {
        self.sources.push(source);
    }

    /// Inserts a source at an explicit position
    ///
    /// # Errors
    ///
    /// Returns a validation error if `index` is past the end of the chain
    pub fn insert_at(&mut self, index: usize, source: Arc<dyn ConfigSource>) -> Result<()> {
        if index > self.sources.len() {
            return Err(KeystoneError::Validation(format!(
                "cannot insert source '{}' at index {} of a chain with {} sources",
                source.name(),
                index,
                self.sources.len()
            )));
        }
        self.sources.insert(index, source);
        Ok(())
    }

    /// Inserts a source before the first source with a strictly lower
    /// priority, returning the index it landed at
    ///
    /// Sources with equal priority keep their existing order, and the new
    /// source goes after them.
    pub fn insert_by_priority(&mut self, source: Arc<dyn ConfigSource>) -> usize {
        let priority = source.priority();
        let index = self
            .sources
            .iter()
            .position(|existing| existing.priority() < priority)
            .unwrap_or(self.sources.len());
        self.sources.insert(index, source);
        index
    }

    /// Removes the first source named `name`
    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn ConfigSource>> {
        let index = self.position(name)?;
        Some(self.sources.remove(index))
    }

    /// Removes the given source instance wherever it is
    pub fn remove_instance(&mut self, source: &Arc<dyn ConfigSource>) -> bool {
        let before = self.sources.len();
        self.sources.retain(|s| !same_instance(s, source));
        self.sources.len() != before
    }

    /// Position of the first source named `name`
    pub fn position(&self, name: &str) -> Option<usize> {
        self.sources.iter().position(|s| s.name() == name)
    }

    /// Whether `source` is the instance at index 0
    pub fn is_front(&self, source: &Arc<dyn ConfigSource>) -> bool {
        self.sources
            .first()
            .is_some_and(|front| same_instance(front, source))
    }

    /// Source at `index`
    pub fn get(&self, index: usize) -> Option<&Arc<dyn ConfigSource>> {
        self.sources.get(index)
    }

    /// Highest-precedence source
    pub fn first(&self) -> Option<&Arc<dyn ConfigSource>> {
        self.sources.first()
    }

    /// Sources in precedence order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ConfigSource>> {
        self.sources.iter()
    }

    /// Source names in precedence order
    pub fn names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name().to_string()).collect()
    }

    /// Number of sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether the chain is empty
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// First value for `key`, scanning the whole chain
    pub fn lookup(&self, key: &str) -> Option<ResolvedValue> {
        self.lookup_from(0, key)
    }

    /// First value for `key`, scanning from position `start`
    pub fn lookup_from(&self, start: usize, key: &str) -> Option<ResolvedValue> {
        self.sources.iter().skip(start).find_map(|source| {
            source
                .lookup(key)
                .map(|value| ResolvedValue::new(value, source.as_ref()))
        })
    }
}

impl std::fmt::Debug for SourceChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

fn same_instance(a: &Arc<dyn ConfigSource>, b: &Arc<dyn ConfigSource>) -> bool {
    // Compare data pointers only; vtable pointers may differ across codegen units.
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}
