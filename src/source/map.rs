//! Fixed in-memory source

use super::{priority, ConfigSource, SourceKind};
use std::collections::HashMap;

/// A named source over a fixed set of key/value pairs
///
/// ```rust
/// use keystone::source::{ConfigSource, MapSource};
///
/// let source = MapSource::new("overrides")
///     .with_priority(500)
///     .with_entry("browser", "chrome");
/// assert_eq!(source.lookup("browser").as_deref(), Some("chrome"));
/// ```
#[derive(Debug, Clone)]
pub struct MapSource {
    name: String,
    priority: i32,
    kind: SourceKind,
    entries: HashMap<String, String>,
}

impl MapSource {
    /// Creates an empty source with default priority
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: priority::DEFAULT,
            kind: SourceKind::Custom,
            entries: HashMap::new(),
        }
    }

    /// Creates a source over `entries`
    pub fn from_entries<I, K, V>(name: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut source = Self::new(name);
        source.entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        source
    }

    /// Sets the insertion priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Overrides the reported kind
    pub fn with_kind(mut self, kind: SourceKind) -> Self {
        self.kind = kind;
        self
    }

    /// Adds one entry
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the source holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ConfigSource for MapSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn kind(&self) -> SourceKind {
        self.kind
    }
}
