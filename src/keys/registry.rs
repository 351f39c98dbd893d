//! Registry of declared keys

use super::definition::KeyDefinition;
use crate::domain::Result;
use regex::Regex;
use std::collections::BTreeMap;

/// Explicit table of declared keys plus sensitive-name patterns
///
/// Keys are kept sorted by name so listings are stable.
///
/// ```rust
/// use keystone::keys::{KeyDefinition, KeyRegistry};
///
/// # fn example() -> keystone::domain::Result<()> {
/// let registry = KeyRegistry::new()
///     .with_key(KeyDefinition::new("browser").with_default("chrome"))
///     .with_sensitive_pattern("(?i)password")?;
///
/// assert!(registry.is_sensitive("db.PASSWORD"));
/// assert_eq!(registry.default_for("browser"), Some("chrome"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeyRegistry {
    keys: BTreeMap<String, KeyDefinition>,
    sensitive_patterns: Vec<Regex>,
}

impl KeyRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key, builder style
    pub fn with_key(mut self, key: KeyDefinition) -> Self {
        self.register(key);
        self
    }

    /// Adds a sensitive-name pattern, builder style
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the pattern does not compile
    pub fn with_sensitive_pattern(mut self, pattern: &str) -> Result<Self> {
        self.sensitive_patterns.push(Regex::new(pattern)?);
        Ok(self)
    }

    /// Adds or replaces a key, returning the previous declaration
    pub fn register(&mut self, key: KeyDefinition) -> Option<KeyDefinition> {
        let previous = self.keys.insert(key.name().to_string(), key);
        if let Some(ref old) = previous {
            tracing::warn!(key = %old.name(), "Key declaration replaced");
        }
        previous
    }

    /// Declaration for `name`
    pub fn get(&self, name: &str) -> Option<&KeyDefinition> {
        self.keys.get(name)
    }

    /// Static default for `name`
    pub fn default_for(&self, name: &str) -> Option<&str> {
        self.keys.get(name).and_then(|k| k.default_value())
    }

    /// Whether `name` is flagged sensitive or matches a sensitive pattern
    pub fn is_sensitive(&self, name: &str) -> bool {
        if self.keys.get(name).is_some_and(|k| k.is_sensitive()) {
            return true;
        }
        self.sensitive_patterns.iter().any(|p| p.is_match(name))
    }

    /// Names of all declared keys, sorted
    pub fn names(&self) -> Vec<String> {
        self.keys.keys().cloned().collect()
    }

    /// Declarations marked required
    pub fn required(&self) -> impl Iterator<Item = &KeyDefinition> {
        self.keys.values().filter(|k| k.is_required())
    }

    /// All declarations, sorted by name
    pub fn iter(&self) -> impl Iterator<Item = &KeyDefinition> {
        self.keys.values()
    }

    /// Number of declared keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no key is declared
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
