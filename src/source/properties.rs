//! In-process property source
//!
//! Properties are key/value pairs set by the host application at runtime,
//! the in-process counterpart of environment variables. The store is a
//! cheaply cloneable handle so the engine and the application can share it.

use super::{priority, ConfigSource, SourceKind};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Shared, thread-safe property store
#[derive(Debug, Clone, Default)]
pub struct ProcessProperties {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl ProcessProperties {
    /// Creates an empty property store
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property, returning the previous value
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.inner.write().insert(key.into(), value.into())
    }

    /// Removes a property, returning the previous value
    pub fn remove(&self, key: &str) -> Option<String> {
        self.inner.write().remove(key)
    }

    /// Returns a property value
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.read().get(key).cloned()
    }

    /// Returns all property names
    pub fn keys(&self) -> Vec<String> {
        self.inner.read().keys().cloned().collect()
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether no property is set
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

/// [`ConfigSource`] view over a [`ProcessProperties`] store
#[derive(Debug, Clone)]
pub struct PropertySource {
    properties: ProcessProperties,
}

impl PropertySource {
    /// Creates a source reading from `properties`
    pub fn new(properties: ProcessProperties) -> Self {
        Self { properties }
    }

    /// The underlying store
    pub fn properties(&self) -> &ProcessProperties {
        &self.properties
    }
}

impl ConfigSource for PropertySource {
    fn name(&self) -> &str {
        "properties"
    }

    fn priority(&self) -> i32 {
        priority::PROCESS_PROPERTIES
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.properties.get(key)
    }

    fn keys(&self) -> Vec<String> {
        self.properties.keys()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::ProcessProperties
    }
}
