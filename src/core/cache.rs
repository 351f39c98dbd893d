//! Resolved value cache
//!
//! A missing entry means "not yet attempted"; [`CacheEntry::Absent`] means
//! "attempted, no source had a value". The `complete` flag is only ever set
//! by eager resolution.

use crate::source::ConfigSource;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;

/// A value together with the source that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedValue {
    /// Raw string value
    pub value: String,
    /// Name of the source that answered
    pub source_name: String,
    /// Priority that source reported
    pub source_priority: i32,
}

impl ResolvedValue {
    /// Records `value` as coming from `source`
    pub fn new(value: String, source: &dyn ConfigSource) -> Self {
        Self {
            value,
            source_name: source.name().to_string(),
            source_priority: source.priority(),
        }
    }
}

/// Outcome of a resolution attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry {
    /// Some source had a value
    Present(ResolvedValue),
    /// No source had a value
    Absent,
}

impl From<Option<ResolvedValue>> for CacheEntry {
    fn from(outcome: Option<ResolvedValue>) -> Self {
        match outcome {
            Some(value) => CacheEntry::Present(value),
            None => CacheEntry::Absent,
        }
    }
}

impl CacheEntry {
    /// Converts back into an optional value
    pub fn into_value(self) -> Option<ResolvedValue> {
        match self {
            CacheEntry::Present(value) => Some(value),
            CacheEntry::Absent => None,
        }
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    complete: bool,
}

/// Thread-safe cache of resolution outcomes
#[derive(Debug, Default)]
pub struct ResolvedCache {
    state: RwLock<CacheState>,
}

impl ResolvedCache {
    /// Creates an empty, incomplete cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached outcome for `key`; `None` if never attempted
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.state.read().entries.get(key).cloned()
    }

    /// Records the outcome for `key`
    pub fn insert(&self, key: impl Into<String>, entry: CacheEntry) {
        self.state.write().entries.insert(key.into(), entry);
    }

    /// Records many outcomes and marks the cache complete
    pub fn fill_complete(&self, entries: impl IntoIterator<Item = (String, CacheEntry)>) {
        let mut state = self.state.write();
        state.entries.extend(entries);
        state.complete = true;
    }

    /// Drops every entry and the complete flag
    pub fn clear(&self) {
        let mut state = self.state.write();
        state.entries.clear();
        state.complete = false;
    }

    /// Whether eager resolution has populated the cache
    pub fn is_complete(&self) -> bool {
        self.state.read().complete
    }

    /// Number of cached outcomes, present or absent
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }

    /// Present values, sorted by key
    pub fn present_values(&self) -> Vec<(String, ResolvedValue)> {
        let state = self.state.read();
        let mut values: Vec<(String, ResolvedValue)> = state
            .entries
            .iter()
            .filter_map(|(key, entry)| match entry {
                CacheEntry::Present(value) => Some((key.clone(), value.clone())),
                CacheEntry::Absent => None,
            })
            .collect();
        values.sort_by(|a, b| a.0.cmp(&b.0));
        values
    }
}
