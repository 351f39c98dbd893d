//! Suite, test and method parameter tiers

use super::context::ActiveContext;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};

/// Parameter map as declared by the test runner
pub type Parameters = HashMap<String, String>;

/// Three-tier parameter storage shared by every thread
///
/// The suite tier is global. Test and method tiers are keyed by context id;
/// which entry a thread sees depends on its [`ActiveContext`].
#[derive(Debug, Default)]
pub struct ParameterTiers {
    suite: RwLock<Parameters>,
    tests: DashMap<String, Parameters>,
    methods: DashMap<String, Parameters>,
}

impl ParameterTiers {
    /// Creates empty tiers
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges into the suite tier
    pub fn merge_suite(&self, parameters: Parameters) {
        self.suite.write().extend(parameters);
    }

    /// Empties the suite tier
    pub fn clear_suite(&self) {
        self.suite.write().clear();
    }

    /// Merges into the tier of test context `id`
    pub fn merge_test(&self, id: &str, parameters: Parameters) {
        self.tests.entry(id.to_string()).or_default().extend(parameters);
    }

    /// Drops the tier of test context `id`
    pub fn clear_test(&self, id: &str) -> bool {
        self.tests.remove(id).is_some()
    }

    /// Merges into the tier of method context `id`
    pub fn merge_method(&self, id: &str, parameters: Parameters) {
        self.methods
            .entry(id.to_string())
            .or_default()
            .extend(parameters);
    }

    /// Drops the tier of method context `id`
    pub fn clear_method(&self, id: &str) -> bool {
        self.methods.remove(id).is_some()
    }

    /// Value for `key` as seen from `context`: method, then test, then suite
    pub fn lookup(&self, context: &ActiveContext, key: &str) -> Option<String> {
        if let Some(method) = &context.method {
            if let Some(value) = self.methods.get(method).and_then(|m| m.get(key).cloned()) {
                return Some(value);
            }
        }
        if let Some(test) = &context.test {
            if let Some(value) = self.tests.get(test).and_then(|t| t.get(key).cloned()) {
                return Some(value);
            }
        }
        self.suite.read().get(key).cloned()
    }

    /// Every key visible from `context`, sorted
    pub fn visible_keys(&self, context: &ActiveContext) -> Vec<String> {
        let mut keys: BTreeSet<String> = self.suite.read().keys().cloned().collect();
        if let Some(test) = context.test.as_ref().and_then(|id| self.tests.get(id)) {
            keys.extend(test.keys().cloned());
        }
        if let Some(method) = context.method.as_ref().and_then(|id| self.methods.get(id)) {
            keys.extend(method.keys().cloned());
        }
        keys.into_iter().collect()
    }

    /// Number of live test tiers
    pub fn test_count(&self) -> usize {
        self.tests.len()
    }

    /// Number of live method tiers
    pub fn method_count(&self) -> usize {
        self.methods.len()
    }
}
