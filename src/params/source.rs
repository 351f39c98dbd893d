//! Dynamic parameter source

use super::context::{self, ActiveContext};
use super::tiers::{ParameterTiers, Parameters};
use crate::source::{priority, ConfigSource, SourceKind};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// Source answering from suite, test and method parameters
///
/// Lookups depend on the calling thread: each thread only sees the test and
/// method tiers it activated itself. The suite tier is shared.
///
/// ```rust
/// use keystone::params::DynamicParameterSource;
/// use keystone::source::ConfigSource;
/// use std::collections::HashMap;
///
/// let params = DynamicParameterSource::new();
/// params.set_suite_parameters(HashMap::from([("browser".to_string(), "chrome".to_string())]));
/// params.set_method_parameters("login", HashMap::from([("browser".to_string(), "firefox".to_string())]));
///
/// assert_eq!(params.lookup("browser").as_deref(), Some("firefox"));
/// params.clear_method_parameters("login");
/// assert_eq!(params.lookup("browser").as_deref(), Some("chrome"));
/// ```
#[derive(Debug)]
pub struct DynamicParameterSource {
    id: u64,
    tiers: ParameterTiers,
}

impl Default for DynamicParameterSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DynamicParameterSource {
    /// Source name reported in resolved values
    pub const NAME: &'static str = "parameters";

    /// Creates a source with empty tiers
    pub fn new() -> Self {
        Self {
            id: NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed),
            tiers: ParameterTiers::new(),
        }
    }

    /// Merges suite-wide parameters
    pub fn set_suite_parameters(&self, parameters: Parameters) {
        tracing::debug!(count = parameters.len(), "Suite parameters set");
        self.tiers.merge_suite(parameters);
    }

    /// Merges parameters for test context `id` and activates it on the
    /// calling thread
    pub fn set_test_parameters(&self, id: &str, parameters: Parameters) {
        tracing::debug!(test = id, count = parameters.len(), "Test parameters set");
        self.tiers.merge_test(id, parameters);
        self.activate_test(id);
    }

    /// Merges parameters for method context `id` and activates it on the
    /// calling thread
    pub fn set_method_parameters(&self, id: &str, parameters: Parameters) {
        tracing::debug!(method = id, count = parameters.len(), "Method parameters set");
        self.tiers.merge_method(id, parameters);
        self.activate_method(id);
    }

    /// Makes `id` the calling thread's active test context
    ///
    /// Returns `false` when `id` was already active on this thread.
    pub fn activate_test(&self, id: &str) -> bool {
        let mut changed = false;
        context::update(self.id, |ctx| {
            if ctx.test.as_deref() != Some(id) {
                ctx.test = Some(id.to_string());
                changed = true;
            }
        });
        changed
    }

    /// Clears the calling thread's test pointer if it points at `id`,
    /// leaving the test tier itself in place
    pub fn release_test(&self, id: &str) {
        context::update(self.id, |ctx| {
            if ctx.test.as_deref() == Some(id) {
                ctx.test = None;
            }
        });
    }

    /// Makes `id` the calling thread's active method context
    pub fn activate_method(&self, id: &str) {
        context::update(self.id, |ctx| ctx.method = Some(id.to_string()));
    }

    /// Empties the suite tier
    pub fn clear_suite_parameters(&self) {
        self.tiers.clear_suite();
    }

    /// Drops test context `id`
    ///
    /// The calling thread's test pointer is cleared if it pointed at `id`.
    pub fn clear_test_parameters(&self, id: &str) {
        self.tiers.clear_test(id);
        self.release_test(id);
    }

    /// Drops method context `id`
    ///
    /// The calling thread's method pointer is cleared if it pointed at `id`.
    pub fn clear_method_parameters(&self, id: &str) {
        self.tiers.clear_method(id);
        context::update(self.id, |ctx| {
            if ctx.method.as_deref() == Some(id) {
                ctx.method = None;
            }
        });
    }

    /// The calling thread's active contexts
    pub fn active_context(&self) -> ActiveContext {
        context::current(self.id)
    }

    /// Value for `key` as seen from an explicit context
    pub fn lookup_in(&self, context: &ActiveContext, key: &str) -> Option<String> {
        self.tiers.lookup(context, key)
    }

    /// Underlying tier storage
    pub fn tiers(&self) -> &ParameterTiers {
        &self.tiers
    }
}

impl ConfigSource for DynamicParameterSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> i32 {
        priority::PARAMETERS
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.lookup_in(&self.active_context(), key)
    }

    fn keys(&self) -> Vec<String> {
        self.tiers.visible_keys(&self.active_context())
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Parameters
    }

    fn is_volatile(&self) -> bool {
        true
    }
}

impl Drop for DynamicParameterSource {
    fn drop(&mut self) {
        // Only the dropping thread's entry can be reached from here.
        context::forget(self.id);
    }
}
