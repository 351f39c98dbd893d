//! Explicit plugin registration

use super::listener::LifecycleListener;
use std::fmt;
use std::sync::Arc;

type ListenerFactory = Box<dyn Fn() -> Arc<dyn LifecycleListener> + Send + Sync>;

/// Listeners to install next to the core listener
///
/// Plugins are registered explicitly, either as ready instances or as
/// factories invoked once when the chain initializes.
///
/// ```rust
/// use keystone::lifecycle::{LifecycleListener, PluginRegistry};
/// use std::sync::Arc;
///
/// struct Audit;
///
/// impl LifecycleListener for Audit {
///     fn name(&self) -> &str {
///         "audit"
///     }
/// }
///
/// let mut plugins = PluginRegistry::new();
/// plugins.register(Arc::new(Audit));
/// plugins.register_factory(|| -> Arc<dyn LifecycleListener> { Arc::new(Audit) });
/// assert_eq!(plugins.len(), 2);
/// ```
#[derive(Default)]
pub struct PluginRegistry {
    factories: Vec<ListenerFactory>,
}

impl PluginRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener instance
    pub fn register(&mut self, listener: Arc<dyn LifecycleListener>) -> &mut Self {
        self.factories.push(Box::new(move || Arc::clone(&listener)));
        self
    }

    /// Registers a factory called once at chain initialization
    pub fn register_factory<F>(&mut self, factory: F) -> &mut Self
    where
        F: Fn() -> Arc<dyn LifecycleListener> + Send + Sync + 'static,
    {
        self.factories.push(Box::new(factory));
        self
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, listener: Arc<dyn LifecycleListener>) -> Self {
        self.register(listener);
        self
    }

    /// Creates every registered listener, in registration order
    pub fn instantiate(&self) -> Vec<Arc<dyn LifecycleListener>> {
        self.factories.iter().map(|factory| factory()).collect()
    }

    /// Number of registered plugins
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether no plugin is registered
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.factories.len())
            .finish()
    }
}
