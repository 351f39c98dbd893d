//! Priority-ordered listener chain

use super::core_listener::CoreListener;
use super::events::{LifecycleEvent, MethodInfo, SuiteInfo, TestContextInfo, TestInfo};
use super::guard::DispatchGuard;
use super::listener::LifecycleListener;
use super::registry::PluginRegistry;
use crate::core::ConfigEngine;
use parking_lot::Mutex;
use serde::Serialize;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};

struct Registration {
    listener: Arc<dyn LifecycleListener>,
    priority: i32,
    is_core: bool,
}

/// A listener that failed while handling one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListenerFailure {
    /// Listener name
    pub listener: String,
    /// Event label
    pub event: &'static str,
    /// Error or panic message
    pub message: String,
}

/// Outcome of one dispatch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    /// Listeners whose handler returned `Ok`
    pub delivered: usize,
    /// Listeners whose handler failed or panicked
    pub failures: Vec<ListenerFailure>,
}

impl DispatchReport {
    /// Whether every listener succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Lifecycle listeners sorted by ascending priority
///
/// The chain always contains the [`CoreListener`] at priority 0, which
/// feeds the engine's parameter source. Plugins come from an explicit
/// [`PluginRegistry`] and are installed once, on first dispatch or on
/// [`initialize`](Self::initialize).
///
/// A failing or panicking listener is logged and skipped; the remaining
/// listeners still receive the event.
pub struct ListenerChain {
    core: Arc<CoreListener>,
    plugins: Mutex<Option<PluginRegistry>>,
    registrations: OnceLock<Vec<Registration>>,
}

impl ListenerChain {
    /// Creates a chain driving `engine`
    pub fn new(engine: Arc<ConfigEngine>, plugins: PluginRegistry) -> Arc<Self> {
        Arc::new_cyclic(|chain| Self {
            core: Arc::new(CoreListener::new(engine, chain.clone())),
            plugins: Mutex::new(Some(plugins)),
            registrations: OnceLock::new(),
        })
    }

    /// Installs the core listener and plugins; later calls do nothing
    ///
    /// Returns the number of installed listeners.
    pub fn initialize(&self) -> usize {
        self.registrations().len()
    }

    /// Whether [`initialize`](Self::initialize) has run
    pub fn is_initialized(&self) -> bool {
        self.registrations.get().is_some()
    }

    /// The core listener
    pub fn core(&self) -> &Arc<CoreListener> {
        &self.core
    }

    /// Listener names in dispatch order
    pub fn listener_names(&self) -> Vec<String> {
        self.registrations()
            .iter()
            .map(|r| r.listener.name().to_string())
            .collect()
    }

    fn registrations(&self) -> &[Registration] {
        self.registrations.get_or_init(|| {
            let plugins = self.plugins.lock().take().unwrap_or_default();
            let core: Arc<dyn LifecycleListener> = self.core.clone();

            let mut registrations = vec![Registration {
                priority: core.priority(),
                listener: core,
                is_core: true,
            }];
            registrations.extend(plugins.instantiate().into_iter().map(|listener| {
                Registration {
                    priority: listener.priority(),
                    listener,
                    is_core: false,
                }
            }));
            registrations.sort_by_key(|r| r.priority);

            tracing::info!(
                listeners = registrations.len(),
                plugins = registrations.len() - 1,
                "Listener chain initialized"
            );
            registrations
        })
    }

    /// Delivers `event` to every listener in priority order
    pub fn dispatch(&self, event: LifecycleEvent<'_>) -> DispatchReport {
        let mut report = DispatchReport::default();

        for registration in self.registrations() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                let _guard = registration.is_core.then(DispatchGuard::enter);
                event.deliver(registration.listener.as_ref())
            }));

            let message = match outcome {
                Ok(Ok(())) => {
                    report.delivered += 1;
                    continue;
                }
                Ok(Err(err)) => err.to_string(),
                Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
            };

            let listener = registration.listener.name().to_string();
            crate::log_listener_failure!(listener, event.label(), message);
            report.failures.push(ListenerFailure {
                listener,
                event: event.label(),
                message,
            });
        }

        report
    }

    /// Dispatches suite start
    pub fn on_suite_start(&self, suite: &SuiteInfo) -> DispatchReport {
        self.dispatch(LifecycleEvent::SuiteStart(suite))
    }

    /// Dispatches suite finish
    pub fn on_suite_finish(&self, suite: &SuiteInfo) -> DispatchReport {
        self.dispatch(LifecycleEvent::SuiteFinish(suite))
    }

    /// Dispatches test-context start
    pub fn on_context_start(&self, context: &TestContextInfo) -> DispatchReport {
        self.dispatch(LifecycleEvent::ContextStart(context))
    }

    /// Dispatches test-context finish
    pub fn on_context_finish(&self, context: &TestContextInfo) -> DispatchReport {
        self.dispatch(LifecycleEvent::ContextFinish(context))
    }

    /// Dispatches test start
    pub fn on_test_start(&self, test: &TestInfo) -> DispatchReport {
        self.dispatch(LifecycleEvent::TestStart(test))
    }

    /// Dispatches test success
    pub fn on_test_success(&self, test: &TestInfo) -> DispatchReport {
        self.dispatch(LifecycleEvent::TestSuccess(test))
    }

    /// Dispatches test failure
    pub fn on_test_failure(&self, test: &TestInfo) -> DispatchReport {
        self.dispatch(LifecycleEvent::TestFailure(test))
    }

    /// Dispatches test skipped
    pub fn on_test_skipped(&self, test: &TestInfo) -> DispatchReport {
        self.dispatch(LifecycleEvent::TestSkipped(test))
    }

    /// Dispatches test timeout
    pub fn on_test_timeout(&self, test: &TestInfo) -> DispatchReport {
        self.dispatch(LifecycleEvent::TestTimeout(test))
    }

    /// Dispatches before-invocation
    pub fn before_invocation(&self, method: &MethodInfo) -> DispatchReport {
        self.dispatch(LifecycleEvent::BeforeInvocation(method))
    }

    /// Dispatches after-invocation
    pub fn after_invocation(&self, method: &MethodInfo) -> DispatchReport {
        self.dispatch(LifecycleEvent::AfterInvocation(method))
    }
}

impl std::fmt::Debug for ListenerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerChain")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
