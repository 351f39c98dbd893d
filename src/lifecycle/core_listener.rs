//! The listener that feeds the parameter source

use super::chain::ListenerChain;
use super::events::{LifecycleEvent, MethodInfo, SuiteInfo, TestContextInfo, TestInfo};
use super::guard::{current_origin, Origin};
use super::listener::LifecycleListener;
use crate::core::ConfigEngine;
use crate::domain::Result;
use crate::params::DynamicParameterSource;
use dashmap::DashSet;
use std::sync::{Arc, OnceLock, Weak};
use std::thread::{self, ThreadId};

/// Owns the [`DynamicParameterSource`] and keeps its tiers in step with
/// the test lifecycle
///
/// The source is created on the first event and placed at chain slot 0 of
/// the engine. A call that does not come through the [`ListenerChain`] is
/// redirected through it, so every listener sees the event exactly once.
pub struct CoreListener {
    engine: Arc<ConfigEngine>,
    chain: Weak<ListenerChain>,
    parameters: OnceLock<Arc<DynamicParameterSource>>,
    // Invocations whose before-invocation event activated the test context
    // on their thread; after-invocation releases it again.
    borrowed: DashSet<(ThreadId, String)>,
}

impl CoreListener {
    /// Listener name
    pub const NAME: &'static str = "keystone-core";

    pub(crate) fn new(engine: Arc<ConfigEngine>, chain: Weak<ListenerChain>) -> Self {
        Self {
            engine,
            chain,
            parameters: OnceLock::new(),
            borrowed: DashSet::new(),
        }
    }

    /// The engine this listener drives
    pub fn engine(&self) -> &Arc<ConfigEngine> {
        &self.engine
    }

    /// The parameter source, if an event has created it yet
    pub fn parameters(&self) -> Option<&Arc<DynamicParameterSource>> {
        self.parameters.get()
    }

    /// Creates the parameter source if needed and moves it to slot 0
    pub fn ensure_parameter_source(&self) -> Arc<DynamicParameterSource> {
        let source = self
            .parameters
            .get_or_init(|| {
                tracing::info!("Dynamic parameter source created");
                Arc::new(DynamicParameterSource::new())
            })
            .clone();
        self.engine.ensure_front(source.clone());
        source
    }

    fn handle(&self, event: LifecycleEvent<'_>) -> Result<()> {
        match current_origin() {
            Origin::Chain => self.apply(event),
            Origin::Direct => match self.chain.upgrade() {
                Some(chain) => {
                    tracing::debug!(event = event.label(), "Redirecting direct call through listener chain");
                    chain.dispatch(event);
                    Ok(())
                }
                None => self.apply(event),
            },
        }
    }

    fn apply(&self, event: LifecycleEvent<'_>) -> Result<()> {
        let parameters = self.ensure_parameter_source();

        match event {
            LifecycleEvent::SuiteStart(suite) => {
                parameters.set_suite_parameters(suite.parameters.clone());
                let resolved = self.engine.resolve_all();
                tracing::info!(suite = %suite.name, resolved, "Suite configuration bootstrapped");
            }
            LifecycleEvent::SuiteFinish(_) => parameters.clear_suite_parameters(),
            LifecycleEvent::ContextStart(context) => {
                parameters.set_test_parameters(&context.name, context.parameters.clone());
            }
            LifecycleEvent::ContextFinish(context) => {
                parameters.clear_test_parameters(&context.name);
            }
            LifecycleEvent::BeforeInvocation(method) => {
                if let Some(context) = &method.test_context {
                    if parameters.activate_test(context) {
                        self.borrowed.insert((thread::current().id(), method.id.clone()));
                    }
                }
                parameters.set_method_parameters(&method.id, method.parameters.clone());
            }
            LifecycleEvent::AfterInvocation(method) => {
                parameters.clear_method_parameters(&method.id);
                let borrowed = self
                    .borrowed
                    .remove(&(thread::current().id(), method.id.clone()))
                    .is_some();
                if let (true, Some(context)) = (borrowed, &method.test_context) {
                    parameters.release_test(context);
                }
            }
            LifecycleEvent::TestStart(_)
            | LifecycleEvent::TestSuccess(_)
            | LifecycleEvent::TestFailure(_)
            | LifecycleEvent::TestSkipped(_)
            | LifecycleEvent::TestTimeout(_) => {}
        }
        Ok(())
    }
}

impl std::fmt::Debug for CoreListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreListener")
            .field("parameters", &self.parameters.get().is_some())
            .field("borrowed", &self.borrowed.len())
            .finish()
    }
}

impl LifecycleListener for CoreListener {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> i32 {
        0
    }

    fn on_suite_start(&self, suite: &SuiteInfo) -> Result<()> {
        self.handle(LifecycleEvent::SuiteStart(suite))
    }

    fn on_suite_finish(&self, suite: &SuiteInfo) -> Result<()> {
        self.handle(LifecycleEvent::SuiteFinish(suite))
    }

    fn on_context_start(&self, context: &TestContextInfo) -> Result<()> {
        self.handle(LifecycleEvent::ContextStart(context))
    }

    fn on_context_finish(&self, context: &TestContextInfo) -> Result<()> {
        self.handle(LifecycleEvent::ContextFinish(context))
    }

    fn on_test_start(&self, test: &TestInfo) -> Result<()> {
        self.handle(LifecycleEvent::TestStart(test))
    }

    fn on_test_success(&self, test: &TestInfo) -> Result<()> {
        self.handle(LifecycleEvent::TestSuccess(test))
    }

    fn on_test_failure(&self, test: &TestInfo) -> Result<()> {
        self.handle(LifecycleEvent::TestFailure(test))
    }

    fn on_test_skipped(&self, test: &TestInfo) -> Result<()> {
        self.handle(LifecycleEvent::TestSkipped(test))
    }

    fn on_test_timeout(&self, test: &TestInfo) -> Result<()> {
        self.handle(LifecycleEvent::TestTimeout(test))
    }

    fn before_invocation(&self, method: &MethodInfo) -> Result<()> {
        self.handle(LifecycleEvent::BeforeInvocation(method))
    }

    fn after_invocation(&self, method: &MethodInfo) -> Result<()> {
        self.handle(LifecycleEvent::AfterInvocation(method))
    }
}
