//! Lifecycle event payloads

use super::listener::LifecycleListener;
use crate::domain::Result;
pub use crate::params::Parameters;
use serde::{Deserialize, Serialize};

/// A test suite
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteInfo {
    /// Suite name
    pub name: String,
    /// Suite-level parameters
    #[serde(default)]
    pub parameters: Parameters,
}

impl SuiteInfo {
    /// Creates a suite without parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Parameters::new(),
        }
    }

    /// Adds a parameter
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

/// A test context (a group of methods sharing parameters)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestContextInfo {
    /// Context identifier, unique within the run
    pub name: String,
    /// Owning suite
    pub suite: Option<String>,
    /// Context-level parameters
    #[serde(default)]
    pub parameters: Parameters,
}

impl TestContextInfo {
    /// Creates a context without parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            suite: None,
            parameters: Parameters::new(),
        }
    }

    /// Records the owning suite
    pub fn in_suite(mut self, suite: impl Into<String>) -> Self {
        self.suite = Some(suite.into());
        self
    }

    /// Adds a parameter
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

/// One method invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodInfo {
    /// Invocation identifier, unique within the run
    pub id: String,
    /// Method name
    pub name: String,
    /// Test context the method runs in
    pub test_context: Option<String>,
    /// Method-level parameters
    #[serde(default)]
    pub parameters: Parameters,
}

impl MethodInfo {
    /// Creates an invocation; `id` doubles as the name
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            test_context: None,
            parameters: Parameters::new(),
        }
    }

    /// Sets a display name distinct from the id
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Records the test context the method runs in
    pub fn in_context(mut self, context: impl Into<String>) -> Self {
        self.test_context = Some(context.into());
        self
    }

    /// Adds a parameter
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

/// A test outcome
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestInfo {
    /// The invocation
    pub method: MethodInfo,
    /// Failure, skip or timeout message
    pub message: Option<String>,
}

impl TestInfo {
    /// Wraps an invocation
    pub fn new(method: MethodInfo) -> Self {
        Self {
            method,
            message: None,
        }
    }

    /// Attaches a message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Every event the listener chain dispatches
#[derive(Debug, Clone, Copy)]
pub enum LifecycleEvent<'a> {
    /// Suite is about to run
    SuiteStart(&'a SuiteInfo),
    /// Suite finished
    SuiteFinish(&'a SuiteInfo),
    /// Test context is about to run
    ContextStart(&'a TestContextInfo),
    /// Test context finished
    ContextFinish(&'a TestContextInfo),
    /// Test is about to run
    TestStart(&'a TestInfo),
    /// Test passed
    TestSuccess(&'a TestInfo),
    /// Test failed
    TestFailure(&'a TestInfo),
    /// Test was skipped
    TestSkipped(&'a TestInfo),
    /// Test timed out
    TestTimeout(&'a TestInfo),
    /// Method is about to be invoked
    BeforeInvocation(&'a MethodInfo),
    /// Method returned
    AfterInvocation(&'a MethodInfo),
}

impl LifecycleEvent<'_> {
    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            LifecycleEvent::SuiteStart(_) => "suite-start",
            LifecycleEvent::SuiteFinish(_) => "suite-finish",
            LifecycleEvent::ContextStart(_) => "context-start",
            LifecycleEvent::ContextFinish(_) => "context-finish",
            LifecycleEvent::TestStart(_) => "test-start",
            LifecycleEvent::TestSuccess(_) => "test-success",
            LifecycleEvent::TestFailure(_) => "test-failure",
            LifecycleEvent::TestSkipped(_) => "test-skipped",
            LifecycleEvent::TestTimeout(_) => "test-timeout",
            LifecycleEvent::BeforeInvocation(_) => "before-invocation",
            LifecycleEvent::AfterInvocation(_) => "after-invocation",
        }
    }

    /// Invokes the handler on `listener` matching this event
    pub fn deliver(&self, listener: &dyn LifecycleListener) -> Result<()> {
        match *self {
            LifecycleEvent::SuiteStart(suite) => listener.on_suite_start(suite),
            LifecycleEvent::SuiteFinish(suite) => listener.on_suite_finish(suite),
            LifecycleEvent::ContextStart(ctx) => listener.on_context_start(ctx),
            LifecycleEvent::ContextFinish(ctx) => listener.on_context_finish(ctx),
            LifecycleEvent::TestStart(test) => listener.on_test_start(test),
            LifecycleEvent::TestSuccess(test) => listener.on_test_success(test),
            LifecycleEvent::TestFailure(test) => listener.on_test_failure(test),
            LifecycleEvent::TestSkipped(test) => listener.on_test_skipped(test),
            LifecycleEvent::TestTimeout(test) => listener.on_test_timeout(test),
            LifecycleEvent::BeforeInvocation(method) => listener.before_invocation(method),
            LifecycleEvent::AfterInvocation(method) => listener.after_invocation(method),
        }
    }
}
