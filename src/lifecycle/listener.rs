//! Lifecycle listener contract

use super::events::{MethodInfo, SuiteInfo, TestContextInfo, TestInfo};
use crate::domain::Result;

/// Observer of test-runner lifecycle events
///
/// Every handler defaults to a no-op. Listeners run in ascending
/// [`priority`](Self::priority) order: negative values run before the core
/// listener, positive values after it.
///
/// ```rust
/// use keystone::domain::Result;
/// use keystone::lifecycle::{LifecycleListener, TestInfo};
///
/// struct FailureReporter;
///
/// impl LifecycleListener for FailureReporter {
///     fn name(&self) -> &str {
///         "failure-reporter"
///     }
///
///     fn priority(&self) -> i32 {
///         10
///     }
///
///     fn on_test_failure(&self, test: &TestInfo) -> Result<()> {
///         eprintln!("{} failed", test.method.name);
///         Ok(())
///     }
/// }
/// ```
pub trait LifecycleListener: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Ordering key, lower runs first
    fn priority(&self) -> i32 {
        0
    }

    /// Suite is about to run
    fn on_suite_start(&self, _suite: &SuiteInfo) -> Result<()> {
        Ok(())
    }

    /// Suite finished
    fn on_suite_finish(&self, _suite: &SuiteInfo) -> Result<()> {
        Ok(())
    }

    /// Test context is about to run
    fn on_context_start(&self, _context: &TestContextInfo) -> Result<()> {
        Ok(())
    }

    /// Test context finished
    fn on_context_finish(&self, _context: &TestContextInfo) -> Result<()> {
        Ok(())
    }

    /// Test is about to run
    fn on_test_start(&self, _test: &TestInfo) -> Result<()> {
        Ok(())
    }

    /// Test passed
    fn on_test_success(&self, _test: &TestInfo) -> Result<()> {
        Ok(())
    }

    /// Test failed
    fn on_test_failure(&self, _test: &TestInfo) -> Result<()> {
        Ok(())
    }

    /// Test was skipped
    fn on_test_skipped(&self, _test: &TestInfo) -> Result<()> {
        Ok(())
    }

    /// Test timed out
    fn on_test_timeout(&self, _test: &TestInfo) -> Result<()> {
        Ok(())
    }

    /// Method is about to be invoked
    fn before_invocation(&self, _method: &MethodInfo) -> Result<()> {
        Ok(())
    }

    /// Method returned
    fn after_invocation(&self, _method: &MethodInfo) -> Result<()> {
        Ok(())
    }
}
