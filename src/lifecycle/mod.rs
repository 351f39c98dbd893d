//! Test lifecycle integration
//!
//! A test-execution adapter reports lifecycle events to a [`ListenerChain`]:
//!
//! ```text
//! suite-start
//!   context-start
//!     test-start -> before-invocation -> after-invocation -> test-success|failure|skipped|timeout
//!   context-finish
//! suite-finish
//! ```
//!
//! The chain delivers each event to its listeners in ascending priority
//! order. Negative priorities run before the [`CoreListener`] (priority 0),
//! positive ones after it. The core listener maintains the engine's
//! [`DynamicParameterSource`](crate::params::DynamicParameterSource).
//!
//! # Example
//!
//! ```rust
//! use keystone::core::ConfigEngine;
//! use keystone::lifecycle::{ListenerChain, MethodInfo, PluginRegistry, TestContextInfo};
//! use std::sync::Arc;
//!
//! let engine = Arc::new(ConfigEngine::new());
//! let chain = ListenerChain::new(Arc::clone(&engine), PluginRegistry::new());
//!
//! let context = TestContextInfo::new("login-tests").with_parameter("browser", "chrome");
//! let method = MethodInfo::new("login-1")
//!     .in_context("login-tests")
//!     .with_parameter("browser", "firefox");
//!
//! chain.on_context_start(&context);
//! chain.before_invocation(&method);
//! assert_eq!(engine.get("browser").as_deref(), Some("firefox"));
//!
//! chain.after_invocation(&method);
//! assert_eq!(engine.get("browser").as_deref(), Some("chrome"));
//! ```

pub mod chain;
pub mod core_listener;
pub mod events;
pub mod guard;
pub mod listener;
pub mod registry;

pub use chain::{DispatchReport, ListenerChain, ListenerFailure};
pub use core_listener::CoreListener;
pub use events::{LifecycleEvent, MethodInfo, Parameters, SuiteInfo, TestContextInfo, TestInfo};
pub use guard::{current_origin, Origin};
pub use listener::LifecycleListener;
pub use registry::PluginRegistry;
