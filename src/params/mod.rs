//! Test-runner parameters
//!
//! A [`DynamicParameterSource`] holds three tiers of parameters fed by the
//! lifecycle listener chain:
//!
//! - **suite** - shared by every thread for the whole run
//! - **test** - one map per test context, visible to threads that activated it
//! - **method** - one map per method invocation, visible likewise
//!
//! Lookup order is method, then test, then suite. The source is volatile:
//! the engine consults it live at chain slot 0 and never caches its answers.

pub mod context;
pub mod source;
pub mod tiers;

pub use context::ActiveContext;
pub use source::DynamicParameterSource;
pub use tiers::{ParameterTiers, Parameters};
