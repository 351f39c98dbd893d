// Keystone - Layered Configuration Resolver
// Copyright (c) 2025 Keystone Contributors
// Licensed under the MIT License

//! # Keystone - Layered Configuration Resolver
//!
//! Keystone resolves configuration values by querying an ordered chain of
//! sources and returning the first value found. It is built for test
//! automation: test-runner parameters for the current suite, test context
//! and method take precedence over everything else, per thread.
//!
//! ## Overview
//!
//! - **Sources** implement [`source::ConfigSource`]. Process properties and
//!   environment variables are always present; files and custom sources are
//!   added at runtime.
//! - **The engine** ([`core::ConfigEngine`]) walks the chain, caches
//!   outcomes, and invalidates the cache whenever the chain changes.
//! - **Typed accessors** ([`typed`]) convert values to integers, booleans,
//!   durations and lists, apply declared defaults, and mask sensitive keys.
//! - **Parameters** ([`params`]) hold suite, test and method parameters
//!   scoped to the calling thread.
//! - **Lifecycle** ([`lifecycle`]) connects a test runner to the parameter
//!   source through a priority-ordered listener chain.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Engine settings, loaded from TOML
//! - [`core`] - Source chain, cache and resolution engine
//! - [`domain`] - Error types
//! - [`keys`] - Key declarations
//! - [`lifecycle`] - Listener chain and core listener
//! - [`logging`] - Structured logging
//! - [`params`] - Thread-scoped parameter source
//! - [`source`] - Source contract and bundled sources
//! - [`typed`] - Typed accessors and masking
//!
//! ## Quick Start
//!
//! ```rust
//! use keystone::core::ConfigEngine;
//! use keystone::keys::{KeyDefinition, KeyRegistry};
//! use keystone::source::MapSource;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # fn main() -> keystone::domain::Result<()> {
//! let keys = KeyRegistry::new()
//!     .with_key(KeyDefinition::new("http.timeout").with_default("30s"))
//!     .with_key(KeyDefinition::new("db.password").sensitive());
//!
//! let engine = ConfigEngine::builder().keys(keys).build();
//! engine.append_source(Arc::new(
//!     MapSource::new("defaults").with_entry("db.password", "hunter2"),
//! ));
//!
//! assert_eq!(engine.get_duration("http.timeout")?, Some(Duration::from_secs(30)));
//! assert_eq!(engine.display("db.password"), "[REDACTED]");
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Keystone uses the [`domain::KeystoneError`] type for all errors. Absent
//! values are `None`, never an error and never an empty string.
//!
//! ## Logging
//!
//! Keystone emits structured events with the `tracing` crate; install a
//! subscriber with [`logging::init_logging`] or your own.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod keys;
pub mod lifecycle;
pub mod logging;
pub mod params;
pub mod source;
pub mod typed;
