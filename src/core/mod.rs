//! Core resolution logic for Keystone.
//!
//! # Modules
//!
//! - [`chain`] - Ordered source chain with index and priority insertion
//! - [`cache`] - Resolved-value cache distinguishing "absent" from "untried"
//! - [`engine`] - The [`ConfigEngine`] tying chain, cache and keys together
//!
//! # Example
//!
//! ```rust
//! use keystone::core::ConfigEngine;
//! use keystone::keys::{KeyDefinition, KeyRegistry};
//! use keystone::source::MapSource;
//! use std::sync::Arc;
//!
//! let keys = KeyRegistry::new().with_key(KeyDefinition::new("timeout").with_default("30s"));
//! let engine = ConfigEngine::builder().keys(keys).build();
//! engine.append_source(Arc::new(MapSource::new("overrides").with_entry("retries", "3")));
//!
//! assert_eq!(engine.get("retries").as_deref(), Some("3"));
//! assert_eq!(engine.get_string("timeout").as_deref(), Some("30s"));
//! ```

pub mod cache;
pub mod chain;
pub mod engine;

pub use cache::{CacheEntry, ResolvedCache, ResolvedValue};
pub use chain::SourceChain;
pub use engine::{ConfigEngine, EngineBuilder, EngineOptions};
