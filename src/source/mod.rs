//! Configuration source contract and bundled sources.
//!
//! Every provider of configuration values implements [`ConfigSource`]. The
//! engine only ever talks to sources through this trait, so file-backed,
//! secret-manager and remote sources plug in the same way as the bundled
//! ones.
//!
//! # Bundled Sources
//!
//! - [`EnvSource`] - process environment variables
//! - [`PropertySource`] - in-process properties settable at runtime
//! - [`MapSource`] - fixed in-memory key/value pairs
//! - [`FileSource`] - TOML, JSON, YAML and dotenv files
//!
//! # Implementing a Source
//!
//! ```rust
//! use keystone::source::ConfigSource;
//!
//! struct Defaults;
//!
//! impl ConfigSource for Defaults {
//!     fn name(&self) -> &str {
//!         "defaults"
//!     }
//!
//!     fn lookup(&self, key: &str) -> Option<String> {
//!         match key {
//!             "http.port" => Some("8080".to_string()),
//!             _ => None,
//!         }
//!     }
//! }
//! ```

pub mod env;
pub mod file;
pub mod map;
pub mod properties;

pub use env::EnvSource;
pub use file::{FileFormat, FileSource};
pub use map::MapSource;
pub use properties::{ProcessProperties, PropertySource};

use std::fmt;

/// Well-known source priorities
///
/// Priorities are only consulted when a source is inserted with
/// [`SourceChain::insert_by_priority`](crate::core::SourceChain::insert_by_priority);
/// higher values land closer to the front of the chain.
pub mod priority {
    /// Default priority for custom sources
    pub const DEFAULT: i32 = 0;
    /// Configuration files
    pub const FILE: i32 = 50;
    /// Process environment
    pub const ENVIRONMENT: i32 = 100;
    /// Process properties
    pub const PROCESS_PROPERTIES: i32 = 200;
    /// Test-runner parameters
    pub const PARAMETERS: i32 = 1000;
}

/// Broad category of a source
///
/// Eager resolution enumerates every key of `Environment` and
/// `ProcessProperties` sources; other kinds only contribute declared keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Process environment variables
    Environment,
    /// In-process properties
    ProcessProperties,
    /// File-backed values
    File,
    /// Test lifecycle parameters
    Parameters,
    /// Anything else
    Custom,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SourceKind::Environment => "environment",
            SourceKind::ProcessProperties => "properties",
            SourceKind::File => "file",
            SourceKind::Parameters => "parameters",
            SourceKind::Custom => "custom",
        };
        f.write_str(label)
    }
}

/// A named, prioritized provider of key/value lookups
pub trait ConfigSource: Send + Sync {
    /// Stable name used in diagnostics and [`ResolvedValue`](crate::core::ResolvedValue)
    fn name(&self) -> &str;

    /// Insertion hint; not re-evaluated once the source is in a chain
    fn priority(&self) -> i32 {
        priority::DEFAULT
    }

    /// Returns the value for `key`, or `None` when this source has none
    fn lookup(&self, key: &str) -> Option<String>;

    /// Every key this source can currently answer
    ///
    /// Sources that cannot enumerate their key space return an empty list.
    fn keys(&self) -> Vec<String> {
        Vec::new()
    }

    /// Category of this source
    fn kind(&self) -> SourceKind {
        SourceKind::Custom
    }

    /// Whether values may change between two lookups of the same key
    ///
    /// A volatile source at the front of the chain is consulted live on
    /// every lookup and its answers are never cached.
    fn is_volatile(&self) -> bool {
        false
    }
}

impl fmt::Debug for dyn ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigSource")
            .field("name", &self.name())
            .field("priority", &self.priority())
            .field("kind", &self.kind())
            .finish()
    }
}
