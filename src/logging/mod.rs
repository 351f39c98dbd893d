//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output filtered by level or `RUST_LOG`
//! - JSON-formatted logs written to rolling files
//!
//! # Example
//!
//! ```no_run
//! use keystone::logging::init_logging;
//! use keystone::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("debug", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(key = "browser", "Resolving");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the registration of a source in the chain
///
/// # Example
///
/// ```no_run
/// use keystone::log_source_registered;
/// use keystone::source::{ConfigSource, MapSource};
///
/// let source = MapSource::new("defaults");
/// log_source_registered!(source, 2);
/// ```
#[macro_export]
macro_rules! log_source_registered {
    ($source:expr, $index:expr) => {
        tracing::info!(
            source = %$source.name(),
            kind = %$source.kind(),
            priority = $source.priority(),
            index = $index,
            "Source registered"
        );
    };
}

/// Log a listener that failed while handling an event
///
/// # Example
///
/// ```no_run
/// use keystone::log_listener_failure;
///
/// log_listener_failure!("audit", "suite-start", "database unavailable");
/// ```
#[macro_export]
macro_rules! log_listener_failure {
    ($listener:expr, $event:expr, $message:expr) => {
        tracing::warn!(
            listener = %$listener,
            event = $event,
            error = %$message,
            "Lifecycle listener failed"
        );
    };
}
