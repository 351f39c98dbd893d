//! Domain error types
//!
//! This module defines the error hierarchy for Keystone. Errors carry plain
//! strings and never expose third-party parser or I/O types.

use thiserror::Error;

/// Main Keystone error type
///
/// This is the primary error type used throughout the library.
#[derive(Debug, Error)]
pub enum KeystoneError {
    /// A file or remote source could not be loaded at registration time
    #[error("Failed to load source '{source_name}': {message}")]
    SourceLoad {
        /// Name of the source that failed
        source_name: String,
        /// What went wrong
        message: String,
    },

    /// A resolved string could not be converted to the requested type
    ///
    /// `value` is already redacted when the key is sensitive.
    #[error("Cannot convert value '{value}' of key '{key}' to {target}")]
    Coercion {
        /// Key being resolved
        key: String,
        /// Target type name (int, duration, ...)
        target: &'static str,
        /// Raw value, or the redaction token
        value: String,
    },

    /// A required key has neither a value nor a default
    #[error("Required configuration key '{0}' has no value and no default")]
    MissingRequired(String),

    /// A lifecycle listener handler failed
    #[error("Listener '{listener}' failed: {message}")]
    Listener {
        /// Name of the failing listener
        listener: String,
        /// Failure description
        message: String,
    },

    /// Settings-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl KeystoneError {
    /// Creates a source load error
    pub fn source_load(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        KeystoneError::SourceLoad {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Creates a listener failure
    pub fn listener(listener: impl Into<String>, message: impl Into<String>) -> Self {
        KeystoneError::Listener {
            listener: listener.into(),
            message: message.into(),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for KeystoneError {
    fn from(err: std::io::Error) -> Self {
        KeystoneError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for KeystoneError {
    fn from(err: serde_json::Error) -> Self {
        KeystoneError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for KeystoneError {
    fn from(err: toml::de::Error) -> Self {
        KeystoneError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from regex compile errors (sensitive-name patterns)
impl From<regex::Error> for KeystoneError {
    fn from(err: regex::Error) -> Self {
        KeystoneError::Configuration(format!("Invalid pattern: {err}"))
    }
}
