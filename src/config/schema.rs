//! Settings schema types
//!
//! Settings configure the engine itself: which files to register, which keys
//! are declared, how masking works, and where logs go. They are distinct from
//! the configuration values the engine resolves.

use crate::source::FileFormat;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Root settings structure, mapped from `keystone.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeystoneSettings {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationSettings,

    /// File sources registered at startup, in declaration order
    #[serde(default)]
    pub sources: Vec<FileSourceSettings>,

    /// Declared configuration keys
    #[serde(default)]
    pub keys: Vec<KeySettings>,

    /// Masking and coercion settings
    #[serde(default)]
    pub masking: MaskingSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl KeystoneSettings {
    /// Validates the settings
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value found
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;

        for (index, source) in self.sources.iter().enumerate() {
            source
                .validate()
                .map_err(|e| format!("sources[{index}]: {e}"))?;
        }

        let mut seen = HashSet::new();
        for key in &self.keys {
            key.validate()?;
            if !seen.insert(key.name.as_str()) {
                return Err(format!("key '{}' is declared more than once", key.name));
            }
        }

        self.masking.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Resolve every interesting key on the first lookup after a chain change
    #[serde(default = "default_eager_resolution")]
    pub eager_resolution: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_eager_resolution() -> bool {
    true
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            eager_resolution: default_eager_resolution(),
        }
    }
}

impl ApplicationSettings {
    fn validate(&self) -> Result<(), String> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "log_level must be one of: {}, got: {}",
                LEVELS.join(", "),
                self.log_level
            ));
        }
        Ok(())
    }
}

/// One file source to register at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSourceSettings {
    /// Path to the file
    pub path: String,

    /// Grammar; guessed from the extension when omitted
    #[serde(default)]
    pub format: Option<FileFormat>,

    /// Insertion priority; files default to `priority::FILE`
    #[serde(default)]
    pub priority: Option<i32>,

    /// Skip silently when the file does not exist
    #[serde(default)]
    pub optional: bool,
}

impl FileSourceSettings {
    fn validate(&self) -> Result<(), String> {
        if self.path.trim().is_empty() {
            return Err("path cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Declaration of one configuration key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeySettings {
    /// Key name as looked up in sources
    pub name: String,

    /// Static default applied when no source has a value
    #[serde(default)]
    pub default: Option<String>,

    /// Never display or log the raw value
    #[serde(default)]
    pub sensitive: bool,

    /// Must resolve to a value (or have a default)
    #[serde(default)]
    pub required: bool,

    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
}

impl KeySettings {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("key name cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Masking and coercion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskingSettings {
    /// Token shown instead of sensitive values
    #[serde(default = "default_redaction_token")]
    pub redaction_token: String,

    /// Regexes; keys whose names match are treated as sensitive
    #[serde(default)]
    pub sensitive_patterns: Vec<String>,

    /// Delimiter used by list accessors
    #[serde(default = "default_list_delimiter")]
    pub list_delimiter: String,
}

fn default_redaction_token() -> String {
    crate::typed::REDACTION_TOKEN.to_string()
}

fn default_list_delimiter() -> String {
    ",".to_string()
}

impl Default for MaskingSettings {
    fn default() -> Self {
        Self {
            redaction_token: default_redaction_token(),
            sensitive_patterns: Vec::new(),
            list_delimiter: default_list_delimiter(),
        }
    }
}

impl MaskingSettings {
    fn validate(&self) -> Result<(), String> {
        if self.redaction_token.is_empty() {
            return Err("redaction_token cannot be empty".to_string());
        }
        if self.list_delimiter.is_empty() {
            return Err("list_delimiter cannot be empty".to_string());
        }
        for pattern in &self.sensitive_patterns {
            regex::Regex::new(pattern)
                .map_err(|e| format!("invalid sensitive pattern '{pattern}': {e}"))?;
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to rolling files
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Rotation: daily, hourly or never
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        const ROTATIONS: [&str; 3] = ["daily", "hourly", "never"];
        if !ROTATIONS.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "local_rotation must be one of: {}, got: {}",
                ROTATIONS.join(", "),
                self.local_rotation
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("local_path cannot be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}
