//! Environment variable source

use super::{priority, ConfigSource, SourceKind};

/// Reads values from the process environment
///
/// A lookup first tries the key verbatim, then its relaxed form: dots and
/// dashes become underscores and letters are upper-cased, so `http.port`
/// also matches `HTTP_PORT`. An optional prefix is prepended to the relaxed
/// form only.
///
/// Without a prefix, a key that has no dot or dash is only looked up
/// verbatim. Otherwise `user` would pick up `$USER` and shadow lower
/// sources that actually define `user`.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    prefix: Option<String>,
}

impl EnvSource {
    /// Creates an environment source without a prefix
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an environment source whose relaxed lookups use `prefix`
    ///
    /// ```rust
    /// use keystone::source::{ConfigSource, EnvSource};
    ///
    /// let source = EnvSource::with_prefix("MYAPP_");
    /// // "http.port" is looked up as "http.port", then "MYAPP_HTTP_PORT"
    /// let _ = source.lookup("http.port");
    /// ```
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    /// Relaxed environment variable name for `key`
    pub fn relaxed_name(&self, key: &str) -> String {
        let relaxed: String = key
            .chars()
            .map(|c| match c {
                '.' | '-' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect();
        match &self.prefix {
            Some(prefix) => format!("{prefix}{relaxed}"),
            None => relaxed,
        }
    }
}

impl ConfigSource for EnvSource {
    fn name(&self) -> &str {
        "environment"
    }

    fn priority(&self) -> i32 {
        priority::ENVIRONMENT
    }

    fn lookup(&self, key: &str) -> Option<String> {
        if let Ok(value) = std::env::var(key) {
            return Some(value);
        }
        if self.prefix.is_none() && !key.contains(['.', '-']) {
            return None;
        }
        let relaxed = self.relaxed_name(key);
        if relaxed != key {
            if let Ok(value) = std::env::var(&relaxed) {
                return Some(value);
            }
        }
        None
    }

    fn keys(&self) -> Vec<String> {
        // Non-unicode variables cannot be represented as keys.
        std::env::vars_os()
            .filter_map(|(k, _)| k.into_string().ok())
            .collect()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Environment
    }
}
