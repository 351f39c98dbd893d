//! CLI command implementations
//!
//! Exit codes shared by every command:
//!
//! | Code | Meaning                                   |
//! |------|-------------------------------------------|
//! | 0    | Success                                   |
//! | 1    | Key not found or required keys missing    |
//! | 2    | Settings or source loading error          |
//! | 3    | Value could not be converted              |

pub mod check;
pub mod dump;
pub mod get;
pub mod sources;

use crate::config::{load_settings, KeystoneSettings};
use crate::core::ConfigEngine;
use std::path::Path;

/// Exit code for settings and source loading errors
pub(crate) const EXIT_SETTINGS: i32 = 2;

/// Loads settings and assembles an engine
///
/// A missing settings file is not an error: the engine then holds only the
/// process properties and environment sources.
pub(crate) fn build_engine(settings_path: &str) -> crate::domain::Result<ConfigEngine> {
    let settings = load_or_default(settings_path)?;
    ConfigEngine::from_settings(&settings)
}

pub(crate) fn load_or_default(settings_path: &str) -> crate::domain::Result<KeystoneSettings> {
    if Path::new(settings_path).exists() {
        load_settings(settings_path)
    } else {
        tracing::warn!(
            settings_path = %settings_path,
            "Settings file not found, using environment and properties only"
        );
        Ok(KeystoneSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_settings_falls_back_to_base_chain() {
        let engine = build_engine("/nonexistent/keystone-settings.toml").unwrap();
        assert_eq!(engine.source_names(), vec!["properties", "environment"]);
    }

    #[test]
    fn test_invalid_settings_is_error() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        std::fs::write(file.path(), "[application]\nlog_level = \"loud\"\n").unwrap();
        assert!(build_engine(file.path().to_str().unwrap()).is_err());
    }
}
