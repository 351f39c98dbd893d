//! Check command implementation
//!
//! Validates the settings file, loads every configured source, and reports
//! declared keys that are required but have no value.

use super::{load_or_default, EXIT_SETTINGS};
use crate::core::ConfigEngine;
use crate::domain::KeystoneError;
use clap::Args;

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {}

impl CheckArgs {
    /// Execute the check command
    pub fn execute(&self, settings_path: &str) -> anyhow::Result<i32> {
        tracing::info!(settings_path = %settings_path, "Checking configuration");

        println!("🔍 Checking settings file: {settings_path}");
        println!();

        let settings = match load_or_default(settings_path) {
            Ok(settings) => {
                println!("✅ Settings loaded");
                settings
            }
            Err(e) => {
                println!("❌ Failed to load settings");
                println!("   Error: {e}");
                return Ok(EXIT_SETTINGS);
            }
        };

        let engine = match ConfigEngine::from_settings(&settings) {
            Ok(engine) => {
                println!("✅ {} source(s) registered", engine.source_count());
                engine
            }
            Err(e) => {
                println!("❌ Failed to register sources");
                println!("   Error: {e}");
                return Ok(EXIT_SETTINGS);
            }
        };

        let declared = engine.declared_keys();
        let required = engine.required_keys().len();

        match engine.check_required() {
            Ok(()) => {
                println!("✅ All {required} required key(s) resolved");
                println!();
                println!("Summary:");
                println!("  Declared keys: {}", declared.len());
                println!("  Eager resolution: {}", engine.options().eager_resolution);
                println!("  Sources: {}", engine.source_names().join(" > "));
                println!();
                Ok(0)
            }
            Err(KeystoneError::MissingRequired(key)) => {
                println!("❌ Required key '{key}' has no value");
                Ok(1)
            }
            Err(e) => {
                println!("❌ {e}");
                Ok(1)
            }
        }
    }
}
