//! Settings for the Keystone engine.
//!
//! Settings describe how the engine is assembled (file sources, declared
//! keys, masking, logging). They are loaded from TOML with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `KEYSTONE_*` environment overrides
//! - Default values for every optional setting
//! - Validation on load
//!
//! # Example Settings
//!
//! ```toml
//! [application]
//! log_level = "info"
//! eager_resolution = true
//!
//! [[sources]]
//! path = "config/app.toml"
//!
//! [[sources]]
//! path = "config/local.yaml"
//! priority = 60
//! optional = true
//!
//! [[keys]]
//! name = "browser"
//! default = "chrome"
//!
//! [[keys]]
//! name = "db.password"
//! sensitive = true
//! required = true
//!
//! [masking]
//! sensitive_patterns = ["(?i)secret", "(?i)token"]
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use keystone::config::load_settings;
//! use keystone::core::ConfigEngine;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = load_settings("keystone.toml")?;
//! let engine = ConfigEngine::from_settings(&settings)?;
//! println!("browser = {}", engine.display("browser"));
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_settings, parse_settings};
pub use schema::{
    ApplicationSettings, FileSourceSettings, KeySettings, KeystoneSettings, LoggingConfig,
    MaskingSettings,
};
pub use secret::{secret_string, SecretString, SecretValue};
