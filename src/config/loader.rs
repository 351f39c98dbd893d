//! Settings loader with TOML parsing and environment variable overrides

use super::schema::KeystoneSettings;
use crate::domain::errors::KeystoneError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder regex"));

/// Loads settings from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`KeystoneSettings`]
/// 4. Applies environment variable overrides (`KEYSTONE_*` prefix)
/// 5. Validates the result
///
/// # Errors
///
/// Returns [`KeystoneError::Configuration`] if the file is missing or
/// unreadable, a referenced variable is unset, parsing fails, or validation
/// fails.
///
/// # Examples
///
/// ```no_run
/// use keystone::config::load_settings;
///
/// let settings = load_settings("keystone.toml").expect("Failed to load settings");
/// ```
pub fn load_settings(path: impl AsRef<Path>) -> Result<KeystoneSettings> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(KeystoneError::Configuration(format!(
            "Settings file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        KeystoneError::Configuration(format!(
            "Failed to read settings file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_settings(&contents)
}

/// Parses settings from TOML text, applying substitution, overrides and
/// validation exactly as [`load_settings`] does
pub fn parse_settings(contents: &str) -> Result<KeystoneSettings> {
    let contents = substitute_env_vars(contents)?;

    let mut settings: KeystoneSettings = toml::from_str(&contents)
        .map_err(|e| KeystoneError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut settings);

    settings.validate().map_err(|e| {
        KeystoneError::Configuration(format!("Settings validation failed: {}", e))
    })?;

    Ok(settings)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines (starting with `#`) are copied verbatim.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
pub(crate) fn substitute_env_vars(input: &str) -> Result<String> {
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = PLACEHOLDER.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(KeystoneError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `KEYSTONE_*` prefix
///
/// Variables follow the pattern `KEYSTONE_<SECTION>_<KEY>`, for example
/// `KEYSTONE_APPLICATION_LOG_LEVEL` or `KEYSTONE_MASKING_REDACTION_TOKEN`.
fn apply_env_overrides(settings: &mut KeystoneSettings) {
    if let Ok(val) = std::env::var("KEYSTONE_APPLICATION_LOG_LEVEL") {
        settings.application.log_level = val;
    }
    if let Ok(val) = std::env::var("KEYSTONE_APPLICATION_EAGER_RESOLUTION") {
        if let Ok(eager) = val.parse() {
            settings.application.eager_resolution = eager;
        }
    }

    if let Ok(val) = std::env::var("KEYSTONE_MASKING_REDACTION_TOKEN") {
        settings.masking.redaction_token = val;
    }
    if let Ok(val) = std::env::var("KEYSTONE_MASKING_LIST_DELIMITER") {
        settings.masking.list_delimiter = val;
    }

    if let Ok(val) = std::env::var("KEYSTONE_LOGGING_LOCAL_ENABLED") {
        settings.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("KEYSTONE_LOGGING_LOCAL_PATH") {
        settings.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("KEYSTONE_LOGGING_LOCAL_ROTATION") {
        settings.logging.local_rotation = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("KEYSTONE_LOADER_UNIT_VAR", "test_value");
        let input = "password = \"${KEYSTONE_LOADER_UNIT_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "password = \"test_value\"\n");
        std::env::remove_var("KEYSTONE_LOADER_UNIT_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("KEYSTONE_LOADER_UNIT_MISSING");
        let input = "password = \"${KEYSTONE_LOADER_UNIT_MISSING}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("KEYSTONE_LOADER_UNIT_MISSING"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        let input = "# uses ${KEYSTONE_LOADER_UNIT_NEVER_SET}\nname = \"x\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${KEYSTONE_LOADER_UNIT_NEVER_SET}"));
    }

    #[test]
    fn test_load_settings_missing_file() {
        let result = load_settings("nonexistent-keystone.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_settings_valid() {
        let toml_content = r#"
[application]
log_level = "warn"

[[sources]]
path = "settings/app.toml"
optional = true

[[keys]]
name = "browser"
default = "chrome"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let settings = load_settings(temp_file.path()).unwrap();
        assert_eq!(settings.sources.len(), 1);
        assert!(settings.sources[0].optional);
        assert_eq!(settings.keys[0].default.as_deref(), Some("chrome"));
    }

    #[test]
    fn test_parse_settings_rejects_invalid() {
        let result = parse_settings("[logging]\nlocal_rotation = \"weekly\"\n");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("validation failed"));
    }
}
