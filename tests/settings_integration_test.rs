//! Integration tests for settings loading and engine assembly
//!
//! Note: Tests that modify environment variables hold ENV_MUTEX so they do
//! not interfere with each other.

use keystone::config::load_settings;
use keystone::core::ConfigEngine;
use keystone::domain::KeystoneError;
use std::io::Write;
use std::sync::Mutex;
use tempfile::{NamedTempFile, TempDir};

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("KEYSTONE_APPLICATION_LOG_LEVEL");
    std::env::remove_var("KEYSTONE_APPLICATION_EAGER_RESOLUTION");
    std::env::remove_var("KEYSTONE_MASKING_REDACTION_TOKEN");
    std::env::remove_var("KEYSTONE_MASKING_LIST_DELIMITER");
    std::env::remove_var("TEST_KEYSTONE_CONFIG_DIR");
}

fn write_settings(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn write_sources(dir: &TempDir) {
    std::fs::write(
        dir.path().join("app.toml"),
        r#"
[server]
port = 8080
timeout = "45s"

[db]
password = "s3cret"
"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("local.json"),
        r#"{"server": {"port": 9090}, "features": "a;b;c"}"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("extra.env"), "EXTRA_FLAG=on\n").unwrap();
}

#[test]
fn test_engine_from_complete_settings() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let dir = TempDir::new().unwrap();
    write_sources(&dir);
    let base = dir.path().display();

    let settings_file = write_settings(&format!(
        r#"
[application]
log_level = "debug"
eager_resolution = false

[[sources]]
path = "{base}/app.toml"

[[sources]]
path = "{base}/local.json"
priority = 60

[[sources]]
path = "{base}/extra.env"
format = "dotenv"

[[sources]]
path = "{base}/missing.yaml"
optional = true

[[keys]]
name = "server.retries"
default = "3"

[[keys]]
name = "db.password"
sensitive = true
required = true

[masking]
list_delimiter = ";"
"#
    ));

    let settings = load_settings(settings_file.path()).unwrap();
    assert_eq!(settings.application.log_level, "debug");
    assert_eq!(settings.sources.len(), 4);

    let engine = ConfigEngine::from_settings(&settings).unwrap();
    assert!(!engine.options().eager_resolution);
    assert_eq!(engine.source_count(), 5);

    assert_eq!(engine.get_int("server.port").unwrap(), Some(9090));
    assert_eq!(
        engine.get_duration("server.timeout").unwrap(),
        Some(std::time::Duration::from_secs(45))
    );
    assert_eq!(engine.get_int("server.retries").unwrap(), Some(3));
    assert_eq!(engine.get_bool("EXTRA_FLAG").unwrap(), Some(true));
    assert_eq!(
        engine.get_list("features"),
        Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
    );
    assert_eq!(engine.display("db.password"), "[REDACTED]");
    assert!(engine.check_required().is_ok());

    cleanup_env_vars();
}

#[test]
fn test_env_var_substitution_in_source_paths() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let dir = TempDir::new().unwrap();
    write_sources(&dir);
    std::env::set_var("TEST_KEYSTONE_CONFIG_DIR", dir.path());

    let settings_file = write_settings(
        r#"
[[sources]]
path = "${TEST_KEYSTONE_CONFIG_DIR}/app.toml"
"#,
    );

    let settings = load_settings(settings_file.path()).unwrap();
    assert!(settings.sources[0].path.ends_with("/app.toml"));
    assert!(!settings.sources[0].path.contains("${"));

    let engine = ConfigEngine::from_settings(&settings).unwrap();
    assert_eq!(engine.get("server.port").as_deref(), Some("8080"));

    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_variable_is_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let settings_file = write_settings(
        r#"
[[sources]]
path = "${TEST_KEYSTONE_CONFIG_DIR}/app.toml"
"#,
    );

    let err = load_settings(settings_file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_KEYSTONE_CONFIG_DIR"));
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    std::env::set_var("KEYSTONE_MASKING_REDACTION_TOKEN", "***");
    std::env::set_var("KEYSTONE_APPLICATION_EAGER_RESOLUTION", "false");

    let settings_file = write_settings(
        r#"
[[keys]]
name = "api.token"
sensitive = true
"#,
    );
    let settings = load_settings(settings_file.path()).unwrap();
    assert_eq!(settings.masking.redaction_token, "***");
    assert!(!settings.application.eager_resolution);

    let engine = ConfigEngine::from_settings(&settings).unwrap();
    assert_eq!(engine.display("api.token"), "***");

    cleanup_env_vars();
}

#[test]
fn test_missing_required_key_is_reported() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let settings_file = write_settings(
        r#"
[[keys]]
name = "settings.it.required"
required = true
"#,
    );
    let settings = load_settings(settings_file.path()).unwrap();
    let engine = ConfigEngine::from_settings(&settings).unwrap();

    match engine.check_required() {
        Err(KeystoneError::MissingRequired(key)) => assert_eq!(key, "settings.it.required"),
        other => panic!("expected missing required key, got {other:?}"),
    }
}

#[test]
fn test_sensitive_patterns_apply_to_undeclared_keys() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let settings_file = write_settings(
        r#"
[masking]
sensitive_patterns = ["(?i)secret"]
"#,
    );
    let settings = load_settings(settings_file.path()).unwrap();
    let engine = ConfigEngine::from_settings(&settings).unwrap();
    engine.set_property("client.SECRET", "value");

    assert!(engine.is_sensitive("client.SECRET"));
    assert_eq!(engine.display("client.SECRET"), "[REDACTED]");
    assert!(!engine.is_sensitive("client.id"));
}

#[test]
fn test_invalid_settings() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let duplicate = write_settings(
        r#"
[[keys]]
name = "a"

[[keys]]
name = "a"
"#,
    );
    let err = load_settings(duplicate.path()).unwrap_err();
    assert!(err.to_string().contains("more than once"));

    let bad_pattern = write_settings(
        r#"
[masking]
sensitive_patterns = ["("]
"#,
    );
    assert!(load_settings(bad_pattern.path()).is_err());

    assert!(matches!(
        load_settings("/nonexistent/keystone.toml"),
        Err(KeystoneError::Configuration(_))
    ));
}

#[test]
fn test_unparseable_source_file_is_source_load_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    let settings_file = write_settings(&format!(
        "[[sources]]\npath = \"{}/broken.json\"\noptional = true\n",
        dir.path().display()
    ));

    let settings = load_settings(settings_file.path()).unwrap();
    assert!(matches!(
        ConfigEngine::from_settings(&settings),
        Err(KeystoneError::SourceLoad { .. })
    ));
}
