//! Integration tests for typed accessors resolved through the full chain

use keystone::core::ConfigEngine;
use keystone::domain::KeystoneError;
use keystone::keys::{KeyDefinition, KeyRegistry};
use keystone::params::DynamicParameterSource;
use keystone::source::{MapSource, ProcessProperties};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use test_case::test_case;

fn engine_with_property(key: &str, value: &str) -> ConfigEngine {
    let properties = ProcessProperties::new();
    properties.set(key, value);
    ConfigEngine::builder().properties(properties).build()
}

#[test_case("250ms", Duration::from_millis(250) ; "milliseconds")]
#[test_case("45s", Duration::from_secs(45) ; "seconds")]
#[test_case("3m", Duration::from_secs(180) ; "minutes")]
#[test_case("1.5h", Duration::from_secs(5_400) ; "fractional hours")]
#[test_case("2d", Duration::from_secs(172_800) ; "days")]
#[test_case("90", Duration::from_secs(90) ; "bare seconds")]
#[test_case("PT1M30S", Duration::from_secs(90) ; "iso")]
fn test_duration_through_engine(raw: &str, expected: Duration) {
    let engine = engine_with_property("ta.timeout", raw);
    assert_eq!(engine.get_duration("ta.timeout").unwrap(), Some(expected));
}

#[test_case("TRUE", true)]
#[test_case("yes", true)]
#[test_case("On", true)]
#[test_case("1", true)]
#[test_case("false", false)]
#[test_case("NO", false)]
#[test_case("off", false)]
#[test_case("0", false)]
fn test_bool_through_engine(raw: &str, expected: bool) {
    let engine = engine_with_property("ta.flag", raw);
    assert_eq!(engine.get_bool("ta.flag").unwrap(), Some(expected));
}

#[test_case("maybe" ; "word")]
#[test_case("2" ; "other digit")]
#[test_case("" ; "empty")]
fn test_bool_rejects(raw: &str) {
    let engine = engine_with_property("ta.flag", raw);
    assert!(matches!(
        engine.get_bool("ta.flag"),
        Err(KeystoneError::Coercion { target: "boolean", .. })
    ));
}

#[test]
fn test_default_is_shadowed_by_any_source() {
    let keys = KeyRegistry::new().with_key(KeyDefinition::new("ta.retries").with_default("3"));
    let engine = ConfigEngine::builder().keys(keys).build();
    assert_eq!(engine.get_int("ta.retries").unwrap(), Some(3));

    engine.set_property("ta.retries", "7");
    assert_eq!(engine.get_int("ta.retries").unwrap(), Some(7));

    engine.remove_property("ta.retries");
    assert_eq!(engine.get_int("ta.retries").unwrap(), Some(3));
}

#[test]
fn test_method_parameter_overrides_typed_value() {
    let engine = ConfigEngine::new();
    engine.append_source(Arc::new(MapSource::new("files").with_entry("ta.workers", "4")));
    let params = Arc::new(DynamicParameterSource::new());
    engine.ensure_front(params.clone());

    assert_eq!(engine.get_long("ta.workers").unwrap(), Some(4));

    params.set_method_parameters(
        "m1",
        HashMap::from([("ta.workers".to_string(), "16".to_string())]),
    );
    assert_eq!(engine.get_long("ta.workers").unwrap(), Some(16));

    params.clear_method_parameters("m1");
    assert_eq!(engine.get_long("ta.workers").unwrap(), Some(4));
}

#[test]
fn test_sensitive_value_masked_in_display_and_errors() {
    let keys = KeyRegistry::new().with_key(KeyDefinition::new("ta.api.key").sensitive());
    let properties = ProcessProperties::new();
    properties.set("ta.api.key", "not-a-number");
    let engine = ConfigEngine::builder()
        .keys(keys)
        .properties(properties)
        .build();

    assert_eq!(engine.display("ta.api.key"), "[REDACTED]");
    assert_eq!(engine.get_string("ta.api.key").as_deref(), Some("not-a-number"));

    let message = engine.get_int("ta.api.key").unwrap_err().to_string();
    assert!(message.contains("ta.api.key"));
    assert!(!message.contains("not-a-number"));
}

#[test]
fn test_list_with_explicit_delimiter() {
    let engine = engine_with_property("ta.hosts", "a.example | b.example |");
    assert_eq!(
        engine.get_list_with("ta.hosts", "|"),
        Some(vec!["a.example".to_string(), "b.example".to_string()])
    );
    assert_eq!(
        engine.get_list("ta.hosts"),
        Some(vec!["a.example | b.example |".to_string()])
    );
}
