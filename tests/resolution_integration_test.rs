//! Integration tests for chain precedence, caching and invalidation
//!
//! Note: Tests that modify environment variables hold ENV_MUTEX so they do
//! not interfere with each other.

use keystone::core::ConfigEngine;
use keystone::keys::{KeyDefinition, KeyRegistry};
use keystone::source::{priority, ConfigSource, FileFormat, MapSource};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn temp_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

struct CountingSource {
    name: String,
    value: String,
    lookups: AtomicUsize,
}

impl CountingSource {
    fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            lookups: AtomicUsize::new(0),
        }
    }
}

impl ConfigSource for CountingSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        (key == "it.counted").then(|| self.value.clone())
    }
}

#[test]
fn test_value_comes_from_earliest_source_that_has_it() {
    let engine = ConfigEngine::new();
    engine.append_source(Arc::new(MapSource::new("first").with_entry("it.a", "1")));
    engine.append_source(Arc::new(
        MapSource::new("second")
            .with_entry("it.a", "2")
            .with_entry("it.b", "2"),
    ));
    engine.append_source(Arc::new(
        MapSource::new("third")
            .with_entry("it.b", "3")
            .with_entry("it.c", "3"),
    ));

    assert_eq!(engine.describe("it.a").unwrap().source_name, "first");
    assert_eq!(engine.describe("it.b").unwrap().source_name, "second");
    assert_eq!(engine.describe("it.c").unwrap().source_name, "third");
    assert_eq!(engine.get("it.none"), None);
}

#[test]
fn test_insert_at_front_invalidates_cached_value() {
    let engine = ConfigEngine::new();
    engine.append_source(Arc::new(MapSource::new("low").with_entry("it.key", "low")));

    assert_eq!(engine.get("it.key").as_deref(), Some("low"));

    engine
        .insert_source(0, Arc::new(MapSource::new("high").with_entry("it.key", "high")))
        .unwrap();
    assert_eq!(engine.get("it.key").as_deref(), Some("high"));

    assert!(engine.remove_source("high"));
    assert_eq!(engine.get("it.key").as_deref(), Some("low"));
}

#[test]
fn test_cached_absent_is_not_rescanned() {
    let engine = ConfigEngine::builder().eager_resolution(false).build();
    let counting = Arc::new(CountingSource::new("counting", "v"));
    engine.append_source(counting.clone());

    for _ in 0..5 {
        assert_eq!(engine.get("it.never").as_deref(), None);
        assert_eq!(engine.get("it.counted").as_deref(), Some("v"));
    }
    assert_eq!(counting.lookups.load(Ordering::SeqCst), 2);

    engine.invalidate();
    engine.get("it.counted");
    assert_eq!(counting.lookups.load(Ordering::SeqCst), 3);
}

#[test]
fn test_eager_resolution_covers_declared_keys() {
    let keys = KeyRegistry::new().with_key(KeyDefinition::new("it.counted"));
    let engine = ConfigEngine::builder().keys(keys).build();
    let counting = Arc::new(CountingSource::new("counting", "eager"));
    engine.append_source(counting.clone());

    assert!(engine.resolve_all() >= 1);
    assert!(engine.is_cache_complete());
    let before = counting.lookups.load(Ordering::SeqCst);

    assert_eq!(engine.get("it.counted").as_deref(), Some("eager"));
    assert_eq!(counting.lookups.load(Ordering::SeqCst), before);
}

#[test]
fn test_priority_insertion_between_base_sources() {
    let engine = ConfigEngine::new();
    engine.add_source(Arc::new(
        MapSource::new("between").with_priority(priority::PROCESS_PROPERTIES - 1),
    ));
    engine.add_source(Arc::new(MapSource::new("last").with_priority(priority::DEFAULT)));

    assert_eq!(
        engine.source_names(),
        vec!["properties", "between", "environment", "last"]
    );
}

#[test]
fn test_environment_relaxed_lookup() {
    let _lock = ENV_MUTEX.lock().unwrap();
    std::env::set_var("KEYSTONE_IT_HTTP_PORT", "8081");

    let engine = ConfigEngine::new();
    assert_eq!(engine.get("keystone.it.http.port").as_deref(), Some("8081"));
    assert_eq!(engine.get_int("keystone.it.http.port").unwrap(), Some(8081));

    // Properties sit ahead of the environment
    engine.set_property("keystone.it.http.port", "9090");
    assert_eq!(engine.get("keystone.it.http.port").as_deref(), Some("9090"));

    std::env::remove_var("KEYSTONE_IT_HTTP_PORT");
}

#[test]
fn test_file_key_wins_over_os_variable_differing_only_in_case() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let previous = std::env::var("USER").ok();
    std::env::set_var("USER", "os-user");

    let file = temp_file(".toml", "user = \"alice\"\n");
    let engine = ConfigEngine::new();
    assert!(engine.register_file(file.path(), None, None, false).unwrap());

    let resolved = engine.describe("user").unwrap();
    assert_eq!(resolved.value, "alice");
    assert_ne!(resolved.source_name, "environment");
    assert_eq!(engine.get("USER").as_deref(), Some("os-user"));

    match previous {
        Some(value) => std::env::set_var("USER", value),
        None => std::env::remove_var("USER"),
    }
}

#[test]
fn test_file_sources_resolve_nested_keys() {
    let toml = temp_file(
        ".toml",
        r#"
[http]
port = 8080
hosts = ["a", "b"]

[db]
user = "app"
"#,
    );
    let yaml = temp_file(
        ".yaml",
        r#"
db:
  user: override
"#,
    );

    let engine = ConfigEngine::new();
    assert!(engine.register_file(toml.path(), None, None, false).unwrap());
    assert!(engine
        .register_file(yaml.path(), Some(FileFormat::Yaml), Some(priority::FILE + 1), false)
        .unwrap());

    assert_eq!(engine.get_int("http.port").unwrap(), Some(8080));
    assert_eq!(
        engine.get_list("http.hosts"),
        Some(vec!["a".to_string(), "b".to_string()])
    );
    assert_eq!(engine.get("db.user").as_deref(), Some("override"));
}

#[test]
fn test_missing_files() {
    let engine = ConfigEngine::new();
    let registered = engine
        .register_file("/nonexistent/keystone-it.toml", None, None, true)
        .unwrap();
    assert!(!registered);
    assert_eq!(engine.source_count(), 2);

    assert!(engine
        .register_file("/nonexistent/keystone-it.toml", None, None, false)
        .is_err());
}

#[test]
fn test_reset_restores_base_chain_and_keeps_properties() {
    let engine = ConfigEngine::new();
    engine.set_property("it.prop", "kept");
    engine.append_source(Arc::new(MapSource::new("extra").with_entry("it.extra", "x")));
    assert_eq!(engine.get("it.extra").as_deref(), Some("x"));

    engine.reset();
    assert_eq!(engine.source_names(), vec!["properties", "environment"]);
    assert_eq!(engine.get("it.extra"), None);
    assert_eq!(engine.get("it.prop").as_deref(), Some("kept"));
}

#[test]
fn test_concurrent_readers_see_consistent_values_across_mutation() {
    let engine = Arc::new(ConfigEngine::new());
    engine.append_source(Arc::new(MapSource::new("base").with_entry("it.shared", "old")));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                for _ in 0..200 {
                    let value = engine.get("it.shared");
                    assert!(matches!(value.as_deref(), Some("old") | Some("new")));
                }
            })
        })
        .collect();

    engine
        .insert_source(0, Arc::new(MapSource::new("front").with_entry("it.shared", "new")))
        .unwrap();

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(engine.get("it.shared").as_deref(), Some("new"));
}
