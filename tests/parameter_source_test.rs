//! Integration tests for the thread-scoped parameter source

use keystone::core::ConfigEngine;
use keystone::params::{ActiveContext, DynamicParameterSource, Parameters};
use keystone::source::{ConfigSource, MapSource};
use std::sync::{Arc, Barrier};
use std::thread;

fn params(pairs: &[(&str, &str)]) -> Parameters {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_method_override_cleared_without_touching_other_threads() {
    let source = Arc::new(DynamicParameterSource::new());
    source.set_suite_parameters(params(&[("p.browser", "suite")]));

    let ready = Arc::new(Barrier::new(2));
    let cleared = Arc::new(Barrier::new(2));

    let worker = {
        let source = Arc::clone(&source);
        let ready = Arc::clone(&ready);
        let cleared = Arc::clone(&cleared);
        thread::spawn(move || {
            source.set_test_parameters("ctx-worker", params(&[("p.browser", "worker-test")]));
            source.set_method_parameters("m-worker", params(&[("p.browser", "worker-method")]));
            ready.wait();
            cleared.wait();
            source.lookup("p.browser")
        })
    };

    source.set_test_parameters("ctx-main", params(&[("p.browser", "main-test")]));
    source.set_method_parameters("m-main", params(&[("p.browser", "main-method")]));
    ready.wait();

    assert_eq!(source.lookup("p.browser").as_deref(), Some("main-method"));
    source.clear_method_parameters("m-main");
    assert_eq!(source.lookup("p.browser").as_deref(), Some("main-test"));
    cleared.wait();

    assert_eq!(worker.join().unwrap().as_deref(), Some("worker-method"));
}

#[test]
fn test_thread_without_context_sees_suite_only() {
    let source = Arc::new(DynamicParameterSource::new());
    source.set_suite_parameters(params(&[("p.mode", "suite")]));
    source.set_method_parameters("m1", params(&[("p.mode", "method")]));

    let other = Arc::clone(&source);
    let (seen, context) = thread::spawn(move || (other.lookup("p.mode"), other.active_context()))
        .join()
        .unwrap();

    assert_eq!(seen.as_deref(), Some("suite"));
    assert!(context.is_empty());
    assert_eq!(source.lookup("p.mode").as_deref(), Some("method"));
}

#[test]
fn test_explicit_context_lookup_from_any_thread() {
    let source = Arc::new(DynamicParameterSource::new());
    source.set_test_parameters("ctx", params(&[("p.k", "from-ctx")]));

    let other = Arc::clone(&source);
    let seen = thread::spawn(move || {
        let ctx = ActiveContext::new().with_test("ctx");
        other.lookup_in(&ctx, "p.k")
    })
    .join()
    .unwrap();
    assert_eq!(seen.as_deref(), Some("from-ctx"));
}

#[test]
fn test_front_parameter_source_is_never_cached() {
    let engine = ConfigEngine::new();
    engine.append_source(Arc::new(MapSource::new("files").with_entry("p.env", "file")));

    let params_source = Arc::new(DynamicParameterSource::new());
    engine.ensure_front(params_source.clone());
    assert_eq!(engine.get("p.env").as_deref(), Some("file"));

    params_source.set_method_parameters("m1", params(&[("p.env", "m1")]));
    assert_eq!(engine.get("p.env").as_deref(), Some("m1"));

    params_source.clear_method_parameters("m1");
    params_source.set_method_parameters("m2", params(&[("p.env", "m2")]));
    assert_eq!(engine.get("p.env").as_deref(), Some("m2"));

    params_source.clear_method_parameters("m2");
    assert_eq!(engine.get("p.env").as_deref(), Some("file"));
}

#[test]
fn test_parameter_source_not_at_front_is_cached_like_any_source() {
    let engine = ConfigEngine::new();
    let params_source = Arc::new(DynamicParameterSource::new());
    params_source.set_suite_parameters(params(&[("p.cached", "first")]));
    engine.append_source(params_source.clone());

    assert_eq!(engine.get("p.cached").as_deref(), Some("first"));
    params_source.set_suite_parameters(params(&[("p.cached", "second")]));
    assert_eq!(engine.get("p.cached").as_deref(), Some("first"));

    engine.invalidate();
    assert_eq!(engine.get("p.cached").as_deref(), Some("second"));
}
