#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Integration tests for the reporter plugin.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p base-reporter --test reporter_test
//! ```
//!
//! ## Test Coverage
//!
//! - Idempotent installation (one `plugin` event, one store)
//! - Facade attached to the app, store introspection
//! - Registering and running reports, missing reports
//! - Option merging between install-time and per-call options
//! - Direct invocation with the store

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use base_app::{App, AppKind, PLUGIN_EVENT};
use base_reporter::{Options, PLUGIN_NAME, ReporterAppExt, ReporterError, reporter};
use reporter_test_utils::{EventCounter, ReportProbe, assert, options, test_app, test_app_with};
use serde_json::json;

#[test]
fn exports_a_plugin_named_base_reporter() {
    use base_app::Plugin;
    let plugin = reporter(Options::new());
    assert_eq!(plugin.name(), PLUGIN_NAME);
}

#[test]
fn registers_the_plugin_once() {
    let app = App::new();
    let events = EventCounter::attach_matching(&app, PLUGIN_EVENT, json!(PLUGIN_NAME));

    app.use_plugin(&reporter(Options::new())).unwrap();
    app.use_plugin(&reporter(Options::new())).unwrap();
    app.use_plugin(&reporter(Options::new())).unwrap();

    assert_eq!(events.count(), 1);
    assert_eq!(app.registered(), vec![PLUGIN_NAME]);
}

#[test]
fn repeated_install_keeps_the_first_store() {
    let app = App::new();
    app.use_plugin(&reporter(options(json!({"first": true}))))
        .unwrap();
    let first = app.reporter().unwrap();
    first.cache().union("files", "a.txt").unwrap();

    app.use_plugin(&reporter(options(json!({"second": true}))))
        .unwrap();

    let current = app.reporter().unwrap();
    assert!(current.cache().ptr_eq(first.cache()));
    assert!(current.cache().options().contains_key("first"));
    assert!(!current.cache().options().contains_key("second"));
    assert::string_array(current.cache().get("files").as_ref(), &["a.txt"]);
}

#[test]
fn adds_a_reporter_object_to_the_app() {
    let app = App::new();
    assert!(app.reporter().is_none());

    app.use_plugin(&reporter(Options::new())).unwrap();

    let reporter = app.reporter().unwrap();
    // store is a live object, not a copy
    reporter.cache().set("probe", 1).unwrap();
    assert_eq!(app.reporter().unwrap().cache().get("probe"), Some(json!(1)));
}

#[test]
fn separate_apps_do_not_share_state() {
    let (_a, first) = test_app();
    let (_b, second) = test_app();

    first.add("only_here", |_, _| {}).unwrap();
    first.cache().set("count", 1).unwrap();

    assert!(second.reporters().is_empty());
    assert!(second.cache().get("count").is_none());
}

#[test]
fn views_are_not_equipped() {
    let view = App::with_kind(AppKind::View);
    view.use_plugin(&reporter(Options::new())).unwrap();
    assert!(view.reporter().is_none());
}

#[test]
fn adds_a_reporter_to_the_registry() {
    let (_app, reporter) = test_app();
    reporter.add("foo", |_, _| {}).unwrap();

    assert!(reporter.cache().has_reporter("foo"));
    assert_eq!(reporter.reporters(), vec!["foo"]);
}

#[test]
fn uses_a_registered_reporter() {
    let (_app, reporter) = test_app();
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    reporter
        .add("foo", move |_, _| {
            c.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    reporter.report("foo", None).unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn errors_when_a_reporter_is_not_registered() {
    let (_app, reporter) = test_app();
    let probe = ReportProbe::new();
    reporter.add("foo", probe.report_fn()).unwrap();

    let err = reporter.report("bar", None).unwrap_err();

    assert!(matches!(err, ReporterError::NotFound { ref name } if name == "bar"));
    assert_eq!(err.to_string(), "Unable to find reporter \"bar\"");
    assert_eq!(probe.calls(), 0);
}

#[test]
fn merges_install_options_with_call_options() {
    let (_app, reporter) = test_app_with(json!({"foo": "bar", "bar": "qux"}));
    let probe = ReportProbe::new();
    reporter.add("opts", probe.report_fn()).unwrap();

    reporter
        .report("opts", Some(&options(json!({"foo": "baz", "beep": "boop"}))))
        .unwrap();

    assert_eq!(
        probe.last_options(),
        Some(options(json!({"foo": "baz", "bar": "qux", "beep": "boop"})))
    );
}

#[test]
fn call_options_do_not_leak_into_later_reports() {
    let (_app, reporter) = test_app_with(json!({"foo": "bar"}));
    let probe = ReportProbe::new();
    reporter.add("opts", probe.report_fn()).unwrap();

    reporter
        .report("opts", Some(&options(json!({"foo": "once"}))))
        .unwrap();
    reporter.report("opts", None).unwrap();

    assert_eq!(probe.calls(), 2);
    assert_eq!(probe.last_options(), Some(options(json!({"foo": "bar"}))));
}

#[test]
fn direct_call_returns_the_callback_result() {
    let (_app, reporter) = test_app();
    reporter.cache().union("files", "a.txt").unwrap();

    let files = reporter.call(|store| store.get("files"));

    assert::string_array(files.as_ref(), &["a.txt"]);
}

#[test]
fn invalid_reporter_names_are_rejected() {
    let (_app, reporter) = test_app();
    for name in ["", "has space", "1st"] {
        let err = reporter.add(name, |_, _| {}).unwrap_err();
        assert::contains(&err.to_string(), "reporter name");
    }
    assert!(reporter.reporters().is_empty());
}
