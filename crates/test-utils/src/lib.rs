//! Reporter test utilities.
//!
//! Helpers for integration testing: prepared apps, file fixtures, event
//! counters, report probes, and assertion helpers.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use base_app::{App, File};
use base_reporter::{Options, Reporter, ReporterAppExt, ReporterStore, into_options, reporter};
use parking_lot::Mutex;
use serde_json::Value as JsonValue;

/// Build options from a JSON object literal.
///
/// Panics if `value` is not an object or `null`.
pub fn options(value: JsonValue) -> Options {
    into_options(value).unwrap_or_else(|e| panic!("invalid test options: {e}"))
}

/// Create an app with the reporter installed using no base options.
pub fn test_app() -> (App, Arc<Reporter>) {
    test_app_with(JsonValue::Null)
}

/// Create an app with the reporter installed using `config` as base options.
pub fn test_app_with(config: JsonValue) -> (App, Arc<Reporter>) {
    let app = App::new();
    if let Err(e) = app.use_plugin(&reporter(options(config))) {
        panic!("failed to install reporter: {e}");
    }
    let Some(reporter) = app.reporter() else {
        panic!("reporter was not attached to the app");
    };
    (app, reporter)
}

/// Create a file fixture with only a path.
pub fn test_file(path: &str) -> File {
    File::new(path)
}

/// Create file fixtures for each path, in order.
pub fn test_files(paths: &[&str]) -> Vec<File> {
    paths.iter().map(|p| test_file(p)).collect()
}

/// Counts emissions of one event on an app.
#[derive(Debug, Clone, Default)]
pub struct EventCounter {
    count: Arc<AtomicUsize>,
}

impl EventCounter {
    /// Count every `event` emitted on `app`.
    pub fn attach(app: &App, event: &str) -> Self {
        let counter = Self::default();
        let count = counter.count.clone();
        app.on(event, move |_| {
            count.fetch_add(1, Ordering::SeqCst);
        });
        counter
    }

    /// Count `event` emissions whose payload equals `payload`.
    pub fn attach_matching(app: &App, event: &str, payload: JsonValue) -> Self {
        let counter = Self::default();
        let count = counter.count.clone();
        app.on(event, move |value| {
            if *value == payload {
                count.fetch_add(1, Ordering::SeqCst);
            }
        });
        counter
    }

    /// Number of counted emissions so far.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

/// Records every invocation of a report function.
#[derive(Debug, Clone, Default)]
pub struct ReportProbe {
    calls: Arc<Mutex<Vec<Options>>>,
}

impl ReportProbe {
    /// Create an empty probe.
    pub fn new() -> Self {
        Self::default()
    }

    /// A report function that records the options it was called with.
    pub fn report_fn(&self) -> impl Fn(&ReporterStore, &Options) + Send + Sync + 'static {
        let calls = self.calls.clone();
        move |_store, options| calls.lock().push(options.clone())
    }

    /// Number of recorded invocations.
    pub fn calls(&self) -> usize {
        self.calls.lock().len()
    }

    /// Options of the most recent invocation.
    pub fn last_options(&self) -> Option<Options> {
        self.calls.lock().last().cloned()
    }
}

/// Assertion helpers for JSON values and messages.
pub mod assert {
    use serde_json::Value;

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a JSON value is an array of strings equal to `expected`.
    pub fn string_array(actual: Option<&Value>, expected: &[&str]) {
        let expected: Vec<Value> = expected.iter().map(|s| Value::from(*s)).collect();
        assert_eq!(
            actual,
            Some(&Value::Array(expected)),
            "unexpected accumulated values"
        );
    }
}
