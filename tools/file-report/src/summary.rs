//! The summary report and the middleware that feeds it.

use std::collections::BTreeMap;

use base_app::{BoxMiddleware, File, KeyPath, Next, from_fn};
use base_reporter::{MiddlewareSource, Options, ReporterStore};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tracing::warn;

/// Store property holding per-extension counts.
pub const EXTENSIONS: &str = "extensions";

/// Store property the summary report writes to.
pub const SUMMARY: &str = "summary";

const DEFAULT_TITLE: &str = "File report";

/// Middleware that counts files per extension in private state and mirrors
/// the counts into the store.
pub fn extension_counter() -> MiddlewareSource {
    MiddlewareSource::factory(|store: &ReporterStore| -> BoxMiddleware {
        let store = store.clone();
        let counts: Mutex<BTreeMap<String, u64>> = Mutex::new(BTreeMap::new());

        from_fn(move |file: &File, next: Next<'_>| {
            let ext = file
                .path
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_else(|| "(none)".to_string());

            let snapshot = {
                let mut counts = counts.lock();
                *counts.entry(ext).or_insert(0) += 1;
                json!(*counts)
            };

            if let Err(e) = store.set(EXTENSIONS, snapshot) {
                warn!(error = %e, "failed to record extension counts");
            }
            next.run();
        })
    })
}

/// Report that summarises what the pipeline recorded under `property`.
///
/// Options: `title` (string) and `limit` (maximum number of paths listed).
pub fn summary_report(property: String) -> impl Fn(&ReporterStore, &Options) + Send + Sync + 'static {
    let path = KeyPath::dotted(&property);
    move |store, options| {
        let paths: Vec<Value> = store
            .get(path.clone())
            .and_then(|v| v.as_array().cloned())
            .unwrap_or_default();

        let title = options
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_TITLE);
        let limit = options
            .get("limit")
            .and_then(Value::as_u64)
            .map(|l| l as usize)
            .unwrap_or(paths.len());

        let summary = json!({
            "title": title,
            "property": property,
            "count": paths.len(),
            "extensions": store.get(EXTENSIONS).unwrap_or_else(|| json!({})),
            "paths": paths.iter().take(limit).collect::<Vec<_>>(),
            "truncated": paths.len() > limit,
        });

        if let Err(e) = store.set(SUMMARY, summary) {
            warn!(error = %e, "failed to store summary");
        }
    }
}

/// Render a stored summary for the terminal.
pub fn render_text(summary: &Value) -> String {
    let mut out = String::new();
    let title = summary["title"].as_str().unwrap_or(DEFAULT_TITLE);
    out.push_str(&format!("{title}\n{}\n", "-".repeat(title.len())));
    out.push_str(&format!("files: {}\n", summary["count"]));

    if let Some(extensions) = summary["extensions"].as_object() {
        for (ext, count) in extensions {
            out.push_str(&format!("  {ext:<10} {count}\n"));
        }
    }

    if let Some(paths) = summary["paths"].as_array() {
        for path in paths {
            out.push_str(&format!("{}\n", path.as_str().unwrap_or_default()));
        }
    }
    if summary["truncated"].as_bool().unwrap_or(false) {
        out.push_str("...\n");
    }
    out
}
