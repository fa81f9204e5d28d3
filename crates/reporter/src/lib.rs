//! Reporter plugin for base apps.
//!
//! Installing the plugin attaches a [`Reporter`] to the app. The reporter
//! keeps a registry of named report functions, runs them with merged
//! options, and hands out pipeline middleware that records what flows
//! through the pipeline into its store.
//!
//! ```
//! use base_app::{App, File, Pipeline};
//! use base_reporter::{Options, ReporterAppExt, reporter};
//!
//! let app = App::new();
//! app.use_plugin(&reporter(Options::new())).unwrap();
//! let reporter = app.reporter().unwrap();
//!
//! let mut pipeline = Pipeline::new();
//! pipeline.push(reporter.middleware(base_reporter::MiddlewareSource::Default).unwrap());
//! pipeline.run([File::new("a.txt"), File::new("b.txt")]);
//!
//! reporter
//!     .add("count", |store, _options| {
//!         let files = store.get("files").unwrap_or_default();
//!         let count = files.as_array().map(Vec::len).unwrap_or(0);
//!         store.set("count", count).unwrap();
//!     })
//!     .unwrap()
//!     .report("count", None)
//!     .unwrap();
//!
//! assert_eq!(reporter.cache().get("count"), Some(2.into()));
//! ```

mod error;
mod middleware;
mod options;
mod plugin;
mod reporter;
mod store;

pub use error::{ReporterError, ReporterResult};
pub use middleware::{DEFAULT_PROPERTY, MiddlewareFactory, MiddlewareSource};
pub use options::{Options, into_options, merge_options, property_path, validate_name};
pub use plugin::{PLUGIN_NAME, PROPERTY, ReporterAppExt, ReporterPlugin, install, reporter};
pub use reporter::Reporter;
pub use store::{ReportFn, ReporterStore};
