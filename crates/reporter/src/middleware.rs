//! Middleware built from a reporter store.
//!
//! Three ways to get pipeline middleware out of the reporter:
//! - `FromFactory`: a function that receives the store once and returns the
//!   middleware. Useful for private state such as counters.
//! - `FromProperty`: record each file's path under a named property. Dotted
//!   names (`meta.files`) record into nested objects.
//! - `Default`: same as `FromProperty("files")`.
//!
//! The recording middleware never fails the pipeline: if the store rejects the
//! write, the failure is logged and the continuation still runs exactly once.

use base_app::{BoxMiddleware, File, Next, from_fn};
use tracing::{debug, warn};

use crate::error::ReporterResult;
use crate::options::property_path;
use crate::store::ReporterStore;

/// Property that default middleware records file paths under.
pub const DEFAULT_PROPERTY: &str = "files";

/// Builds middleware from the store.
pub type MiddlewareFactory = Box<dyn FnOnce(&ReporterStore) -> BoxMiddleware + Send>;

/// Where middleware comes from.
#[derive(Default)]
pub enum MiddlewareSource {
    /// Call the factory once with the store; its result is the middleware.
    FromFactory(MiddlewareFactory),
    /// Record each file's path under this property.
    FromProperty(String),
    /// Record each file's path under [`DEFAULT_PROPERTY`].
    #[default]
    Default,
}

impl MiddlewareSource {
    /// Wrap a factory function.
    pub fn factory<F>(factory: F) -> Self
    where
        F: FnOnce(&ReporterStore) -> BoxMiddleware + Send + 'static,
    {
        Self::FromFactory(Box::new(factory))
    }

    /// Record under `property`.
    pub fn property(property: impl Into<String>) -> Self {
        Self::FromProperty(property.into())
    }
}

impl From<&str> for MiddlewareSource {
    fn from(property: &str) -> Self {
        Self::FromProperty(property.to_string())
    }
}

impl From<String> for MiddlewareSource {
    fn from(property: String) -> Self {
        Self::FromProperty(property)
    }
}

impl std::fmt::Debug for MiddlewareSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FromFactory(_) => f.write_str("FromFactory(..)"),
            Self::FromProperty(name) => f.debug_tuple("FromProperty").field(name).finish(),
            Self::Default => f.write_str("Default"),
        }
    }
}

/// Build middleware for `store` from `source`.
pub(crate) fn build(store: &ReporterStore, source: MiddlewareSource) -> ReporterResult<BoxMiddleware> {
    match source {
        MiddlewareSource::FromFactory(factory) => {
            debug!("building middleware from factory");
            Ok(factory(store))
        }
        MiddlewareSource::FromProperty(property) => record_paths(store, property),
        MiddlewareSource::Default => record_paths(store, DEFAULT_PROPERTY.to_string()),
    }
}

fn record_paths(store: &ReporterStore, property: String) -> ReporterResult<BoxMiddleware> {
    let path = property_path(&property)?;
    debug!(property = %property, "building path-recording middleware");

    let store = store.clone();
    Ok(from_fn(move |file: &File, next: Next<'_>| {
        if let Err(e) = store.union(path.clone(), file.path_value()) {
            warn!(
                property = %property,
                path = %file.path.display(),
                error = %e,
                "failed to record file path"
            );
        }
        next.run();
    }))
}
