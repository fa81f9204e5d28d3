//! The reporter facade: register reports, run them, and build middleware.

use std::sync::Arc;

use base_app::BoxMiddleware;
use tracing::debug;

use crate::error::{ReporterError, ReporterResult};
use crate::middleware::{self, MiddlewareSource};
use crate::options::{Options, merge_options, validate_name};
use crate::store::ReporterStore;

/// Public surface of the reporter plugin. Clones share one store.
#[derive(Clone, Debug)]
pub struct Reporter {
    store: ReporterStore,
}

impl Reporter {
    /// Wrap `store`.
    pub fn new(store: ReporterStore) -> Self {
        Self { store }
    }

    /// Call `f` with the store and return its result unchanged.
    ///
    /// Lets callers build ad hoc closures over the store without going
    /// through `add`/`report`.
    pub fn call<R>(&self, f: impl FnOnce(&ReporterStore) -> R) -> R {
        f(&self.store)
    }

    /// The underlying store, for introspection.
    pub fn cache(&self) -> &ReporterStore {
        &self.store
    }

    /// Same as [`cache`](Self::cache).
    pub fn store(&self) -> &ReporterStore {
        &self.store
    }

    /// Register `report` under `name`, replacing any earlier registration.
    pub fn add<F>(&self, name: &str, report: F) -> ReporterResult<&Self>
    where
        F: Fn(&ReporterStore, &Options) + Send + Sync + 'static,
    {
        validate_name("reporter name", name)?;

        let replaced = self.store.insert_reporter(name, Arc::new(report));
        debug!(reporter = %name, replaced, "registered reporter");
        Ok(self)
    }

    /// Run the reporter registered under `name`.
    ///
    /// The function receives the store and the base options merged with
    /// `options` (per-call keys win). It runs to completion before this
    /// returns.
    pub fn report(&self, name: &str, options: Option<&Options>) -> ReporterResult<&Self> {
        let Some(report) = self.store.reporter(name) else {
            return Err(ReporterError::not_found(name));
        };

        let merged = merge_options(self.store.options(), options);
        debug!(reporter = %name, options = merged.len(), "running reporter");
        report(&self.store, &merged);
        Ok(self)
    }

    /// Build pipeline middleware. See [`MiddlewareSource`].
    pub fn middleware(&self, source: impl Into<MiddlewareSource>) -> ReporterResult<BoxMiddleware> {
        middleware::build(&self.store, source.into())
    }

    /// Names of registered reporters, sorted.
    pub fn reporters(&self) -> Vec<String> {
        self.store.reporter_names()
    }
}
