//! Reporter store: base options, the report registry, and accumulated state.
//!
//! The store keeps its accumulated properties in its own [`DataStore`], never
//! in the host app's namespace, and holds only a weak association to the host
//! so the host can own the store without a reference cycle.

use std::sync::Arc;

use base_app::{App, DataStore, KeyPath, WeakApp};
use dashmap::DashMap;
use serde_json::Value;

use crate::error::ReporterResult;
use crate::options::Options;

/// A registered report function.
pub type ReportFn = Arc<dyn Fn(&ReporterStore, &Options) + Send + Sync>;

/// Shared reporter state. Clones refer to the same store.
#[derive(Clone)]
pub struct ReporterStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    host: WeakApp,
    options: Options,
    reporters: DashMap<String, ReportFn>,
    data: DataStore,
}

impl ReporterStore {
    /// Create a store bound to `host` with `options` as its base options.
    pub fn new(host: &App, options: Options) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                host: host.downgrade(),
                options,
                reporters: DashMap::new(),
                data: DataStore::new(),
            }),
        }
    }

    /// The app this store is bound to, while it exists.
    pub fn host(&self) -> Option<App> {
        self.inner.host.upgrade()
    }

    /// Base options given at installation.
    pub fn options(&self) -> &Options {
        &self.inner.options
    }

    /// Get the accumulated value at `path`.
    pub fn get(&self, path: impl Into<KeyPath>) -> Option<Value> {
        self.inner.data.get(path)
    }

    /// Check whether a value is accumulated at `path`.
    pub fn has(&self, path: impl Into<KeyPath>) -> bool {
        self.inner.data.has(path)
    }

    /// Set the value at `path`.
    pub fn set(&self, path: impl Into<KeyPath>, value: impl Into<Value>) -> ReporterResult<&Self> {
        self.inner.data.set(path, value.into())?;
        Ok(self)
    }

    /// Append `value` to the sequence at `path`, creating it when absent.
    ///
    /// Follows the data store's union policy: values already present are not
    /// appended twice. Each call scans the existing sequence.
    pub fn union(&self, path: impl Into<KeyPath>, value: impl Into<Value>) -> ReporterResult<&Self> {
        self.inner.data.union(path, value.into())?;
        Ok(self)
    }

    /// Remove and return the value at `path`.
    pub fn del(&self, path: impl Into<KeyPath>) -> Option<Value> {
        self.inner.data.del(path)
    }

    /// All accumulated state as one JSON object.
    pub fn snapshot(&self) -> Value {
        self.inner.data.snapshot()
    }

    /// Names of registered reporters, sorted.
    pub fn reporter_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .inner
            .reporters
            .iter()
            .map(|r| r.key().clone())
            .collect();
        names.sort();
        names
    }

    /// Check whether a reporter is registered under `name`.
    pub fn has_reporter(&self, name: &str) -> bool {
        self.inner.reporters.contains_key(name)
    }

    /// Register `report` under `name`. Returns `true` if it replaced one.
    pub(crate) fn insert_reporter(&self, name: &str, report: ReportFn) -> bool {
        self.inner
            .reporters
            .insert(name.to_string(), report)
            .is_some()
    }

    /// Look up the reporter registered under `name`.
    ///
    /// The registry entry is released before returning so the caller can run
    /// the function while other code registers more reporters.
    pub(crate) fn reporter(&self, name: &str) -> Option<ReportFn> {
        self.inner.reporters.get(name).map(|r| r.value().clone())
    }

    /// Whether two handles refer to the same store.
    pub fn ptr_eq(&self, other: &ReporterStore) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for ReporterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReporterStore")
            .field("options", &self.inner.options)
            .field("reporters", &self.reporter_names())
            .field("data", &self.inner.data)
            .finish()
    }
}
