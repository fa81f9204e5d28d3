//! The host application.
//!
//! An `App` is a cheaply clonable handle. Plugins install themselves once per
//! app, tracked by name, and attach whatever they build to the app's property
//! map so it lives exactly as long as the app does.

use std::any::Any;
use std::collections::HashSet;
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::data::DataStore;
use crate::error::PluginError;
use crate::events::Emitter;

/// Event emitted the first time a plugin name is registered on an app.
pub const PLUGIN_EVENT: &str = "plugin";

/// What kind of instance an app is. Some plugins only equip full apps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppKind {
    /// A full application instance.
    #[default]
    App,
    /// A collection of views owned by an app.
    Collection,
    /// A single view (one file or page).
    View,
}

/// A plugin that equips an [`App`].
pub trait Plugin {
    /// Name under which the plugin registers itself.
    fn name(&self) -> &str;

    /// Install the plugin on `app`.
    ///
    /// Implementations are expected to be idempotent: installing twice on the
    /// same app must leave exactly one installation behind.
    fn install(&self, app: &App) -> Result<(), PluginError>;
}

/// Handle to an application instance.
#[derive(Clone)]
pub struct App {
    inner: Arc<AppInner>,
}

struct AppInner {
    id: Uuid,
    kind: AppKind,
    registered: Mutex<HashSet<String>>,
    properties: DashMap<String, Arc<dyn Any + Send + Sync>>,
    data: DataStore,
    events: Emitter,
}

impl App {
    /// Create a new full application instance.
    pub fn new() -> Self {
        Self::with_kind(AppKind::App)
    }

    /// Create an instance of the given kind.
    pub fn with_kind(kind: AppKind) -> Self {
        Self {
            inner: Arc::new(AppInner {
                id: Uuid::now_v7(),
                kind,
                registered: Mutex::new(HashSet::new()),
                properties: DashMap::new(),
                data: DataStore::new(),
                events: Emitter::new(),
            }),
        }
    }

    /// Unique id of this instance.
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Kind of this instance.
    pub fn kind(&self) -> AppKind {
        self.inner.kind
    }

    /// Whether this is a full application instance.
    pub fn is_app(&self) -> bool {
        self.inner.kind == AppKind::App
    }

    /// Check whether a plugin has registered under `name`.
    pub fn is_registered(&self, name: &str) -> bool {
        self.inner.registered.lock().contains(name)
    }

    /// Record that a plugin registered under `name`.
    ///
    /// Returns `true` only the first time; that call also emits the `plugin`
    /// event with the name as payload.
    pub fn mark_registered(&self, name: &str) -> bool {
        self.register_with(name, || {})
    }

    /// Record `name` as registered, run `setup`, then emit the `plugin` event.
    ///
    /// `setup` runs only for the first registration of `name`, so whatever it
    /// attaches is visible to `plugin` listeners. Returns whether it ran.
    pub fn register_with(&self, name: &str, setup: impl FnOnce()) -> bool {
        if !self.inner.registered.lock().insert(name.to_string()) {
            return false;
        }

        setup();
        debug!(app = %self.inner.id, plugin = %name, "plugin registered");
        self.inner.events.emit(PLUGIN_EVENT, &Value::from(name));
        true
    }

    /// Names of all registered plugins, sorted.
    pub fn registered(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.registered.lock().iter().cloned().collect();
        names.sort();
        names
    }

    /// Run `plugin` against this app.
    pub fn use_plugin(&self, plugin: &impl Plugin) -> Result<&Self, PluginError> {
        debug!(app = %self.inner.id, plugin = %plugin.name(), "using plugin");
        plugin.install(self)?;
        Ok(self)
    }

    /// Attach `value` under `name`, replacing any previous value.
    pub fn attach<T: Any + Send + Sync>(&self, name: &str, value: T) {
        self.attach_shared(name, Arc::new(value));
    }

    /// Attach an already shared value under `name`.
    pub fn attach_shared<T: Any + Send + Sync>(&self, name: &str, value: Arc<T>) {
        self.inner.properties.insert(name.to_string(), value);
    }

    /// Read the property `name` as a `T`.
    ///
    /// Returns `None` when nothing is attached under `name` or it holds a
    /// different type.
    pub fn property<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        let value = self.inner.properties.get(name)?.value().clone();
        value.downcast::<T>().ok()
    }

    /// Check whether anything is attached under `name`.
    pub fn has_property(&self, name: &str) -> bool {
        self.inner.properties.contains_key(name)
    }

    /// The app's own data store.
    pub fn data(&self) -> &DataStore {
        &self.inner.data
    }

    /// The app's event emitter.
    pub fn events(&self) -> &Emitter {
        &self.inner.events
    }

    /// Register an event listener. Shorthand for `events().on(..)`.
    pub fn on(&self, event: &str, listener: impl Fn(&Value) + Send + Sync + 'static) -> &Self {
        self.inner.events.on(event, listener);
        self
    }

    /// Non-owning handle to this app.
    pub fn downgrade(&self) -> WeakApp {
        WeakApp {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Whether two handles refer to the same instance.
    pub fn ptr_eq(&self, other: &App) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("id", &self.inner.id)
            .field("kind", &self.inner.kind)
            .field("registered", &self.registered())
            .finish()
    }
}

/// Non-owning handle to an [`App`].
#[derive(Clone, Debug)]
pub struct WeakApp {
    inner: Weak<AppInner>,
}

impl WeakApp {
    /// Get the app back, if it still exists.
    pub fn upgrade(&self) -> Option<App> {
        self.inner.upgrade().map(|inner| App { inner })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter;

    impl Plugin for Counter {
        fn name(&self) -> &str {
            "counter"
        }

        fn install(&self, app: &App) -> Result<(), PluginError> {
            if !app.mark_registered(self.name()) {
                return Ok(());
            }
            app.attach("counter", AtomicUsize::new(0));
            Ok(())
        }
    }

    #[test]
    fn mark_registered_is_first_time_only() {
        let app = App::new();
        assert!(!app.is_registered("foo"));
        assert!(app.mark_registered("foo"));
        assert!(!app.mark_registered("foo"));
        assert!(app.is_registered("foo"));
        assert_eq!(app.registered(), vec!["foo"]);
    }

    #[test]
    fn setup_runs_before_the_event() {
        let app = App::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let s = seen.clone();
        let handle = app.downgrade();
        app.on(PLUGIN_EVENT, move |_| {
            let app = handle.upgrade().unwrap();
            s.store(*app.property::<usize>("ready").unwrap(), Ordering::SeqCst);
        });

        assert!(app.register_with("foo", || app.attach("ready", 7usize)));
        assert!(!app.register_with("foo", || app.attach("ready", 9usize)));

        assert_eq!(seen.load(Ordering::SeqCst), 7);
        assert_eq!(*app.property::<usize>("ready").unwrap(), 7);
    }

    #[test]
    fn plugin_event_fires_once() {
        let app = App::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        app.on(PLUGIN_EVENT, move |name| {
            if name == "counter" {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });

        app.use_plugin(&Counter).unwrap();
        app.use_plugin(&Counter).unwrap();
        app.use_plugin(&Counter).unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn property_roundtrips_by_type() {
        let app = App::new();
        app.attach("answer", 42u32);

        assert_eq!(app.property::<u32>("answer").as_deref(), Some(&42));
        assert!(app.property::<String>("answer").is_none());
        assert!(app.property::<u32>("missing").is_none());
        assert!(app.has_property("answer"));
    }

    #[test]
    fn attach_replaces_previous_value() {
        let app = App::new();
        app.attach("name", "first".to_string());
        app.attach("name", "second".to_string());
        assert_eq!(app.property::<String>("name").unwrap().as_str(), "second");
    }

    #[test]
    fn weak_handle_does_not_keep_app_alive() {
        let app = App::new();
        let weak = app.downgrade();
        assert!(weak.upgrade().unwrap().ptr_eq(&app));
        drop(app);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn kinds() {
        assert!(App::new().is_app());
        let view = App::with_kind(AppKind::View);
        assert!(!view.is_app());
        assert_eq!(view.kind(), AppKind::View);
    }
}
