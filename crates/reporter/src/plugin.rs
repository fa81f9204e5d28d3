//! Installs the reporter on an app.
//!
//! Installation is idempotent per app: the first call registers the plugin
//! name, builds the store, and attaches the facade under [`PROPERTY`]. Any
//! later call on the same app returns without side effects.

use std::sync::Arc;

use base_app::{App, Plugin, PluginError};
use tracing::debug;

use crate::options::Options;
use crate::reporter::Reporter;
use crate::store::ReporterStore;

/// Name the plugin registers under.
pub const PLUGIN_NAME: &str = "base-reporter";

/// App property the facade is attached under.
pub const PROPERTY: &str = "reporter";

/// The reporter plugin, carrying its install-time options.
#[derive(Debug, Clone, Default)]
pub struct ReporterPlugin {
    config: Options,
}

impl ReporterPlugin {
    /// Install-time options.
    pub fn config(&self) -> &Options {
        &self.config
    }
}

impl Plugin for ReporterPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn install(&self, app: &App) -> Result<(), PluginError> {
        install(app, &self.config);
        Ok(())
    }
}

/// Create the reporter plugin with `config` as base options.
pub fn reporter(config: Options) -> ReporterPlugin {
    ReporterPlugin { config }
}

/// Equip `app` with a reporter.
///
/// Returns `true` if this call installed it, `false` if the app already had
/// one or is not a full app instance.
pub fn install(app: &App, config: &Options) -> bool {
    if !app.is_app() {
        debug!(app = %app.id(), kind = ?app.kind(), "not an app instance, skipping reporter");
        return false;
    }
    if app.is_registered(PLUGIN_NAME) {
        return false;
    }

    // Attach inside registration so `plugin` listeners can already see it.
    app.register_with(PLUGIN_NAME, || {
        debug!(app = %app.id(), "running base-reporter");
        let store = ReporterStore::new(app, config.clone());
        app.attach(PROPERTY, Reporter::new(store));
    })
}

/// Access the reporter installed on an app.
pub trait ReporterAppExt {
    /// The installed reporter, if any.
    fn reporter(&self) -> Option<Arc<Reporter>>;
}

impl ReporterAppExt for App {
    fn reporter(&self) -> Option<Arc<Reporter>> {
        self.property::<Reporter>(PROPERTY)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use base_app::AppKind;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn install_attaches_reporter() {
        let app = App::new();
        assert!(app.reporter().is_none());

        assert!(install(&app, &Options::new()));

        assert!(app.is_registered(PLUGIN_NAME));
        assert!(app.reporter().is_some());
    }

    #[test]
    fn second_install_is_a_noop() {
        let app = App::new();
        let mut config = Options::new();
        config.insert("first".into(), json!(true));
        install(&app, &config);
        let first = app.reporter().unwrap();
        first.cache().set("kept", 1).unwrap();

        assert!(!install(&app, &Options::new()));

        let again = app.reporter().unwrap();
        assert!(again.cache().ptr_eq(first.cache()));
        assert_eq!(again.cache().get("kept"), Some(json!(1)));
        assert_eq!(again.cache().options().get("first"), Some(&json!(true)));
    }

    #[test]
    fn plugin_listeners_see_the_reporter() {
        let app = App::new();
        let found = Arc::new(AtomicBool::new(false));
        let f = found.clone();
        let handle = app.downgrade();
        app.on(base_app::PLUGIN_EVENT, move |name| {
            if name == PLUGIN_NAME {
                let app = handle.upgrade().unwrap();
                f.store(app.reporter().is_some(), Ordering::SeqCst);
            }
        });

        install(&app, &Options::new());

        assert!(found.load(Ordering::SeqCst));
    }

    #[test]
    fn only_full_apps_are_equipped() {
        let view = App::with_kind(AppKind::View);
        assert!(!install(&view, &Options::new()));
        assert!(view.reporter().is_none());
        assert!(!view.is_registered(PLUGIN_NAME));
    }

    #[test]
    fn store_is_bound_to_host() {
        let app = App::new();
        app.use_plugin(&reporter(Options::new())).unwrap();
        let store = app.reporter().unwrap().cache().clone();
        assert!(store.host().unwrap().ptr_eq(&app));
    }

    #[test]
    fn config_is_copied() {
        let mut config = Options::new();
        config.insert("foo".into(), json!("bar"));
        let plugin = reporter(config.clone());
        let app = App::new();
        app.use_plugin(&plugin).unwrap();

        config.insert("foo".into(), json!("changed"));

        let options = app.reporter().unwrap().cache().options().clone();
        assert_eq!(options.get("foo"), Some(&json!("bar")));
        assert_eq!(plugin.config().get("foo"), Some(&json!("bar")));
    }
}
