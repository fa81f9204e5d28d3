//! Named event emitter.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tracing::trace;

/// An event listener.
pub type Listener = Arc<dyn Fn(&Value) + Send + Sync>;

/// Maps event names to listeners, called in registration order.
#[derive(Default)]
pub struct Emitter {
    listeners: DashMap<String, Vec<Listener>>,
}

impl Emitter {
    /// Create an emitter with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `event`.
    pub fn on(&self, event: &str, listener: impl Fn(&Value) + Send + Sync + 'static) {
        self.listeners
            .entry(event.to_string())
            .or_default()
            .push(Arc::new(listener));
    }

    /// Call every listener registered for `event` with `payload`.
    ///
    /// The listener list is copied before dispatch so listeners may register
    /// further listeners without deadlocking.
    pub fn emit(&self, event: &str, payload: &Value) {
        let listeners: Vec<Listener> = match self.listeners.get(event) {
            Some(list) => list.value().clone(),
            None => return,
        };

        trace!(event = %event, listeners = listeners.len(), "emitting event");
        for listener in listeners {
            listener(payload);
        }
    }

    /// Number of listeners registered for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.get(event).map(|l| l.len()).unwrap_or(0)
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("events", &self.listeners.len())
            .finish()
    }
}
