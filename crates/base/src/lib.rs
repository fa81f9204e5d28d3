//! Base application host.
//!
//! Provides the pieces plugins build on:
//! - `App`: plugin registration, typed property map, and its own data store
//! - `DataStore`: nested key/value storage with append-style `union`
//! - `Emitter`: named events with JSON payloads
//! - `Pipeline`: runs files through a chain of middleware

mod app;
mod data;
mod error;
mod events;
mod pipeline;

pub use app::{App, AppKind, PLUGIN_EVENT, Plugin, WeakApp};
pub use data::{DataStore, KeyPath};
pub use error::{DataError, PluginError};
pub use events::{Emitter, Listener};
pub use pipeline::{
    BoxMiddleware, File, Middleware, Next, Pipeline, PipelineSummary, from_fn,
};
