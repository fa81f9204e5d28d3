//! Host error types.

use thiserror::Error;

/// Errors raised by the key/value data store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// A path with no segments was supplied.
    #[error("key path is empty")]
    EmptyPath,

    /// An intermediate segment already holds a value that is not an object.
    #[error("cannot descend into '{segment}' of '{path}': value is not an object")]
    NotAnObject { path: String, segment: String },
}

impl DataError {
    /// Create a not-an-object error for `segment` within `path`.
    pub fn not_an_object(path: impl Into<String>, segment: impl Into<String>) -> Self {
        Self::NotAnObject {
            path: path.into(),
            segment: segment.into(),
        }
    }
}

/// Errors that can occur while installing a plugin on an app.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The plugin's own installation logic failed.
    #[error("plugin '{plugin}': installation failed: {details}")]
    InstallFailed { plugin: String, details: String },
}

impl PluginError {
    /// Create an installation failure for `plugin`.
    pub fn install_failed(plugin: impl Into<String>, details: impl ToString) -> Self {
        Self::InstallFailed {
            plugin: plugin.into(),
            details: details.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_an_object_names_segment_and_path() {
        let msg = DataError::not_an_object("a.b.c", "b").to_string();
        assert!(msg.contains("'b'"));
        assert!(msg.contains("a.b.c"));
    }

    #[test]
    fn install_failed_names_plugin() {
        let msg = PluginError::install_failed("base-reporter", "boom").to_string();
        assert!(msg.contains("base-reporter"));
        assert!(msg.contains("boom"));
    }
}
