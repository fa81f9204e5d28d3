//! Reporter error types.
//!
//! Every error is raised synchronously to the direct caller; nothing here is
//! retried or swallowed, and a failed call leaves the store untouched.

use base_app::DataError;
use thiserror::Error;

/// Errors returned by the reporter facade and store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReporterError {
    /// An argument was rejected at the call site.
    #[error("invalid {argument} \"{value}\": {reason}")]
    InvalidArgument {
        argument: String,
        value: String,
        reason: String,
    },

    /// No reporter is registered under the requested name.
    #[error("Unable to find reporter \"{name}\"")]
    NotFound { name: String },

    /// The underlying data store rejected an operation.
    #[error(transparent)]
    Data(#[from] DataError),
}

impl ReporterError {
    /// Create an invalid argument error.
    pub fn invalid_argument(
        argument: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a not found error for reporter `name`.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }
}

/// Result type alias using [`ReporterError`].
pub type ReporterResult<T> = Result<T, ReporterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_reporter() {
        let err = ReporterError::not_found("bar");
        assert_eq!(err.to_string(), "Unable to find reporter \"bar\"");
    }

    #[test]
    fn invalid_argument_message_is_actionable() {
        let err = ReporterError::invalid_argument("reporter name", "", "must not be empty");
        let msg = err.to_string();
        assert!(msg.contains("reporter name"));
        assert!(msg.contains("must not be empty"));
    }

    #[test]
    fn data_errors_pass_through() {
        let err: ReporterError = DataError::EmptyPath.into();
        assert_eq!(err.to_string(), DataError::EmptyPath.to_string());
    }
}
