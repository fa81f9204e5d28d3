//! Report options and identifier validation.

use base_app::KeyPath;
use serde_json::{Map, Value};

use crate::error::{ReporterError, ReporterResult};

/// An options record: string keys to JSON values.
pub type Options = Map<String, Value>;

/// Shallow merge: start from `base`, then apply `overrides` on top.
///
/// Keys present in both take the override's value; keys only in `base`
/// are kept as they are.
pub fn merge_options(base: &Options, overrides: Option<&Options>) -> Options {
    let mut merged = base.clone();
    if let Some(overrides) = overrides {
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Convert a JSON value into an options record.
///
/// `null` becomes an empty record; anything other than an object is rejected.
pub fn into_options(value: Value) -> ReporterResult<Options> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Options::new()),
        other => Err(ReporterError::invalid_argument(
            "options",
            other.to_string(),
            "expected a JSON object",
        )),
    }
}

/// Validate an identifier used for reporter and property names.
///
/// Must be non-empty, at most 64 characters, contain only ASCII
/// alphanumerics, `_` or `-`, and start with a letter or `_`.
pub fn validate_name(kind: &str, name: &str) -> ReporterResult<()> {
    let reason = if name.is_empty() {
        "must not be empty"
    } else if name.len() > 64 {
        "must be at most 64 characters"
    } else if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        "may only contain letters, digits, '_' and '-'"
    } else if !name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        "must start with a letter or '_'"
    } else {
        return Ok(());
    };

    Err(ReporterError::invalid_argument(kind, name, reason))
}

/// Parse a property name into a store path.
///
/// `a.b` addresses key `b` inside object `a`. Every segment must be a valid
/// name; empty segments (`a..b`, `.a`) are rejected.
pub fn property_path(property: &str) -> ReporterResult<KeyPath> {
    for segment in property.split('.') {
        if validate_name("property name", segment).is_err() {
            return Err(ReporterError::invalid_argument(
                "property name",
                property,
                "each dotted segment must be a valid name",
            ));
        }
    }
    Ok(KeyPath::dotted(property))
}
