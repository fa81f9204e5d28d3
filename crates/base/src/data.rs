//! Key/value data store.
//!
//! Values are JSON. Paths address nested objects one segment at a time, so
//! `["stats", "count"]` reads `{"stats": {"count": ...}}`. Every operation
//! takes the store lock once, which makes each call atomic with respect to
//! other calls on the same store.

use std::fmt;

use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::error::DataError;

/// A path into a [`DataStore`]: one key or an ordered sequence of nested keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// Build a path by splitting `path` on `.`; empty segments are dropped.
    pub fn dotted(path: &str) -> Self {
        Self(
            path.split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Path segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Whether the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl From<&str> for KeyPath {
    fn from(key: &str) -> Self {
        Self(vec![key.to_string()])
    }
}

impl From<String> for KeyPath {
    fn from(key: String) -> Self {
        Self(vec![key])
    }
}

impl From<&String> for KeyPath {
    fn from(key: &String) -> Self {
        Self(vec![key.clone()])
    }
}

impl From<Vec<String>> for KeyPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl<const N: usize> From<[&str; N]> for KeyPath {
    fn from(segments: [&str; N]) -> Self {
        Self(segments.iter().map(|s| s.to_string()).collect())
    }
}

impl From<&[&str]> for KeyPath {
    fn from(segments: &[&str]) -> Self {
        Self(segments.iter().map(|s| s.to_string()).collect())
    }
}

/// Nested JSON key/value storage.
#[derive(Debug, Default)]
pub struct DataStore {
    values: RwLock<Map<String, Value>>,
}

impl DataStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a copy of the value at `path`.
    pub fn get(&self, path: impl Into<KeyPath>) -> Option<Value> {
        let path = path.into();
        let values = self.values.read();
        lookup(&values, &path).cloned()
    }

    /// Check whether a value exists at `path`.
    pub fn has(&self, path: impl Into<KeyPath>) -> bool {
        let path = path.into();
        let values = self.values.read();
        lookup(&values, &path).is_some()
    }

    /// Set the value at `path`, creating intermediate objects as needed.
    pub fn set(&self, path: impl Into<KeyPath>, value: Value) -> Result<(), DataError> {
        let path = path.into();
        let mut values = self.values.write();
        *slot_mut(&mut values, &path)? = value;
        Ok(())
    }

    /// Append `value` to the sequence at `path`.
    ///
    /// - No value at `path`: a new sequence holding `value` is created.
    /// - A sequence: `value` is appended unless an equal element is present.
    /// - Any other value: it becomes the first element of a new sequence.
    ///
    /// An array `value` is unioned element by element.
    ///
    /// The duplicate check scans the sequence, so building a sequence of `n`
    /// items one union at a time is O(n²) comparisons.
    pub fn union(&self, path: impl Into<KeyPath>, value: Value) -> Result<(), DataError> {
        let path = path.into();
        let mut values = self.values.write();
        let slot = slot_mut(&mut values, &path)?;

        let mut items = match slot.take() {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            other => vec![other],
        };

        match value {
            Value::Array(incoming) => {
                for v in incoming {
                    push_unique(&mut items, v);
                }
            }
            v => push_unique(&mut items, v),
        }

        *slot = Value::Array(items);
        Ok(())
    }

    /// Remove and return the value at `path`.
    pub fn del(&self, path: impl Into<KeyPath>) -> Option<Value> {
        let path = path.into();
        let (last, parents) = path.segments().split_last()?;
        let mut values = self.values.write();

        let mut map = &mut *values;
        for segment in parents {
            map = map.get_mut(segment)?.as_object_mut()?;
        }
        map.remove(last)
    }

    /// Top-level keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.values.read().keys().cloned().collect()
    }

    /// Copy of the whole store as a JSON object.
    pub fn snapshot(&self) -> Value {
        Value::Object(self.values.read().clone())
    }
}

fn lookup<'a>(root: &'a Map<String, Value>, path: &KeyPath) -> Option<&'a Value> {
    let (first, rest) = path.segments().split_first()?;
    let mut current = root.get(first)?;
    for segment in rest {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Find the slot for `path`, creating intermediate objects. A missing leaf is
/// inserted as `null`.
fn slot_mut<'a>(root: &'a mut Map<String, Value>, path: &KeyPath) -> Result<&'a mut Value, DataError> {
    let (last, parents) = path.segments().split_last().ok_or(DataError::EmptyPath)?;

    let mut map = root;
    for segment in parents {
        let entry = map
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        map = match entry {
            Value::Object(inner) => inner,
            _ => return Err(DataError::not_an_object(path.to_string(), segment.clone())),
        };
    }

    Ok(map.entry(last.clone()).or_insert(Value::Null))
}

fn push_unique(items: &mut Vec<Value>, value: Value) {
    if !items.contains(&value) {
        items.push(value);
    }
}
