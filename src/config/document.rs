//! In-memory configuration document.

use serde_yaml::{Mapping, Value};

/// Ordered key-value representation of one configuration file.
///
/// Keys are strings; iteration follows insertion order, which for a
/// document returned by the reader is the order of the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDocument {
    entries: Mapping,
}

impl ConfigDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys in the document.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the document has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Look up the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Insert or replace a value, returning the previous one.
    ///
    /// Replacing keeps the key at its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(Value::String(key.into()), value.into())
    }

    /// Remove `key`, returning its value. Later keys keep their order.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Iterate keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(key, _)| key)
    }

    /// Iterate `(key, value)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .filter_map(|(key, value)| key.as_str().map(|k| (k, value)))
    }

    /// String value of `key`, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Unsigned integer value of `key`, if present and an integer.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(Value::as_u64)
    }

    /// Float value of `key`; integers are widened.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    /// Boolean value of `key`, if present and a boolean.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ConfigDocument {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut doc = Self::new();
        for (key, value) in iter {
            doc.insert(key, value);
        }
        doc
    }
}

impl serde::Serialize for ConfigDocument {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&self.entries, serializer)
    }
}
