//! State store adapter.
//!
//! The schema engine never owns state. It reads and writes through a
//! [`StateStore`], addressed by absolute dot paths from the store root.

use serde_json::{Map, Value};

use crate::access::{data_get, data_has, data_set};

/// Nested state holder the schema engine reads and writes through.
///
/// Implementations must:
/// - return `None` for missing paths (including missing intermediate levels)
///   instead of failing
/// - create intermediate mappings on `set`
/// - treat numeric segments as mapping keys
pub trait StateStore {
    /// Read a copy of the value at `path`.
    fn get(&self, path: &str) -> Option<Value>;

    /// Write `value` at `path`.
    fn set(&mut self, path: &str, value: Value);

    /// True if a value, possibly `null`, exists at `path`.
    fn has(&self, path: &str) -> bool {
        self.get(path).is_some()
    }
}

/// In-memory store backed by a single `serde_json::Value` mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryStore {
    root: Value,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }

    /// Create a store holding `root`.
    pub fn with_data(root: Value) -> Self {
        Self { root }
    }

    /// The whole state tree.
    pub fn data(&self) -> &Value {
        &self.root
    }

    /// Consume the store, returning its state tree.
    pub fn into_data(self) -> Value {
        self.root
    }
}

impl StateStore for MemoryStore {
    fn get(&self, path: &str) -> Option<Value> {
        data_get(&self.root, path).cloned()
    }

    fn set(&mut self, path: &str, value: Value) {
        data_set(&mut self.root, path, value);
    }

    fn has(&self, path: &str) -> bool {
        data_has(&self.root, path)
    }
}
