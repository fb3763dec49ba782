//! Shared helpers for schema integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use fsb_schema::{Component, Schema, SchemaConfig};
use fsb_state::MemoryStore;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Install a test-writer subscriber once. Filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn make_store(data: Value) -> Rc<RefCell<MemoryStore>> {
    init_tracing();
    Rc::new(RefCell::new(MemoryStore::with_data(data)))
}

/// Root schema at `data` over `store`.
pub fn make_form(store: &Rc<RefCell<MemoryStore>>, components: Vec<Component>) -> Schema {
    make_form_with(store, SchemaConfig::default(), components)
}

pub fn make_form_with(
    store: &Rc<RefCell<MemoryStore>>,
    config: SchemaConfig,
    components: Vec<Component>,
) -> Schema {
    Schema::root(Rc::clone(store))
        .state_path("data")
        .with_config(config)
        .components(components)
        .expect("valid schema")
}

/// The store contents under `data`.
pub fn form_data(store: &Rc<RefCell<MemoryStore>>) -> Value {
    store
        .borrow()
        .data()
        .get("data")
        .cloned()
        .unwrap_or(Value::Null)
}

pub fn reversed(value: &Value) -> Value {
    Value::String(value.as_str().unwrap_or_default().chars().rev().collect())
}
