//! Schema component trees bound to nested state.
//!
//! This crate provides:
//!
//! - **Components** (`component`): fields and transparent layout nodes with
//!   defaults, visibility, disablement, dehydration flags, validation rules and
//!   lifecycle hooks
//! - **Schemas** (`schema`): ordered component containers; the root schema owns
//!   the [`StateStore`](fsb_state::StateStore) handle and the configuration
//! - **Hydration** (`Schema::fill`): writes explicit, existing or default state
//!   for every component
//! - **Update propagation** (`Schema::update_state`,
//!   `Schema::call_after_state_updated`): notifies the component owning a
//!   changed path and its ancestors
//! - **Dehydration** (`Schema::dehydrate_state`,
//!   `Schema::mutate_dehydrated_state`): builds the submitted mapping from the
//!   components that are dehydrated
//! - **Validation wiring** (`Schema::get_validation_rules`)
//!
//! # Module Organization
//!
//! - `component`: component handle and builder
//! - `schema`: container handle, tree navigation, lookup
//! - `engine`: hydration, update and dehydration passes
//! - `hooks`: hook types and the `Get`/`Set` helpers
//! - `flag`: static or computed boolean settings
//! - `config`: [`SchemaConfig`]
//! - `error`: [`SchemaError`]
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use fsb_schema::{Component, Schema};
//! use fsb_state::MemoryStore;
//! use serde_json::json;
//!
//! let store = Rc::new(RefCell::new(MemoryStore::new()));
//! let schema = Schema::root(store.clone())
//!     .state_path("data")
//!     .components(vec![
//!         Component::field("name").default_state(json!("Ada")),
//!         Component::field("token").hidden(),
//!     ])?;
//!
//! schema.fill(None)?;
//! assert_eq!(
//!     store.borrow().data(),
//!     &json!({"data": {"name": "Ada", "token": null}})
//! );
//! assert_eq!(schema.dehydrate_state()?, json!({"data": {"name": "Ada"}}));
//! # Ok::<(), fsb_schema::SchemaError>(())
//! ```

pub mod component;
pub mod config;
pub mod engine;
pub mod error;
pub mod flag;
pub mod hooks;
pub mod schema;
mod validation;

// Tree
pub use component::Component;
pub use schema::{Schema, SharedStore};

// Hooks
pub use flag::{Flag, Predicate};
pub use hooks::{
    Get, HookContext, HookError, HookKind, HookResult, Set, StateHook, TransformHook,
};

// Configuration
pub use config::{FillStrategy, SchemaConfig};
pub use engine::FillOptions;

// Error types
pub use error::{Result, SchemaError};
