//! State store adapter and dot-path addressing for schema state trees.
//!
//! This crate provides:
//!
//! - **Dot-path access** (`access`): read, write and remove values in a nested
//!   `serde_json::Value` tree using paths like `data.address.street`
//! - **State store adapter** (`store`): the [`StateStore`] trait the schema
//!   engine reads and writes through, plus an in-memory [`MemoryStore`]
//! - **Path utilities** (`path`): joining, splitting and ancestor checks
//! - **Path resolution** (`resolver`): relative (`../`) and absolute lookup
//!   expressions resolved against a requester's container path
//!
//! # Path Semantics
//!
//! Segments are separated by `.`. Numeric segments are mapping keys: reading
//! `items.0` from a list returns its first element, and writing a key that is
//! not a valid list position turns the list into a mapping.
//!
//! # Example
//!
//! ```
//! use fsb_state::{MemoryStore, PathExpression, PathResolver, StateStore};
//! use serde_json::json;
//!
//! let mut store = MemoryStore::new();
//! store.set("data.name", json!("Ada"));
//!
//! let resolver = PathResolver::lenient();
//! let path = resolver
//!     .resolve("data.address", &PathExpression::parse("../name", false))
//!     .unwrap();
//!
//! assert_eq!(path, "data.name");
//! assert_eq!(store.get(&path), Some(json!("Ada")));
//! ```

pub mod access;
pub mod error;
pub mod path;
pub mod resolver;
pub mod store;

// Error types
pub use error::{PathError, Result};

// Dot-path access on raw values
pub use access::{data_forget, data_get, data_has, data_set};

// Path utilities
pub use path::{SEPARATOR, is_ancestor_or_self, join, last_segment, parent, relative_to, segments};

// Resolution
pub use resolver::{PARENT_TOKEN, PathExpression, PathResolver};

// Store adapter
pub use store::{MemoryStore, StateStore};
