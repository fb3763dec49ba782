//! Unified error types for the fsb-schema crate.
//!
//! Configuration mistakes (mounting a component twice, attaching a rooted
//! schema as a child) are reported when the tree is built. Hook failures are
//! reported from the pass that ran the hook, with no rollback of writes already
//! made to the store.

use fsb_state::PathError;
use thiserror::Error;

use crate::hooks::{HookError, HookKind};

/// Unified error type for schema operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SchemaError {
    // =========================================================================
    // CONFIGURATION ERRORS
    // =========================================================================
    /// Component is already part of another container.
    #[error("Component '{component}' is already mounted in a schema")]
    ComponentAlreadyMounted {
        /// Key or state path of the component.
        component: String,
    },

    /// Schema already has a parent component or owns a state store.
    #[error("Schema '{path}' cannot be attached as a child schema")]
    SchemaAlreadyMounted {
        /// State path of the schema.
        path: String,
    },

    /// Two components in one container share an explicit key.
    #[error("Duplicate component key '{key}'")]
    DuplicateKey {
        /// The repeated key.
        key: String,
    },

    // =========================================================================
    // RUNTIME ERRORS
    // =========================================================================
    /// The tree has no root schema bound to a state store.
    #[error("No state store is bound above '{path}'")]
    StoreNotBound {
        /// State path of the component or schema that needed the store.
        path: String,
    },

    /// A lifecycle hook returned an error.
    #[error("{hook} hook failed for '{path}': {source}")]
    Hook {
        /// Which hook failed.
        hook: HookKind,
        /// State path of the component that owns the hook.
        path: String,
        /// The error returned by the hook.
        #[source]
        source: HookError,
    },

    // =========================================================================
    // WRAPPED ERRORS
    // =========================================================================
    /// Path resolution error (strict mode only).
    #[error("Path error: {0}")]
    Path(#[from] PathError),
}

/// Result type alias for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

impl SchemaError {
    /// Check if this error comes from how the tree was built rather than from
    /// running it.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::ComponentAlreadyMounted { .. }
                | Self::SchemaAlreadyMounted { .. }
                | Self::DuplicateKey { .. }
                | Self::StoreNotBound { .. }
        )
    }

    /// Get a user-friendly suggestion for fixing this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::ComponentAlreadyMounted { .. } => {
                Some("Create a separate component for each schema instead of sharing one.")
            }
            Self::SchemaAlreadyMounted { .. } => {
                Some("Only root schemas own a store; build child schemas with Schema::new().")
            }
            Self::DuplicateKey { .. } => Some("Give each component in a schema a unique key."),
            Self::StoreNotBound { .. } => {
                Some("Mount the component in a tree whose root was created with Schema::root().")
            }
            Self::Path(err) => err.suggestion(),
            Self::Hook { .. } => None,
        }
    }
}
