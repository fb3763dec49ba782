//! Schema engine configuration.

use fsb_state::PathResolver;
use serde::{Deserialize, Serialize};

/// Where hydration takes a component's value from when the caller's data does
/// not name it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillStrategy {
    /// Explicit data, then the value already in the store, then the default.
    #[default]
    Merge,
    /// Explicit data, then the default. Values already in the store are
    /// overwritten.
    Reset,
}

/// Configuration read from the root schema of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// How `fill` treats state already present in the store.
    pub fill_strategy: FillStrategy,

    /// Reject relative lookups that climb past the store root instead of
    /// clamping them.
    pub strict_paths: bool,

    /// Only fire `after_state_updated` when the component's state differs
    /// from the state it had the last time the hook fired.
    pub dedupe_updates: bool,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            fill_strategy: FillStrategy::Merge,
            strict_paths: false,
            dedupe_updates: true,
        }
    }
}

impl SchemaConfig {
    /// Config where `fill` resets the form, ignoring existing store values.
    pub fn resetting() -> Self {
        Self {
            fill_strategy: FillStrategy::Reset,
            ..Default::default()
        }
    }

    /// Config with strict path resolution.
    pub fn strict() -> Self {
        Self {
            strict_paths: true,
            ..Default::default()
        }
    }

    /// The path resolver matching `strict_paths`.
    pub fn path_resolver(&self) -> PathResolver {
        PathResolver::new(self.strict_paths)
    }
}
