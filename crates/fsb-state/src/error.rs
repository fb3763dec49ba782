//! Error types for path resolution.

use thiserror::Error;

/// Errors that can occur when resolving a lookup expression.
///
/// Lenient resolution never fails; these are only produced by a strict
/// [`PathResolver`](crate::PathResolver).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PathError {
    /// The expression climbs above the store root.
    #[error("expression '{expression}' climbs {requested} levels above '{base}' (depth {depth})")]
    ParentOutOfRange {
        /// The lookup expression as written.
        expression: String,
        /// The container path the expression was resolved against.
        base: String,
        /// Number of `../` tokens in the expression.
        requested: usize,
        /// Number of segments available in `base`.
        depth: usize,
    },

    /// The expression has an empty segment, e.g. `a..b`.
    #[error("expression '{expression}' contains an empty segment")]
    EmptySegment {
        /// The lookup expression as written.
        expression: String,
    },
}

impl PathError {
    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::ParentOutOfRange { .. } => {
                Some("Remove a leading '../' or use an absolute expression instead.")
            }
            Self::EmptySegment { .. } => Some("Remove the doubled '.' from the expression."),
        }
    }
}

/// Result type for path resolution.
pub type Result<T> = std::result::Result<T, PathError>;
