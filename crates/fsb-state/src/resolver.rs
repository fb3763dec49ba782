//! Relative and absolute lookup expressions.
//!
//! A component looking up another component's state passes an expression:
//!
//! | Expression        | Requester container | Resolved       |
//! |-------------------|---------------------|----------------|
//! | `name`            | `data.address`      | `data.address.name` |
//! | `../name`         | `data.address`      | `data.name`    |
//! | `../../name`      | `data.address`      | `name`         |
//! | `data.name` (abs) | anything            | `data.name`    |
//!
//! The requester container path is the requester's own state path without its
//! own trailing segment, so a plain key addresses a sibling.

use crate::error::{PathError, Result};
use crate::path::{join, segments};

/// Token that climbs one level in a relative expression.
pub const PARENT_TOKEN: &str = "../";

/// A parsed lookup expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathExpression<'a> {
    raw: &'a str,
    parent_levels: usize,
    key: &'a str,
    absolute: bool,
}

impl<'a> PathExpression<'a> {
    /// Parse `raw`. Leading `../` tokens are only meaningful for relative
    /// expressions; an absolute expression is used verbatim.
    pub fn parse(raw: &'a str, is_absolute: bool) -> Self {
        if is_absolute {
            return Self {
                raw,
                parent_levels: 0,
                key: raw,
                absolute: true,
            };
        }

        let mut key = raw;
        let mut parent_levels = 0;
        while let Some(rest) = key.strip_prefix(PARENT_TOKEN) {
            parent_levels += 1;
            key = rest;
        }

        Self {
            raw,
            parent_levels,
            key,
            absolute: false,
        }
    }

    /// A relative expression.
    pub fn relative(raw: &'a str) -> Self {
        Self::parse(raw, false)
    }

    /// An absolute expression.
    pub fn absolute(raw: &'a str) -> Self {
        Self::parse(raw, true)
    }

    /// The expression as written.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Number of leading `../` tokens.
    pub fn parent_levels(&self) -> usize {
        self.parent_levels
    }

    /// The key left after the `../` tokens.
    pub fn key(&self) -> &'a str {
        self.key
    }

    /// Whether the expression bypasses ancestor resolution.
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    fn has_empty_segment(&self) -> bool {
        let key = self.key.trim_end_matches('.');
        !key.is_empty() && key.split('.').any(str::is_empty)
    }
}

/// Resolves lookup expressions into absolute store paths.
///
/// A lenient resolver clamps `../` tokens that climb past the root; a strict one
/// reports them as [`PathError::ParentOutOfRange`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathResolver {
    strict: bool,
}

impl PathResolver {
    /// Create a resolver.
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Resolver that clamps at the root.
    pub fn lenient() -> Self {
        Self::new(false)
    }

    /// Resolver that rejects expressions climbing past the root.
    pub fn strict() -> Self {
        Self::new(true)
    }

    /// Whether this resolver rejects out-of-range expressions.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Resolve `expression` against the requester's container path.
    ///
    /// # Errors
    ///
    /// Only a strict resolver fails, for expressions with empty segments or
    /// more `../` tokens than `container_path` has segments.
    pub fn resolve(&self, container_path: &str, expression: &PathExpression<'_>) -> Result<String> {
        if self.strict && expression.has_empty_segment() {
            return Err(PathError::EmptySegment {
                expression: expression.raw().to_string(),
            });
        }

        if expression.is_absolute() {
            return Ok(join([expression.key()]));
        }

        let base: Vec<&str> = segments(container_path).collect();
        let depth = base.len();
        let requested = expression.parent_levels();

        if requested > depth {
            if self.strict {
                return Err(PathError::ParentOutOfRange {
                    expression: expression.raw().to_string(),
                    base: container_path.to_string(),
                    requested,
                    depth,
                });
            }
            tracing::warn!(
                expression = %expression.raw(),
                base = %container_path,
                requested,
                depth,
                "Relative path climbs past the store root, clamping to root"
            );
        }

        let kept = depth.saturating_sub(requested);
        Ok(join(base[..kept].iter().copied().chain([expression.key()])))
    }
}
