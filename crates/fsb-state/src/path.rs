//! Dot-delimited state path helpers.
//!
//! Paths are plain strings such as `data.address.street`. Empty segments are
//! ignored everywhere, so `join(["data", "", "x"])` is `data.x`.

/// Separator between path segments.
pub const SEPARATOR: char = '.';

/// Iterate over the non-empty segments of a path.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(|segment| !segment.is_empty())
}

/// Join segments into a path, skipping empty ones.
///
/// ```
/// assert_eq!(fsb_state::join(["data", "", "name"]), "data.name");
/// ```
pub fn join<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::new();
    for part in parts {
        for segment in segments(part) {
            if !out.is_empty() {
                out.push(SEPARATOR);
            }
            out.push_str(segment);
        }
    }
    out
}

/// The path with its last segment removed, or `None` for a single segment.
pub fn parent(path: &str) -> Option<&str> {
    path.rfind(SEPARATOR).map(|idx| &path[..idx])
}

/// The last segment of a path.
pub fn last_segment(path: &str) -> &str {
    path.rfind(SEPARATOR).map_or(path, |idx| &path[idx + 1..])
}

/// True if `ancestor` equals `path` or is a strict prefix of it on a segment
/// boundary. The empty path is an ancestor of everything.
pub fn is_ancestor_or_self(ancestor: &str, path: &str) -> bool {
    if ancestor.is_empty() || ancestor == path {
        return true;
    }
    path.len() > ancestor.len()
        && path.starts_with(ancestor)
        && path.as_bytes()[ancestor.len()] == SEPARATOR as u8
}

/// The remainder of `path` below `ancestor`.
///
/// Returns `Some("")` when both are equal and `None` when `ancestor` is not an
/// ancestor of `path`.
pub fn relative_to<'a>(ancestor: &str, path: &'a str) -> Option<&'a str> {
    if ancestor.is_empty() {
        return Some(path);
    }
    if ancestor == path {
        return Some("");
    }
    if is_ancestor_or_self(ancestor, path) {
        Some(&path[ancestor.len() + 1..])
    } else {
        None
    }
}
