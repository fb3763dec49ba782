//! Dot-path access on nested `serde_json::Value` trees.
//!
//! These helpers never fail. Reads through missing or scalar levels return
//! `None`; writes create intermediate mappings as needed.

use serde_json::{Map, Value};

use crate::path::segments;

/// Read the value at `path`. The empty path returns `root` itself.
pub fn data_get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in segments(path) {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// True if a value (possibly `null`) exists at `path`.
pub fn data_has(root: &Value, path: &str) -> bool {
    data_get(root, path).is_some()
}

/// Write `value` at `path`, creating intermediate mappings.
///
/// Scalars met on the way are replaced by mappings. A list keeps its shape when
/// the segment addresses an existing element or the next free position;
/// otherwise it becomes a mapping keyed by the former indices.
pub fn data_set(root: &mut Value, path: &str, value: Value) {
    let mut current = root;
    for segment in segments(path) {
        current = child_slot(current, segment);
    }
    *current = value;
}

/// Remove the value at `path`. Missing paths are left untouched.
pub fn data_forget(root: &mut Value, path: &str) {
    let parts: Vec<&str> = segments(path).collect();
    let Some((last, ancestors)) = parts.split_last() else {
        return;
    };

    let mut current = root;
    for segment in ancestors {
        current = match current {
            Value::Object(map) => match map.get_mut(*segment) {
                Some(next) => next,
                None => return,
            },
            Value::Array(items) => match segment.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
                Some(next) => next,
                None => return,
            },
            _ => return,
        };
    }

    // Removing from a list would shift the keys of later elements.
    let in_list = matches!(
        current,
        Value::Array(items) if last.parse::<usize>().is_ok_and(|i| i < items.len())
    );
    if in_list {
        ensure_object(current);
    }
    if let Value::Object(map) = current {
        map.shift_remove(*last);
    }
}

fn list_position(segment: &str, len: usize) -> Option<usize> {
    segment.parse::<usize>().ok().filter(|index| *index <= len)
}

fn child_slot<'v>(current: &'v mut Value, segment: &str) -> &'v mut Value {
    let position = match current {
        Value::Array(items) => list_position(segment, items.len()),
        _ => None,
    };
    match (position, current) {
        (Some(index), Value::Array(items)) => {
            if index == items.len() {
                items.push(Value::Null);
            }
            &mut items[index]
        }
        (_, current) => ensure_object(current)
            .entry(segment)
            .or_insert(Value::Null),
    }
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        let promoted = match value.take() {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), item))
                .collect(),
            _ => Map::new(),
        };
        *value = Value::Object(promoted);
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was promoted to an object above"),
    }
}
