//! The path codec: a reversible mapping between nested value trees and flat
//! path → scalar maps.
//!
//! [`flatten`] walks a tree depth-first and emits one entry per leaf scalar and
//! per empty container. [`unflatten`] replays those entries into a fresh tree,
//! deciding each container's kind (mapping or sequence) from the first segment
//! that addresses it.
//!
//! Both directions are total. When two entries disagree about the kind of a
//! container (`a.b` then `a[0]`), the later entry redefines that position and
//! the earlier content is dropped.

use serde_json::{Map, Value};
use tracing::warn;

use crate::{
    flat::{FlatMap, FlatValue},
    path::{PathScanner, Segment, child_index, child_key, is_plain_key},
};

/// Largest run of `null` padding [`unflatten`] inserts in front of a sparse
/// sequence index.
pub const MAX_INDEX_GAP: usize = 1 << 16;

/// Flattens a tree into a path → scalar map.
///
/// The root has the empty path, so a scalar or empty container at the root
/// produces a single entry keyed `""`.
///
/// ```rust
/// use locflat::{FlatValue, flatten};
/// use serde_json::json;
///
/// let flat = flatten(&json!({ "menu": { "items": [] }, "title": "Home" }));
/// assert_eq!(flat.get("menu.items"), Some(&FlatValue::EmptySequence));
/// assert_eq!(flat.get("title"), Some(&FlatValue::from("Home")));
/// ```
pub fn flatten(value: &Value) -> FlatMap {
    let mut flat = FlatMap::new();
    flatten_into(value, String::new(), &mut flat);
    flat
}

fn flatten_into(value: &Value, path: String, flat: &mut FlatMap) {
    match value {
        Value::Array(items) if items.is_empty() => {
            flat.insert(path, FlatValue::EmptySequence);
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_into(item, child_index(&path, index), flat);
            }
        }
        Value::Object(map) if map.is_empty() => {
            flat.insert(path, FlatValue::EmptyMapping);
        }
        Value::Object(map) => {
            for (key, item) in map {
                if !is_plain_key(key) {
                    warn!(parent = %path, key = %key, "mapping key will not survive unflatten unchanged");
                }
                flatten_into(item, child_key(&path, key), flat);
            }
        }
        Value::Null => {
            flat.insert(path, FlatValue::Null);
        }
        Value::Bool(b) => {
            flat.insert(path, FlatValue::Bool(*b));
        }
        Value::Number(n) => {
            flat.insert(path, FlatValue::Number(n.clone()));
        }
        Value::String(s) => {
            flat.insert(path, FlatValue::String(s.clone()));
        }
    }
}

/// Rebuilds a tree from a path → scalar map.
///
/// Entries are applied in map order. The empty-container markers land as empty
/// containers. Sequence indices past the current end pad the sequence with
/// nulls; an index more than [`MAX_INDEX_GAP`] past the end is appended at the
/// end instead. An empty map unflattens to an empty mapping.
///
/// ```rust
/// use locflat::{FlatMap, FlatValue, unflatten};
/// use serde_json::json;
///
/// let flat: FlatMap = [
///     ("a.b[0]", FlatValue::from("x")),
///     ("a.c", FlatValue::EmptyMapping),
/// ]
/// .into_iter()
/// .collect();
/// assert_eq!(unflatten(flat), json!({ "a": { "b": ["x"], "c": {} } }));
/// ```
pub fn unflatten(flat: FlatMap) -> Value {
    rebuild(flat.into_iter().map(|(path, leaf)| (path, leaf.into_value())))
}

/// Unflattens an untyped mapping of path → value.
///
/// Anything other than a mapping is already structured and is returned
/// unchanged. Mapping values are assigned as they are, so a non-empty
/// container found where a scalar was expected passes through intact.
pub fn unflatten_value(value: Value) -> Value {
    match value {
        Value::Object(map) => rebuild(map),
        other => other,
    }
}

fn rebuild<I>(entries: I) -> Value
where
    I: IntoIterator<Item = (String, Value)>,
{
    // Staging slot for the root; stays `None` when there are no entries.
    let mut root: Option<Value> = None;
    for (path, leaf) in entries {
        let segments: Vec<Segment> = PathScanner::new(&path).collect();
        let slot = root.get_or_insert(Value::Null);
        assign(slot, &path, &segments, leaf);
    }
    root.unwrap_or_else(|| Value::Object(Map::new()))
}

fn assign(slot: &mut Value, path: &str, segments: &[Segment], leaf: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *slot = leaf;
        return;
    };
    let child = match head {
        Segment::Key(key) => mapping_at(slot, path)
            .entry(key.clone())
            .or_insert(Value::Null),
        Segment::Index(index) => {
            let items = sequence_at(slot, path);
            let position = sequence_position(items.len(), *index, path);
            if items.len() <= position {
                items.resize(position + 1, Value::Null);
            }
            &mut items[position]
        }
    };
    assign(child, path, rest, leaf);
}

/// Where an index lands in a sequence of `len` items.
///
/// Indices up to [`MAX_INDEX_GAP`] past the end are padded to; anything further
/// is appended at the end instead.
fn sequence_position(len: usize, index: usize, path: &str) -> usize {
    match index.checked_sub(len) {
        Some(gap) if gap > MAX_INDEX_GAP => {
            warn!(path = %path, index, len, "sequence index too far past the end; appending instead");
            len
        }
        _ => index,
    }
}

fn mapping_at<'a>(slot: &'a mut Value, path: &str) -> &'a mut Map<String, Value> {
    if !slot.is_object() {
        redefine(slot, path, "mapping");
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot was just replaced by a mapping"),
    }
}

fn sequence_at<'a>(slot: &'a mut Value, path: &str) -> &'a mut Vec<Value> {
    if !slot.is_array() {
        redefine(slot, path, "sequence");
        *slot = Value::Array(Vec::new());
    }
    match slot {
        Value::Array(items) => items,
        _ => unreachable!("slot was just replaced by a sequence"),
    }
}

fn redefine(slot: &Value, path: &str, kind: &str) {
    if !slot.is_null() {
        warn!(path = %path, replaced = %slot, "redefining container as a {}", kind);
    }
}
