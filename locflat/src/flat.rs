//! The flat side of the codec: path → scalar maps.

use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

/// Text used for an empty sequence in tabular/XML cells.
pub const EMPTY_SEQUENCE_TEXT: &str = "[]";
/// Text used for an empty mapping in tabular/XML cells.
pub const EMPTY_MAPPING_TEXT: &str = "{}";

/// A scalar leaf of a flattened tree.
///
/// `EmptySequence` and `EmptyMapping` are terminal markers: they stand for a
/// container with zero elements, which has no leaves of its own to emit.
#[derive(Debug, Clone, PartialEq)]
pub enum FlatValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    EmptySequence,
    EmptyMapping,
}

impl FlatValue {
    /// Converts the leaf back into a tree node; markers become empty containers.
    pub fn into_value(self) -> Value {
        match self {
            FlatValue::Null => Value::Null,
            FlatValue::Bool(b) => Value::Bool(b),
            FlatValue::Number(n) => Value::Number(n),
            FlatValue::String(s) => Value::String(s),
            FlatValue::EmptySequence => Value::Array(Vec::new()),
            FlatValue::EmptyMapping => Value::Object(Map::new()),
        }
    }

    /// Parses cell text produced by [`Display`].
    ///
    /// `[]` and `{}` always read back as the empty-container markers. With
    /// `infer_scalars`, `null`, `true`, `false` and JSON numbers are read as
    /// typed scalars; otherwise every other cell is a string.
    pub fn from_text(text: &str, infer_scalars: bool) -> Self {
        match text {
            EMPTY_SEQUENCE_TEXT => return FlatValue::EmptySequence,
            EMPTY_MAPPING_TEXT => return FlatValue::EmptyMapping,
            _ => {}
        }
        if infer_scalars {
            match text {
                "null" => return FlatValue::Null,
                "true" => return FlatValue::Bool(true),
                "false" => return FlatValue::Bool(false),
                _ => {}
            }
            if let Ok(number) = text.parse::<Number>() {
                return FlatValue::Number(number);
            }
        }
        FlatValue::String(text.to_string())
    }

    /// Returns `true` for the two empty-container markers.
    pub fn is_marker(&self) -> bool {
        matches!(self, FlatValue::EmptySequence | FlatValue::EmptyMapping)
    }
}

/// Cell text of the leaf, as written to CSV and XML.
impl Display for FlatValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FlatValue::Null => write!(f, "null"),
            FlatValue::Bool(b) => write!(f, "{}", b),
            FlatValue::Number(n) => write!(f, "{}", n),
            FlatValue::String(s) => write!(f, "{}", s),
            FlatValue::EmptySequence => write!(f, "{}", EMPTY_SEQUENCE_TEXT),
            FlatValue::EmptyMapping => write!(f, "{}", EMPTY_MAPPING_TEXT),
        }
    }
}

/// Splits off the leaves of a tree node.
///
/// Non-empty containers are handed back unchanged in `Err`, since a flat map
/// cannot hold them.
impl TryFrom<Value> for FlatValue {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(FlatValue::Null),
            Value::Bool(b) => Ok(FlatValue::Bool(b)),
            Value::Number(n) => Ok(FlatValue::Number(n)),
            Value::String(s) => Ok(FlatValue::String(s)),
            Value::Array(items) if items.is_empty() => Ok(FlatValue::EmptySequence),
            Value::Object(map) if map.is_empty() => Ok(FlatValue::EmptyMapping),
            other => Err(other),
        }
    }
}

impl From<&str> for FlatValue {
    fn from(value: &str) -> Self {
        FlatValue::String(value.to_string())
    }
}

impl From<String> for FlatValue {
    fn from(value: String) -> Self {
        FlatValue::String(value)
    }
}

/// Ordered mapping from path strings to leaves.
///
/// Entries keep their first insertion position; inserting an existing path
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatMap {
    entries: IndexMap<String, FlatValue>,
}

impl FlatMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a leaf, returning the value previously stored at `path`.
    pub fn insert(&mut self, path: impl Into<String>, value: FlatValue) -> Option<FlatValue> {
        self.entries.insert(path.into(), value)
    }

    pub fn get(&self, path: &str) -> Option<&FlatValue> {
        self.entries.get(path)
    }

    pub fn contains_key(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlatValue)> {
        self.entries.iter().map(|(path, value)| (path.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl IntoIterator for FlatMap {
    type Item = (String, FlatValue);
    type IntoIter = indexmap::map::IntoIter<String, FlatValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>> FromIterator<(K, FlatValue)> for FlatMap {
    fn from_iter<I: IntoIterator<Item = (K, FlatValue)>>(iter: I) -> Self {
        let mut map = FlatMap::new();
        for (path, value) in iter {
            map.insert(path, value);
        }
        map
    }
}
