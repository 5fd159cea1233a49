//! Path strings: the flat keys that address a position in a nested tree.
//!
//! A path is a left-to-right chain of `.name` and `[index]` segments starting
//! from an implicit root, written without a leading dot: `a.b[0].c`.

use std::fmt::{Display, Formatter};

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Mapping-key access (`.name`).
    Key(String),
    /// Sequence-index access (`[i]`).
    Index(usize),
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Key(key) => write!(f, ".{}", key),
            Segment::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Tokenizes a path string into [`Segment`]s.
///
/// At each position the scanner tries, in order: an optional `.` followed by a
/// run of characters other than `.`, `[` and `]` (a key), then a bracketed run
/// of decimal digits (an index). When neither matches, one character is
/// skipped, so stray separators never produce empty keys.
///
/// ```rust
/// use locflat::{PathScanner, Segment};
///
/// let segments: Vec<_> = PathScanner::new("a.b[0].c").collect();
/// assert_eq!(
///     segments,
///     [
///         Segment::Key("a".into()),
///         Segment::Key("b".into()),
///         Segment::Index(0),
///         Segment::Key("c".into()),
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct PathScanner<'a> {
    path: &'a str,
    pos: usize,
}

impl<'a> PathScanner<'a> {
    pub fn new(path: &'a str) -> Self {
        PathScanner { path, pos: 0 }
    }

    fn scan_key(&self, start: usize) -> Option<(Segment, usize)> {
        let rest = &self.path[start..];
        let body = rest.strip_prefix('.').unwrap_or(rest);
        let len = body.find(is_separator).unwrap_or(body.len());
        if len == 0 {
            return None;
        }
        let consumed = rest.len() - body.len() + len;
        Some((Segment::Key(body[..len].to_string()), start + consumed))
    }

    fn scan_index(&self, start: usize) -> Option<(Segment, usize)> {
        let body = self.path[start..].strip_prefix('[')?;
        let digits = body.find(|c: char| !c.is_ascii_digit()).unwrap_or(body.len());
        if digits == 0 || !body[digits..].starts_with(']') {
            return None;
        }
        let index = body[..digits].parse().ok()?;
        Some((Segment::Index(index), start + 1 + digits + 1))
    }
}

impl Iterator for PathScanner<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        while self.pos < self.path.len() {
            let start = self.pos;
            if let Some((segment, end)) = self.scan_key(start).or_else(|| self.scan_index(start)) {
                self.pos = end;
                return Some(segment);
            }
            // Skip one unmatched character.
            let skipped = self.path[start..].chars().next().map_or(1, char::len_utf8);
            self.pos = start + skipped;
        }
        None
    }
}

fn is_separator(c: char) -> bool {
    matches!(c, '.' | '[' | ']')
}

/// Returns `true` when `key` survives a flatten/unflatten round trip as a single
/// mapping key.
pub fn is_plain_key(key: &str) -> bool {
    !key.is_empty() && !key.contains(is_separator)
}

/// Path of the mapping entry `key` under `parent`.
pub fn child_key(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

/// Path of the sequence element `index` under `parent`.
pub fn child_index(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}
