#![forbid(unsafe_code)]
//! Localization resource converter built around a reversible key codec.
//!
//! Nested JSON trees, flat CSV tables, and Android-style XML string resources
//! are exchanged through one flat model: a [`FlatMap`] from dotted/indexed
//! path strings (`menu.items[0].title`) to scalar values.
//!
//! # Quick Start
//!
//! ```rust
//! use locflat::{flatten, unflatten};
//! use serde_json::json;
//!
//! let tree = json!({ "a": { "b": [10, 20] }, "c": "x" });
//! let flat = flatten(&tree);
//! assert_eq!(flat.keys().collect::<Vec<_>>(), ["a.b[0]", "a.b[1]", "c"]);
//! assert_eq!(unflatten(flat), tree);
//! ```
//!
//! Whole-file conversions go through [`convert`]:
//!
//! ```rust,no_run
//! use locflat::{Conversion, ConvertOptions, convert};
//!
//! let options = ConvertOptions::new().with_translation(Some("fr.json".into()));
//! convert(Conversion::JsonToCsv, "en.json", "strings.csv", &options)?;
//! # Ok::<(), locflat::Error>(())
//! ```
//!
//! # Scalar Types in CSV and XML
//!
//! CSV cells and XML element text carry no type. Numbers, booleans and `null`
//! are written as their JSON text, and by default they read back as strings,
//! so `{"count": 3}` comes back from a JSON → CSV → JSON trip as
//! `{"count": "3"}`. Enable [`ConvertOptions::with_infer_scalars`] (the CLI's
//! `--infer-types`) to read such cells as typed values again; only then does a
//! trip through CSV or XML reproduce the original tree. `[]` and `{}` always
//! read back as empty containers.
//!
//! # Supported Formats
//!
//! - **JSON**: nested trees, plain documents or `module.exports = …;` modules
//! - **CSV**: `key,string_value,translated_value,remarks` tables
//! - **XML**: `<resources><string name="…">…</string></resources>` documents

pub mod codec;
pub mod converter;
pub mod error;
pub mod flat;
pub mod formats;
pub mod options;
pub mod path;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    codec::{flatten, unflatten, unflatten_value},
    converter::{Conversion, ConversionSummary, convert, join},
    error::Error,
    flat::{FlatMap, FlatValue},
    formats::FormatType,
    options::{ConvertOptions, JsonLayout},
    path::{PathScanner, Segment},
    types::Record,
};
