//! All supported file formats for locflat.
//!
//! This module re-exports the main types for each format and provides
//! the [`FormatType`] enum for generic format handling across the crate.

pub mod csv;
pub mod json;
pub mod xml;

use std::{
    fmt::{Display, Formatter},
    path::Path,
    str::FromStr,
};

// Reexporting the formats for easier access
pub use self::csv::CSVRecord;
pub use self::json::Document as JsonDocument;
pub use self::xml::Format as XmlFormat;

use crate::Error;

/// The three native representations a conversion reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatType {
    /// Nested JSON tree.
    Json,
    /// Flat `key,string_value,translated_value,remarks` table.
    Csv,
    /// `<resources>` document of `<string name="…">` elements.
    Xml,
}

impl Display for FormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Json => write!(f, "json"),
            FormatType::Csv => write!(f, "csv"),
            FormatType::Xml => write!(f, "xml"),
        }
    }
}

/// Accepts `json`, `csv` and `xml`, case-insensitively.
impl FromStr for FormatType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" | "js" => Ok(FormatType::Json),
            "csv" => Ok(FormatType::Csv),
            "xml" => Ok(FormatType::Xml),
            other => Err(Error::DataMismatch(format!("unknown format `{}`", other))),
        }
    }
}

impl FormatType {
    /// Returns the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Json => "json",
            FormatType::Csv => "csv",
            FormatType::Xml => "xml",
        }
    }

    /// Infers the format from a file extension, if it is one of ours.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}
