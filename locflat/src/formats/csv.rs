//! Support for the flat CSV table layout.
//!
//! Tables are written with the header `key,string_value,translated_value,remarks`
//! and every field quoted. Reading only requires a `key` column and a value
//! column, which defaults to `string_value` but can be any header.
use std::{
    io::{BufRead, Cursor, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    flat::{FlatMap, FlatValue},
    traits::{Parser, read_text},
    types::Record,
};

/// Column holding the path key.
pub const KEY_COLUMN: &str = "key";
/// Column read for values unless overridden.
pub const DEFAULT_VALUE_COLUMN: &str = "string_value";
/// Column holding the value joined from a translation source.
pub const TRANSLATED_COLUMN: &str = "translated_value";
/// Free-text column; always written empty.
pub const REMARKS_COLUMN: &str = "remarks";

const HEADERS: [&str; 4] = [
    KEY_COLUMN,
    DEFAULT_VALUE_COLUMN,
    TRANSLATED_COLUMN,
    REMARKS_COLUMN,
];

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct CSVRecord {
    pub key: String,
    pub string_value: String,
    pub translated_value: Option<String>,
    pub remarks: String,
}

impl Parser for Vec<CSVRecord> {
    /// Parse from any reader, taking values from `string_value`.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        read_records(reader, DEFAULT_VALUE_COLUMN)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .quote_style(csv::QuoteStyle::Always)
            .from_writer(writer);
        // Written by hand so an empty table still gets its header row.
        wtr.write_record(HEADERS)?;
        for record in self {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Reads table rows, taking each row's value from `value_column`.
///
/// The `key` and value columns are required; `translated_value` and
/// `remarks` are picked up when present. Short rows yield empty fields.
pub fn read_records<R: BufRead>(reader: R, value_column: &str) -> Result<Vec<CSVRecord>, Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let position = |name: &str| headers.iter().position(|header| header.trim() == name);
    let require = |name: &str| {
        position(name)
            .ok_or_else(|| Error::InvalidResource(format!("CSV header is missing the `{}` column", name)))
    };

    let key_at = require(KEY_COLUMN)?;
    let value_at = require(value_column)?;
    let translated_at = position(TRANSLATED_COLUMN);
    let remarks_at = position(REMARKS_COLUMN);

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let field = |at: usize| row.get(at).unwrap_or_default().to_string();
        records.push(CSVRecord {
            key: field(key_at),
            string_value: field(value_at),
            translated_value: translated_at.map(field).filter(|v| !v.is_empty()),
            remarks: remarks_at.map(field).unwrap_or_default(),
        });
    }
    Ok(records)
}

/// Reads a table file (BOM-aware), taking values from `value_column`.
pub fn read_records_from<P: AsRef<Path>>(
    path: P,
    value_column: &str,
) -> Result<Vec<CSVRecord>, Error> {
    let decoded = read_text(path)?;
    read_records(Cursor::new(decoded), value_column)
}

/// Builds the flat map a table describes. Later rows win on duplicate keys.
pub fn to_flat_map(records: &[CSVRecord], infer_scalars: bool) -> FlatMap {
    records
        .iter()
        .map(|record| {
            (
                record.key.as_str(),
                FlatValue::from_text(&record.string_value, infer_scalars),
            )
        })
        .collect()
}

impl From<&Record> for CSVRecord {
    fn from(record: &Record) -> Self {
        CSVRecord {
            key: record.key.clone(),
            string_value: record.value.to_string(),
            translated_value: record.translation.as_ref().map(FlatValue::to_string),
            remarks: String::new(),
        }
    }
}
