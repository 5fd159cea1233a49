//! Whole-file conversions between the JSON, CSV and XML layouts.
//!
//! Every run reads its complete source (and optional translation source) into
//! memory, routes it through the flat model, and only then creates the
//! destination file, so a source that fails to read or parse never leaves an
//! output file behind.

use std::{
    fmt::{Display, Formatter},
    path::Path,
    str::FromStr,
};

use tracing::{debug, warn};

use crate::{
    codec::{flatten, unflatten},
    error::Error,
    flat::{FlatMap, FlatValue},
    formats::{
        FormatType, JsonDocument, XmlFormat,
        csv::{self, CSVRecord},
    },
    options::ConvertOptions,
    traits::Parser,
    types::Record,
};

/// A conversion direction, named after its source and target formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conversion {
    JsonToCsv,
    CsvToJson,
    XmlToCsv,
    CsvToXml,
    JsonToXml,
    XmlToJson,
}

impl Conversion {
    pub const ALL: [Conversion; 6] = [
        Conversion::JsonToCsv,
        Conversion::CsvToJson,
        Conversion::XmlToCsv,
        Conversion::CsvToXml,
        Conversion::JsonToXml,
        Conversion::XmlToJson,
    ];

    pub fn source_format(&self) -> FormatType {
        match self {
            Conversion::JsonToCsv | Conversion::JsonToXml => FormatType::Json,
            Conversion::CsvToJson | Conversion::CsvToXml => FormatType::Csv,
            Conversion::XmlToCsv | Conversion::XmlToJson => FormatType::Xml,
        }
    }

    pub fn target_format(&self) -> FormatType {
        match self {
            Conversion::CsvToJson | Conversion::XmlToJson => FormatType::Json,
            Conversion::JsonToCsv | Conversion::XmlToCsv => FormatType::Csv,
            Conversion::CsvToXml | Conversion::JsonToXml => FormatType::Xml,
        }
    }
}

/// Renders as `json-to-csv`, `csv-to-json`, and so on.
impl Display for Conversion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-to-{}", self.source_format(), self.target_format())
    }
}

/// Accepts camelCase (`jsonToCsv`), kebab-case and snake_case spellings,
/// case-insensitively.
impl FromStr for Conversion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], "");
        match normalized.as_str() {
            "jsontocsv" => Ok(Conversion::JsonToCsv),
            "csvtojson" => Ok(Conversion::CsvToJson),
            "xmltocsv" => Ok(Conversion::XmlToCsv),
            "csvtoxml" => Ok(Conversion::CsvToXml),
            "jsontoxml" => Ok(Conversion::JsonToXml),
            "xmltojson" => Ok(Conversion::XmlToJson),
            _ => Err(Error::UnknownCommand(s.to_string())),
        }
    }
}

/// What a finished conversion produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    pub conversion: Conversion,
    /// Entries (rows, elements, or leaves) written to the destination.
    pub entries: usize,
    /// Entries that received a translated value.
    pub translated: usize,
}

/// Joins a primary entry list with a translation lookup by identical path.
///
/// Every primary entry yields exactly one [`Record`], in primary order. A path
/// missing from `secondary` gets no translation; paths only present in
/// `secondary` are ignored.
pub fn join<I>(primary: I, secondary: Option<&FlatMap>) -> Vec<Record>
where
    I: IntoIterator<Item = (String, FlatValue)>,
{
    primary
        .into_iter()
        .map(|(key, value)| {
            let translation = secondary.and_then(|lookup| lookup.get(&key)).cloned();
            Record::new(key, value).with_translation(translation)
        })
        .collect()
}

/// Runs one conversion from `source` to `destination`.
///
/// # Example
///
/// ```rust,no_run
/// use locflat::{Conversion, ConvertOptions, convert};
///
/// let summary = convert(Conversion::XmlToCsv, "strings.xml", "strings.csv", &ConvertOptions::new())?;
/// println!("{} rows", summary.entries);
/// # Ok::<(), locflat::Error>(())
/// ```
pub fn convert<S, D>(
    conversion: Conversion,
    source: S,
    destination: D,
    options: &ConvertOptions,
) -> Result<ConversionSummary, Error>
where
    S: AsRef<Path>,
    D: AsRef<Path>,
{
    let source = source.as_ref();
    let destination = destination.as_ref();
    check_extension(source, conversion.source_format());
    check_extension(destination, conversion.target_format());
    debug!(%conversion, source = %source.display(), destination = %destination.display(), "starting conversion");

    let entries = read_entries(conversion.source_format(), source, options, true)?;
    debug!(entries = entries.len(), "read source entries");

    let translation = match (&options.translation, conversion.target_format()) {
        (Some(path), FormatType::Csv) => {
            let lookup: FlatMap = read_entries(conversion.source_format(), path, options, false)?
                .into_iter()
                .collect();
            debug!(entries = lookup.len(), path = %path.display(), "read translation entries");
            Some(lookup)
        }
        (Some(path), target) => {
            warn!(path = %path.display(), %target, "translation source only applies to CSV output; ignoring it");
            None
        }
        (None, _) => None,
    };

    let summary = match conversion.target_format() {
        FormatType::Csv => {
            let records = join(entries, translation.as_ref());
            let rows: Vec<CSVRecord> = records.iter().map(CSVRecord::from).collect();
            write_output(&rows, destination)?;
            ConversionSummary {
                conversion,
                entries: rows.len(),
                translated: records.iter().filter(|r| r.translation.is_some()).count(),
            }
        }
        FormatType::Json => {
            let flat: FlatMap = entries.into_iter().collect();
            let leaves = flat.len();
            let document = JsonDocument::new(unflatten(flat), options.json_layout);
            write_output(&document, destination)?;
            ConversionSummary {
                conversion,
                entries: leaves,
                translated: 0,
            }
        }
        FormatType::Xml => {
            let format = XmlFormat::from_entries(entries);
            write_output(&format, destination)?;
            ConversionSummary {
                conversion,
                entries: format.strings.len(),
                translated: 0,
            }
        }
    };

    debug!(?summary, "conversion finished");
    Ok(summary)
}

/// Reads a source file of `format` as ordered path/leaf entries.
///
/// JSON trees are flattened; CSV rows collapse duplicate keys (last wins); XML
/// elements are kept one entry per element. `primary` makes an XML document
/// without string resources an [`Error::EmptySource`].
fn read_entries(
    format: FormatType,
    path: &Path,
    options: &ConvertOptions,
    primary: bool,
) -> Result<Vec<(String, FlatValue)>, Error> {
    let read_error = |e: Error| Error::source_read(path, e);
    match format {
        FormatType::Json => {
            let document = JsonDocument::read_from(path).map_err(read_error)?;
            Ok(flatten(&document.value).into_iter().collect())
        }
        FormatType::Csv => {
            let rows = csv::read_records_from(path, &options.value_column).map_err(read_error)?;
            Ok(csv::to_flat_map(&rows, options.infer_scalars)
                .into_iter()
                .collect())
        }
        FormatType::Xml => {
            let format = XmlFormat::read_from(path).map_err(read_error)?;
            if primary && format.is_empty() {
                return Err(Error::EmptySource(path.to_path_buf()));
            }
            Ok(format.entries(options.infer_scalars).collect())
        }
    }
}

fn write_output<T: Parser>(output: &T, destination: &Path) -> Result<(), Error> {
    output
        .write_to(destination)
        .map_err(|e| Error::destination_write(destination, e))
}

fn check_extension(path: &Path, expected: FormatType) {
    if let Some(found) = FormatType::from_path(path).filter(|found| *found != expected) {
        warn!(path = %path.display(), %found, %expected, "file extension does not match the conversion format");
    }
}
