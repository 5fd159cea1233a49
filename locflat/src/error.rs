//! All error types for the locflat crate.
//!
//! Format-level variants come out of the adapters; run-level variants name the
//! file a conversion failed on and wrap the format-level cause.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("missing {0} file argument")]
    MissingArgument(&'static str),

    #[error(
        "unknown command `{0}` (expected one of: json-to-csv, csv-to-json, xml-to-csv, csv-to-xml, json-to-xml, xml-to-json)"
    )]
    UnknownCommand(String),

    #[error("failed to read source `{}`: {source}", .path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("empty source `{}`: no <resources> entries found", .0.display())]
    EmptySource(PathBuf),

    #[error("failed to write destination `{}`: {source}", .path.display())]
    DestinationWrite {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("CSV parse error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid data: {0}")]
    DataMismatch(String),

    #[error("invalid resource: {0}")]
    InvalidResource(String),
}

impl Error {
    /// Wraps a format-level failure with the source file it came from.
    pub fn source_read(path: impl Into<PathBuf>, source: Error) -> Self {
        Error::SourceRead {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Wraps a format-level failure with the destination file it was written to.
    pub fn destination_write(path: impl Into<PathBuf>, source: Error) -> Self {
        Error::DestinationWrite {
            path: path.into(),
            source: Box::new(source),
        }
    }
}
