//! Traits for format-agnostic parsing and serialization in locflat.

use std::{
    fs::File,
    io::{BufRead, BufWriter, Cursor, Read, Write},
    path::Path,
};

use crate::error::Error;

/// A trait for parsing and writing one localization document from/to one file.
///
/// # Example
///
/// ```rust,no_run
/// use locflat::traits::Parser;
/// let format = locflat::formats::xml::Format::read_from("strings.xml")?;
/// format.write_to("strings_copy.xml")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path, decoding UTF-8/UTF-16 byte-order marks.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let decoded = read_text(path)?;
        Self::from_str(&decoded)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Write to file path.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s))
    }
}

/// Reads a whole file into a string, honoring a UTF-8 or UTF-16 BOM.
///
/// Spreadsheet exports frequently carry a BOM, which would otherwise end up
/// glued to the first CSV header or break the XML declaration.
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<String, Error> {
    let file = File::open(path)?;
    let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
        .bom_override(true)
        .build(file);

    let mut decoded = String::new();
    decoder.read_to_string(&mut decoded)?;
    Ok(decoded)
}
