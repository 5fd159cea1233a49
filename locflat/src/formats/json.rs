//! Support for nested JSON localization trees.
//!
//! Documents are read either as plain JSON or as a CommonJS module
//! (`module.exports = { … };`), and written pretty-printed with 4-space
//! indentation in insertion key order.

use std::io::{BufRead, Read, Write};

use serde::Serialize;
use serde_json::{Serializer, Value, ser::PrettyFormatter};

use crate::{error::Error, options::JsonLayout, traits::Parser};

const MODULE_PREFIX: &str = "module.exports";

/// A JSON tree together with the layout it was read in or will be written in.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub value: Value,
    pub layout: JsonLayout,
}

impl Document {
    pub fn new(value: Value, layout: JsonLayout) -> Self {
        Document { value, layout }
    }
}

impl Parser for Document {
    fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, Error> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        let (body, layout) = match strip_module_wrapper(&content) {
            Some(body) => (body, JsonLayout::CommonJs),
            None => (content.as_str(), JsonLayout::Plain),
        };
        let value = serde_json::from_str(body)?;
        Ok(Document { value, layout })
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        if self.layout == JsonLayout::CommonJs {
            write!(writer, "{} = ", MODULE_PREFIX)?;
        }

        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = Serializer::with_formatter(&mut writer, formatter);
        self.value.serialize(&mut serializer)?;

        match self.layout {
            JsonLayout::CommonJs => writeln!(writer, ";")?,
            JsonLayout::Plain => writeln!(writer)?,
        }
        Ok(())
    }
}

/// Returns the JSON body of `module.exports = <body>;`, or `None` for plain JSON.
fn strip_module_wrapper(content: &str) -> Option<&str> {
    let rest = content.trim_start().strip_prefix(MODULE_PREFIX)?;
    let body = rest.trim_start().strip_prefix('=')?.trim();
    Some(body.strip_suffix(';').unwrap_or(body))
}
