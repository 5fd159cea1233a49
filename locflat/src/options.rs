//! Options passed explicitly into a conversion run.

use std::path::PathBuf;

use crate::formats::csv::DEFAULT_VALUE_COLUMN;

/// How a JSON document is laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonLayout {
    /// A plain pretty-printed JSON document.
    #[default]
    Plain,
    /// A CommonJS module: `module.exports = { … };`.
    CommonJs,
}

/// Conversion behavior options for [`crate::convert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Second source joined by path to fill the `translated_value` column.
    pub translation: Option<PathBuf>,
    /// CSV column that supplies the value when reading a table.
    pub value_column: String,
    /// Read `null`, booleans and numbers in CSV/XML cells as typed scalars.
    pub infer_scalars: bool,
    /// Layout of written JSON documents.
    pub json_layout: JsonLayout,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            translation: None,
            value_column: DEFAULT_VALUE_COLUMN.to_string(),
            infer_scalars: false,
            json_layout: JsonLayout::default(),
        }
    }
}

impl ConvertOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the translation source.
    pub fn with_translation(mut self, translation: Option<PathBuf>) -> Self {
        self.translation = translation;
        self
    }

    /// Overrides the CSV value column; `None` keeps the default.
    pub fn with_value_column(mut self, value_column: Option<String>) -> Self {
        if let Some(column) = value_column.filter(|c| !c.trim().is_empty()) {
            self.value_column = column;
        }
        self
    }

    /// Enables/disables typed scalar inference for cells.
    pub fn with_infer_scalars(mut self, infer_scalars: bool) -> Self {
        self.infer_scalars = infer_scalars;
        self
    }

    /// Sets the JSON output layout.
    pub fn with_json_layout(mut self, json_layout: JsonLayout) -> Self {
        self.json_layout = json_layout;
        self
    }
}
