//! Records exchanged between the tabular/XML adapters and the codec.

use crate::flat::FlatValue;

/// One localization entry: a path key, its primary value, and an optional
/// secondary (translated) value joined from a second source by identical path.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub key: String,
    pub value: FlatValue,
    pub translation: Option<FlatValue>,
}

impl Record {
    pub fn new(key: impl Into<String>, value: FlatValue) -> Self {
        Record {
            key: key.into(),
            value,
            translation: None,
        }
    }

    pub fn with_translation(mut self, translation: Option<FlatValue>) -> Self {
        self.translation = translation;
        self
    }
}
