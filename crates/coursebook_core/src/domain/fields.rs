//! Field values and the raw row record handed to `Persistable::from_record`.

use std::collections::BTreeMap;
use thiserror::Error;

/// Storage-agnostic value of one mapped field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Text(String),
}

impl FieldValue {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Text(_) => "text",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("field `{0}` is missing")]
    Missing(&'static str),
    #[error("field `{field}` holds {found}, expected {expected}")]
    WrongKind {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

/// One stored row, keyed by domain field name rather than column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    id: i64,
    fields: BTreeMap<&'static str, FieldValue>,
}

impl Record {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, field: &'static str, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value.into());
        self
    }

    pub fn insert(&mut self, field: &'static str, value: FieldValue) {
        self.fields.insert(field, value);
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// Removes a required text field. `NULL` is rejected, not defaulted.
    pub fn take_text(&mut self, field: &'static str) -> Result<String, RecordError> {
        match self.fields.remove(field) {
            Some(FieldValue::Text(value)) => Ok(value),
            Some(other) => Err(RecordError::WrongKind {
                field,
                expected: "text",
                found: other.kind(),
            }),
            None => Err(RecordError::Missing(field)),
        }
    }
}
