//! Persistable course category.

use crate::domain::{DomainObject, FieldValue, Identity, Persistable, Record, RecordError};
use serde::Serialize;

/// Persistable course category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Category {
    #[serde(rename = "id")]
    identity: Identity,
    pub name: String,
    /// Names of courses filed under this category; not persisted.
    pub courses: Vec<String>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            identity: Identity::transient(),
            name: name.into(),
            courses: Vec::new(),
        }
    }

    pub fn with_id(id: i64, name: impl Into<String>) -> Self {
        Self {
            identity: Identity::persisted(id),
            ..Self::new(name)
        }
    }

    pub fn course_count(&self) -> usize {
        self.courses.len()
    }
}

impl DomainObject for Category {
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "name" => Some(FieldValue::from(self.name.as_str())),
            _ => None,
        }
    }
}

impl Persistable for Category {
    const TAG: &'static str = "category";
    const FIELDS: &'static [&'static str] = &["name"];

    fn from_record(mut record: Record) -> Result<Self, RecordError> {
        let name = record.take_text("name")?;
        Ok(Self::with_id(record.id(), name))
    }
}
