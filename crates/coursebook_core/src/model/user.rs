//! Students, teachers and the user factory.

use super::DomainError;
use crate::domain::{DomainObject, FieldValue, Identity, Persistable, Record, RecordError};
use serde::Serialize;
use std::str::FromStr;

/// Persistable student record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Student {
    #[serde(rename = "id")]
    identity: Identity,
    pub name: String,
    /// Names of enrolled courses; not persisted.
    pub courses: Vec<String>,
}

impl Student {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            identity: Identity::transient(),
            name: name.into(),
            courses: Vec::new(),
        }
    }

    /// Student already known to storage under `id`.
    pub fn with_id(id: i64, name: impl Into<String>) -> Self {
        Self {
            identity: Identity::persisted(id),
            ..Self::new(name)
        }
    }
}

impl DomainObject for Student {
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

impl Persistable for Student {
    const TAG: &'static str = "student";
    const FIELDS: &'static [&'static str] = &["name"];

    fn from_record(mut record: Record) -> Result<Self, RecordError> {
        let name = record.take_text("name")?;
        Ok(Self::with_id(record.id(), name))
    }
}

/// Teacher record; lives in memory only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Teacher {
    pub name: String,
    pub courses: Vec<String>,
}

impl Teacher {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            courses: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserKind {
    Student,
    Teacher,
}

impl FromStr for UserKind {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "student" => Ok(Self::Student),
            "teacher" => Ok(Self::Teacher),
            other => Err(DomainError::UnknownUserKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum User {
    Student(Student),
    Teacher(Teacher),
}

impl User {
    pub fn name(&self) -> &str {
        match self {
            Self::Student(student) => &student.name,
            Self::Teacher(teacher) => &teacher.name,
        }
    }
}

/// Builds users from a kind name.
pub struct UserFactory;

impl UserFactory {
    pub fn create(kind: &str, name: impl Into<String>) -> Result<User, DomainError> {
        Ok(match kind.parse::<UserKind>()? {
            UserKind::Student => User::Student(Student::new(name)),
            UserKind::Teacher => User::Teacher(Teacher::new(name)),
        })
    }
}
