//! Declarative column ↔ field mappings.

use super::{PersistError, PersistResult};
use crate::db::{verify_table, DbResult};
use crate::domain::Persistable;
use rusqlite::Connection;
use std::iter;

/// Auto-assigned integer primary key shared by every mapped table.
pub const ID_COLUMN: &str = "id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub column: &'static str,
    pub field: &'static str,
}

impl ColumnMapping {
    pub const fn new(column: &'static str, field: &'static str) -> Self {
        Self { column, field }
    }

    /// Column and field share one name.
    pub const fn same(name: &'static str) -> Self {
        Self::new(name, name)
    }
}

/// Static binding of one table to the fields of one domain type.
///
/// The identifier column is implicit and must not be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableMapping {
    pub table: &'static str,
    pub columns: &'static [ColumnMapping],
}

pub const STUDENT_TABLE: TableMapping = TableMapping {
    table: "student",
    columns: &[ColumnMapping::same("name")],
};

pub const CATEGORY_TABLE: TableMapping = TableMapping {
    table: "categories",
    columns: &[ColumnMapping::same("name")],
};

impl TableMapping {
    /// Checks the mapping against the declared fields of `T`.
    ///
    /// Every declared field is mapped exactly once, every mapped field is
    /// declared, and column names are unique and never the identifier.
    pub fn validate_for<T: Persistable>(&self) -> PersistResult<()> {
        let invalid = |message: String| PersistError::InvalidMapping {
            tag: T::TAG,
            message,
        };

        if self.columns.is_empty() {
            return Err(invalid(format!("table `{}` maps no columns", self.table)));
        }

        for (index, mapping) in self.columns.iter().enumerate() {
            if mapping.column.eq_ignore_ascii_case(ID_COLUMN) {
                return Err(invalid(format!(
                    "column `{ID_COLUMN}` is implicit and cannot be mapped"
                )));
            }
            if !T::FIELDS.contains(&mapping.field) {
                return Err(invalid(format!(
                    "column `{}` maps undeclared field `{}`",
                    mapping.column, mapping.field
                )));
            }
            let earlier = &self.columns[..index];
            if earlier
                .iter()
                .any(|other| other.column.eq_ignore_ascii_case(mapping.column))
            {
                return Err(invalid(format!("column `{}` is mapped twice", mapping.column)));
            }
            if earlier.iter().any(|other| other.field == mapping.field) {
                return Err(invalid(format!("field `{}` is mapped twice", mapping.field)));
            }
        }

        if let Some(unmapped) = T::FIELDS
            .iter()
            .find(|field| !self.columns.iter().any(|mapping| mapping.field == **field))
        {
            return Err(invalid(format!("declared field `{unmapped}` has no column")));
        }

        Ok(())
    }

    /// Checks that the table and every mapped column exist.
    pub fn verify_schema(&self, conn: &Connection) -> DbResult<()> {
        verify_table(
            conn,
            self.table,
            iter::once(ID_COLUMN).chain(self.columns.iter().map(|mapping| mapping.column)),
        )
    }
}
