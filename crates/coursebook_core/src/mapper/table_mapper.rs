//! Generic SQLite mapper for one table/domain-type pair.

use super::mapping::{TableMapping, ID_COLUMN};
use super::{FailureReason, ObjectMapper, PersistError, PersistResult};
use crate::domain::{DomainObject, FieldValue, Persistable, Record};
use log::{debug, info};
use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{params_from_iter, Connection, Row, ToSql};
use std::any::Any;
use std::marker::PhantomData;
use std::rc::Rc;

/// Data mapper bound to the shared connection.
///
/// SQL text is rendered once at construction from the validated mapping.
pub struct Mapper<T: Persistable> {
    conn: Rc<Connection>,
    mapping: TableMapping,
    select_sql: String,
    find_sql: String,
    insert_sql: String,
    update_sql: String,
    delete_sql: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Persistable> Mapper<T> {
    /// Builds a mapper after validating `mapping` against `T`'s declared
    /// fields and against the live table.
    ///
    /// # Errors
    /// - `InvalidMapping` when the mapping disagrees with `T::FIELDS`.
    /// - `Db` when the table or a mapped column is missing.
    pub fn new(conn: Rc<Connection>, mapping: TableMapping) -> PersistResult<Self> {
        mapping.validate_for::<T>()?;
        mapping.verify_schema(&conn)?;

        let table = quote(mapping.table);
        let id = quote(ID_COLUMN);
        let columns = mapping
            .columns
            .iter()
            .map(|mapping| quote(mapping.column))
            .collect::<Vec<_>>();
        let placeholders = (1..=columns.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>();
        let assignments = columns
            .iter()
            .zip(&placeholders)
            .map(|(column, placeholder)| format!("{column} = {placeholder}"))
            .collect::<Vec<_>>();

        let select_sql = format!("SELECT {id}, {} FROM {table}", columns.join(", "));
        let find_sql = format!("{select_sql} WHERE {id} = ?1;");
        let insert_sql = format!(
            "INSERT INTO {table} ({}) VALUES ({});",
            columns.join(", "),
            placeholders.join(", ")
        );
        let update_sql = format!(
            "UPDATE {table} SET {} WHERE {id} = ?{};",
            assignments.join(", "),
            columns.len() + 1
        );
        let delete_sql = format!("DELETE FROM {table} WHERE {id} = ?1;");

        info!(
            "event=mapper_init module=mapper status=ok tag={} table={}",
            T::TAG,
            mapping.table
        );

        Ok(Self {
            conn,
            mapping,
            select_sql: format!("{select_sql};"),
            find_sql,
            insert_sql,
            update_sql,
            delete_sql,
            _marker: PhantomData,
        })
    }

    pub fn mapping(&self) -> TableMapping {
        self.mapping
    }

    /// Loads every row of the bound table. Row order is unspecified.
    pub fn all(&self) -> PersistResult<Vec<T>> {
        let mut stmt = self.conn.prepare_cached(&self.select_sql)?;
        let mut rows = stmt.query([])?;
        let mut objects = Vec::new();

        while let Some(row) = rows.next()? {
            objects.push(self.parse_row(row)?);
        }

        debug!(
            "event=mapper_select module=mapper status=ok table={} rows={}",
            self.mapping.table,
            objects.len()
        );
        Ok(objects)
    }

    /// Loads one row by identifier.
    ///
    /// # Errors
    /// - `NotFound` when no row carries `id`.
    pub fn find(&self, id: i64) -> PersistResult<T> {
        let mut stmt = self.conn.prepare_cached(&self.find_sql)?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => self.parse_row(row),
            None => Err(PersistError::NotFound {
                table: self.mapping.table,
                id,
            }),
        }
    }

    pub fn insert(&self, obj: &mut T) -> PersistResult<i64> {
        self.insert_object(obj)
    }

    pub fn update(&self, obj: &T) -> PersistResult<()> {
        self.update_object(obj)
    }

    pub fn delete(&self, obj: &mut T) -> PersistResult<()> {
        self.delete_object(obj)
    }

    fn check_type(&self, obj: &dyn DomainObject) -> PersistResult<()> {
        if obj.type_tag() != T::TAG {
            return Err(PersistError::WrongType {
                expected: T::TAG,
                found: obj.type_tag(),
            });
        }
        Ok(())
    }

    /// Field values in mapped column order.
    fn bound_values(&self, obj: &dyn DomainObject) -> PersistResult<Vec<FieldValue>> {
        self.mapping
            .columns
            .iter()
            .map(|mapping| {
                obj.field(mapping.field)
                    .ok_or_else(|| PersistError::InvalidMapping {
                        tag: T::TAG,
                        message: format!("object does not expose field `{}`", mapping.field),
                    })
            })
            .collect()
    }

    fn parse_row(&self, row: &Row<'_>) -> PersistResult<T> {
        let table = self.mapping.table;
        let malformed = |message: String| PersistError::MalformedRow { table, message };

        let id = match row.get_ref(0)? {
            ValueRef::Integer(id) => id,
            other => {
                return Err(malformed(format!(
                    "`{ID_COLUMN}` holds {}, expected integer",
                    other.data_type()
                )))
            }
        };

        let mut record = Record::new(id);
        for (index, mapping) in self.mapping.columns.iter().enumerate() {
            let value = field_value_from_sql(row.get_ref(index + 1)?).map_err(|found| {
                malformed(format!(
                    "column `{}` of row {id} holds unsupported {found}",
                    mapping.column
                ))
            })?;
            record.insert(mapping.field, value);
        }

        T::from_record(record).map_err(|err| malformed(format!("row {id}: {err}")))
    }
}

impl<T: Persistable> ObjectMapper for Mapper<T> {
    fn tag(&self) -> &'static str {
        T::TAG
    }

    fn table(&self) -> &'static str {
        self.mapping.table
    }

    fn insert_object(&self, obj: &mut dyn DomainObject) -> PersistResult<i64> {
        let table = self.mapping.table;
        let fail = |reason: FailureReason| PersistError::Commit { table, reason };

        self.check_type(obj)?;
        let identity = obj.identity();
        if identity.is_retired() {
            return Err(fail(FailureReason::Retired));
        }
        if let Some(id) = identity.get() {
            return Err(fail(FailureReason::IdAlreadySet(id)));
        }

        let values = self.bound_values(obj)?;
        let changed = self
            .conn
            .execute(&self.insert_sql, params_from_iter(values.iter()))
            .map_err(|err| fail(err.into()))?;
        if changed == 0 {
            return Err(fail(FailureReason::NoRowsAffected));
        }

        let id = self.conn.last_insert_rowid();
        obj.identity_mut().assign(id);
        debug!(
            "event=mapper_insert module=mapper status=ok table={} id={}",
            table, id
        );
        Ok(id)
    }

    fn update_object(&self, obj: &dyn DomainObject) -> PersistResult<()> {
        let table = self.mapping.table;
        let id = obj.id();
        let fail = |reason: FailureReason| PersistError::Update { table, id, reason };

        self.check_type(obj)?;
        if obj.identity().is_retired() {
            return Err(fail(FailureReason::Retired));
        }
        let Some(row_id) = id else {
            return Err(fail(FailureReason::MissingId));
        };

        let mut values = self.bound_values(obj)?;
        values.push(FieldValue::Integer(row_id));
        let changed = self
            .conn
            .execute(&self.update_sql, params_from_iter(values.iter()))
            .map_err(|err| fail(err.into()))?;
        if changed == 0 {
            return Err(fail(FailureReason::NoRowsAffected));
        }

        debug!(
            "event=mapper_update module=mapper status=ok table={} id={}",
            table, row_id
        );
        Ok(())
    }

    fn delete_object(&self, obj: &mut dyn DomainObject) -> PersistResult<()> {
        let table = self.mapping.table;
        let id = obj.id();
        let fail = |reason: FailureReason| PersistError::Delete { table, id, reason };

        self.check_type(obj)?;
        if obj.identity().is_retired() {
            return Err(fail(FailureReason::Retired));
        }
        let Some(row_id) = id else {
            return Err(fail(FailureReason::MissingId));
        };

        let changed = self
            .conn
            .execute(&self.delete_sql, [row_id])
            .map_err(|err| fail(err.into()))?;
        if changed == 0 {
            return Err(fail(FailureReason::NoRowsAffected));
        }

        obj.identity_mut().retire();
        debug!(
            "event=mapper_delete module=mapper status=ok table={} id={}",
            table, row_id
        );
        Ok(())
    }

    fn all_objects(&self) -> PersistResult<Vec<Box<dyn DomainObject>>> {
        Ok(self
            .all()?
            .into_iter()
            .map(|obj| Box::new(obj) as Box<dyn DomainObject>)
            .collect())
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Null => ToSqlOutput::Owned(Value::Null),
            Self::Integer(value) => ToSqlOutput::Owned(Value::Integer(*value)),
            Self::Text(value) => ToSqlOutput::Borrowed(ValueRef::Text(value.as_bytes())),
        })
    }
}

/// Converts a stored value; the error carries the rejected SQLite type.
fn field_value_from_sql(value: ValueRef<'_>) -> Result<FieldValue, String> {
    match value {
        ValueRef::Null => Ok(FieldValue::Null),
        ValueRef::Integer(value) => Ok(FieldValue::Integer(value)),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(|text| FieldValue::Text(text.to_string()))
            .map_err(|_| "non UTF-8 text".to_string()),
        other => Err(other.data_type().to_string()),
    }
}

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}
