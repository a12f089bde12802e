//! Data mappers and the registry that resolves them.
//!
//! # Responsibility
//! - Translate between stored rows and domain objects, one table per type.
//! - Perform the physical insert/update/delete/select statements.
//! - Resolve the mapper for an object or a type tag from a fixed table.
//!
//! # Invariants
//! - Each write issues exactly one statement and never commits on its own.
//! - Zero affected rows is an error, never a silent success.
//! - Mappings are validated when a mapper is built, not when a row is read.

use crate::db::DbError;
use crate::domain::DomainObject;
use std::any::Any;
use std::rc::Rc;
use thiserror::Error;

mod mapping;
mod registry;
mod table_mapper;

pub use mapping::{ColumnMapping, TableMapping, CATEGORY_TABLE, ID_COLUMN, STUDENT_TABLE};
pub use registry::{MapperRegistry, RegistryBuilder};
pub use table_mapper::Mapper;

pub type PersistResult<T> = Result<T, PersistError>;

/// Errors raised by mappers, the registry and the unit of work.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("no mapper registered for type `{0}`")]
    UnknownMapper(String),
    #[error("insert into `{table}` failed: {reason}")]
    Commit {
        table: &'static str,
        reason: FailureReason,
    },
    #[error("update of `{table}` row {id:?} failed: {reason}")]
    Update {
        table: &'static str,
        id: Option<i64>,
        reason: FailureReason,
    },
    #[error("delete of `{table}` row {id:?} failed: {reason}")]
    Delete {
        table: &'static str,
        id: Option<i64>,
        reason: FailureReason,
    },
    #[error("no `{table}` row with id {id}")]
    NotFound { table: &'static str, id: i64 },
    #[error("invalid mapping for `{tag}`: {message}")]
    InvalidMapping { tag: &'static str, message: String },
    #[error("malformed `{table}` row: {message}")]
    MalformedRow { table: &'static str, message: String },
    #[error("type `{0}` is registered more than once")]
    DuplicateMapping(&'static str),
    #[error("mapper for `{expected}` cannot handle `{found}` objects")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    #[error("a staged object is borrowed elsewhere during commit")]
    ObjectInUse,
    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<rusqlite::Error> for PersistError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Why a single physical write was refused or failed.
#[derive(Debug, Error)]
pub enum FailureReason {
    #[error("no rows affected")]
    NoRowsAffected,
    #[error("identifier is not set")]
    MissingId,
    #[error("identifier is already set to {0}")]
    IdAlreadySet(i64),
    #[error("object was deleted and cannot be persisted again")]
    Retired,
    #[error(transparent)]
    Storage(#[from] rusqlite::Error),
}

/// Type-erased mapper used for dispatch by tag.
pub trait ObjectMapper {
    fn tag(&self) -> &'static str;

    fn table(&self) -> &'static str;

    /// Inserts a transient object and assigns its identity.
    fn insert_object(&self, obj: &mut dyn DomainObject) -> PersistResult<i64>;

    fn update_object(&self, obj: &dyn DomainObject) -> PersistResult<()>;

    /// Deletes the object's row and retires its identity.
    fn delete_object(&self, obj: &mut dyn DomainObject) -> PersistResult<()>;

    fn all_objects(&self) -> PersistResult<Vec<Box<dyn DomainObject>>>;

    fn into_any(self: Rc<Self>) -> Rc<dyn Any>;
}
