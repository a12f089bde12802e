//! Persistence core for the course catalog.
//!
//! Domain objects are staged in a `UnitOfWork` and synchronized to SQLite
//! through per-type data mappers resolved by a `MapperRegistry`. A `Store`
//! owns the single shared connection and the registry.

pub mod config;
pub mod db;
pub mod domain;
pub mod form;
pub mod logging;
pub mod mapper;
pub mod model;
pub mod store;
pub mod uow;

pub use config::{ConfigError, DatabaseConfig, LoggingConfig, StoreConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use domain::{
    shared, DomainObject, FieldValue, Identity, Persistable, Record, RecordError, Shared, Staging,
};
pub use form::decode_form_value;
pub use logging::{default_log_level, init_logging, init_logging_from, logging_status, LoggingError};
pub use mapper::{
    ColumnMapping, FailureReason, Mapper, MapperRegistry, ObjectMapper, PersistError,
    PersistResult, RegistryBuilder, TableMapping, CATEGORY_TABLE, STUDENT_TABLE,
};
pub use model::{
    Catalog, Category, Course, CourseFactory, CourseKind, DomainError, Student, Teacher, User,
    UserFactory, UserKind,
};
pub use store::Store;
pub use uow::{CommitSummary, Stage, UnitOfWork};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
