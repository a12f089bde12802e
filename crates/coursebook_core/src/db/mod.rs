//! SQLite connection bootstrap and schema verification.
//!
//! # Responsibility
//! - Open and configure the single shared SQLite connection.
//! - Verify that tables required by registered mappers exist.
//!
//! # Invariants
//! - Core code never creates or migrates tables; the schema is pre-existing.
//! - Verification is read-only (`pragma_table_info`), no DDL is issued.

use thiserror::Error;

mod open;
mod schema;

pub use open::{configure_connection, open_db, open_db_in_memory};
pub use schema::{table_columns, verify_table};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("required table `{0}` does not exist")]
    MissingRequiredTable(&'static str),
    #[error("required column `{table}.{column}` does not exist")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}
