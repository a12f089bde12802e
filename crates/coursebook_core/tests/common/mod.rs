#![allow(dead_code)]

use coursebook_core::{open_db_in_memory, Store};
use rusqlite::Connection;

/// Pre-existing storage layout the mappers are bound to.
pub const SCHEMA_SQL: &str = "
CREATE TABLE student (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT
);
CREATE TABLE categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT
);";

pub fn schema_connection() -> Connection {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(SCHEMA_SQL).unwrap();
    conn
}

pub fn fixture_store() -> Store {
    Store::from_connection(schema_connection()).unwrap()
}

pub fn row_count(store: &Store, table: &str) -> i64 {
    store
        .connection()
        .query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
            row.get(0)
        })
        .unwrap()
}

pub fn stored_names(store: &Store, table: &str) -> Vec<(i64, String)> {
    let mut stmt = store
        .connection()
        .prepare(&format!("SELECT id, name FROM {table} ORDER BY id;"))
        .unwrap();
    stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}
