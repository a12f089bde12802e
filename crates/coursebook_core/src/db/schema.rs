//! Read-only schema introspection through `pragma_table_info`.

use super::{DbError, DbResult};
use rusqlite::Connection;

/// Returns the column names of `table` in declaration order.
///
/// An empty result means the table does not exist.
pub fn table_columns(conn: &Connection, table: &str) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid;")?;
    let columns = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

/// Checks that `table` exists and carries every column in `columns`.
pub fn verify_table<I>(conn: &Connection, table: &'static str, columns: I) -> DbResult<()>
where
    I: IntoIterator<Item = &'static str>,
{
    let existing = table_columns(conn, table)?;
    if existing.is_empty() {
        return Err(DbError::MissingRequiredTable(table));
    }

    for column in columns {
        if !existing
            .iter()
            .any(|name| name.eq_ignore_ascii_case(column))
        {
            return Err(DbError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}
