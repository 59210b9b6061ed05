use rusqlite::Connection;

use crate::error::SqlTemplateError;

use super::query::SqliteCursor;

/// A prepared `SQLite` statement borrowed from its connection.
///
/// Parameters are bound through [`ParameterSetter`](crate::binder::ParameterSetter); the
/// statement is finalized when dropped, which always happens before the connection goes away.
pub struct SqliteStatement<'conn> {
    pub(crate) stmt: rusqlite::Statement<'conn>,
}

impl<'conn> SqliteStatement<'conn> {
    /// Prepare `sql` on `conn`.
    ///
    /// # Errors
    /// Returns `SqlTemplateError::InvalidSql` for blank SQL, or the driver error if `SQLite`
    /// cannot compile the statement.
    pub fn prepare(conn: &'conn Connection, sql: &str) -> Result<Self, SqlTemplateError> {
        if sql.trim().is_empty() {
            return Err(SqlTemplateError::InvalidSql("statement is empty".into()));
        }
        let stmt = conn.prepare(sql)?;
        Ok(Self { stmt })
    }

    /// Run the statement and return a forward-only cursor over its rows.
    pub fn execute_query(&mut self) -> SqliteCursor<'_> {
        SqliteCursor::new(self.stmt.raw_query())
    }

    /// Run a modifying statement and return the number of affected rows.
    ///
    /// # Errors
    /// Returns `SqlTemplateError::SqliteError` if execution fails.
    pub fn execute_update(&mut self) -> Result<usize, SqlTemplateError> {
        Ok(self.stmt.raw_execute()?)
    }
}
