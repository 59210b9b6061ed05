use std::time::Duration;

use rusqlite::{Connection, OpenFlags};
use serde::{Deserialize, Serialize};

use crate::error::SqlTemplateError;
use crate::provider::ConnectionProvider;

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

/// Options for opening `SQLite` connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteOptions {
    /// Filesystem path or `file:` URI (e.g. `file:demo?mode=memory&cache=shared`).
    pub db_path: String,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// Statements run on every freshly opened connection, such as pragmas.
    #[serde(default)]
    pub init_statements: Vec<String>,
    #[serde(default)]
    pub read_only: bool,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            db_path,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            init_statements: Vec::new(),
            read_only: false,
        }
    }

    #[must_use]
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    fn open_flags(&self) -> OpenFlags {
        if self.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::default()
        }
    }

    fn validate(&self) -> Result<(), SqlTemplateError> {
        if self.db_path.trim().is_empty() {
            return Err(SqlTemplateError::ConfigError(
                "SQLite db_path must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.opts = self.opts.with_busy_timeout(timeout);
        self
    }

    #[must_use]
    pub fn init_statement(mut self, sql: impl Into<String>) -> Self {
        self.opts.init_statements.push(sql.into());
        self
    }

    #[must_use]
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.opts.read_only = read_only;
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    /// Build a provider from the collected options.
    ///
    /// # Errors
    ///
    /// Returns `SqlTemplateError::ConfigError` if the options are invalid.
    pub fn build(self) -> Result<SqliteProvider, SqlTemplateError> {
        SqliteProvider::new(self.finish())
    }
}

/// Connection provider that opens a new `rusqlite::Connection` for every acquisition.
///
/// Closing happens when the template drops the connection at the end of an operation.
#[derive(Debug, Clone)]
pub struct SqliteProvider {
    opts: SqliteOptions,
}

impl SqliteProvider {
    /// # Errors
    ///
    /// Returns `SqlTemplateError::ConfigError` if `db_path` is empty.
    pub fn new(opts: SqliteOptions) -> Result<Self, SqlTemplateError> {
        opts.validate()?;
        Ok(Self { opts })
    }

    #[must_use]
    pub fn builder(db_path: String) -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new(db_path)
    }

    #[must_use]
    pub fn options(&self) -> &SqliteOptions {
        &self.opts
    }

    /// Open and initialise a connection without going through a template.
    ///
    /// # Errors
    /// Returns `SqlTemplateError::ConnectionError` if opening, configuring or running an
    /// init statement fails.
    pub fn open(&self) -> Result<Connection, SqlTemplateError> {
        let path = &self.opts.db_path;
        let conn = Connection::open_with_flags(path, self.opts.open_flags()).map_err(|e| {
            SqlTemplateError::ConnectionError(format!("Failed to open SQLite database {path}: {e}"))
        })?;
        conn.busy_timeout(Duration::from_millis(self.opts.busy_timeout_ms))
            .map_err(|e| {
                SqlTemplateError::ConnectionError(format!("Failed to set busy timeout: {e}"))
            })?;
        for sql in &self.opts.init_statements {
            conn.execute_batch(sql).map_err(|e| {
                SqlTemplateError::ConnectionError(format!(
                    "Connection init statement `{sql}` failed: {e}"
                ))
            })?;
        }
        tracing::debug!(db_path = %path, read_only = self.opts.read_only, "opened sqlite connection");
        Ok(conn)
    }
}

impl ConnectionProvider for SqliteProvider {
    type Connection = Connection;

    fn acquire(&self) -> Result<Connection, SqlTemplateError> {
        self.open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_options() {
        let opts = SqliteProvider::builder("file:cfg?mode=memory&cache=shared".into())
            .busy_timeout(Duration::from_millis(250))
            .init_statement("PRAGMA foreign_keys = ON;")
            .read_only(false)
            .finish();
        assert_eq!(opts.busy_timeout_ms, 250);
        assert_eq!(opts.init_statements, vec!["PRAGMA foreign_keys = ON;"]);
        assert!(!opts.read_only);
    }

    #[test]
    fn empty_path_is_rejected() {
        let err = SqliteProvider::new(SqliteOptions::new("  ".into())).unwrap_err();
        assert!(matches!(err, SqlTemplateError::ConfigError(_)));
    }

    #[test]
    fn acquire_runs_init_statements() {
        let provider = SqliteProvider::builder(":memory:".into())
            .init_statement("CREATE TABLE seeded (id INTEGER);")
            .build()
            .unwrap();
        let conn = provider.acquire().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name = 'seeded'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn failing_init_statement_is_a_connection_error() {
        let provider = SqliteProvider::builder(":memory:".into())
            .init_statement("NOT VALID SQL")
            .build()
            .unwrap();
        let err = provider.acquire().unwrap_err();
        assert!(matches!(err, SqlTemplateError::ConnectionError(_)));
    }
}
