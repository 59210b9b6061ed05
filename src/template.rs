use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::binder::bind_arguments;
use crate::error::SqlTemplateError;
use crate::provider::ConnectionProvider;
use crate::results::RowDecoder;
use crate::serial::{SerialGuard, SerialLock};
use crate::sqlite::{SqliteOptions, SqliteProvider, SqliteStatement, collect_rows, first_row};
use crate::types::{ArgList, ConcurrencyPolicy, SqlArg};

/// Instance-level settings for a [`SqlTemplate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateOptions {
    pub concurrency: ConcurrencyPolicy,
}

impl TemplateOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_concurrency(mut self, concurrency: ConcurrencyPolicy) -> Self {
        self.concurrency = concurrency;
        self
    }
}

/// The entry points, used to label log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Query,
    QueryForObject,
    QueryForSingleRow,
    Update,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Query => "query",
            Operation::QueryForObject => "query_for_object",
            Operation::QueryForSingleRow => "query_for_single_row_or_fail",
            Operation::Update => "update",
        })
    }
}

/// Runs parameterized SQL against connections taken from a [`ConnectionProvider`].
///
/// Every call acquires its own connection, prepares the statement, binds the arguments and
/// reduces the result; connection, statement and cursor are released before the call returns,
/// whether it succeeds or fails.
///
/// ```rust
/// use sql_template::prelude::*;
///
/// # fn main() -> Result<(), SqlTemplateError> {
/// let provider = SqliteProvider::builder("file:doc_demo?mode=memory&cache=shared".into())
///     .build()?;
/// // an in-memory shared-cache database lives while one connection stays open
/// let keeper = provider.open()?;
/// keeper.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT);")?;
///
/// let template = SqlTemplate::new(provider);
/// assert_eq!(template.update("INSERT INTO t (name) VALUES (?)", &sql_args!["alpha"])?, 1);
///
/// fn name(row: &ResultRow<'_>) -> Result<String, SqlTemplateError> {
///     row.get_string("name")
/// }
/// let found = template.query_for_object("SELECT name FROM t WHERE id = ?", &name, &sql_args![1])?;
/// assert_eq!(found.as_deref(), Some("alpha"));
/// # drop(keeper);
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct SqlTemplate<P> {
    provider: P,
    options: TemplateOptions,
    serial: SerialLock,
}

impl SqlTemplate<SqliteProvider> {
    /// Build a template over a fresh [`SqliteProvider`].
    ///
    /// # Errors
    /// Returns `SqlTemplateError::ConfigError` if the options are invalid.
    pub fn new_sqlite(opts: SqliteOptions) -> Result<Self, SqlTemplateError> {
        Ok(Self::new(SqliteProvider::new(opts)?))
    }
}

impl<P: ConnectionProvider> SqlTemplate<P> {
    /// Template with default options: operations on this instance are serialized.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self::with_options(provider, TemplateOptions::default())
    }

    #[must_use]
    pub fn with_options(provider: P, options: TemplateOptions) -> Self {
        Self {
            provider,
            options,
            serial: SerialLock::default(),
        }
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    #[must_use]
    pub fn options(&self) -> &TemplateOptions {
        &self.options
    }

    /// Run a statement without arguments and decode every row, in driver order.
    ///
    /// # Errors
    /// Returns `SqlTemplateError::ExecutionError` if the SQL cannot be prepared or run, if it
    /// declares placeholders, or if the decoder fails.
    pub fn query<T, D>(&self, sql: &str, decoder: &D) -> Result<Vec<T>, SqlTemplateError>
    where
        D: RowDecoder<T> + ?Sized,
    {
        let operation = Operation::Query;
        let rows = self.run(operation, sql, &[], |stmt| {
            let mut cursor = stmt.execute_query();
            collect_rows(&mut cursor, decoder)
        })?;
        tracing::debug!(operation = %operation, sql, rows = rows.len(), "query completed");
        Ok(rows)
    }

    /// Bind `args`, run the statement and decode the first row, if any.
    ///
    /// Zero rows is `Ok(None)`; rows after the first are not read.
    ///
    /// # Errors
    /// Returns `SqlTemplateError::BindingError` if an argument cannot be bound, or
    /// `SqlTemplateError::ExecutionError` for driver and decoder failures.
    pub fn query_for_object<T, D>(
        &self,
        sql: &str,
        decoder: &D,
        args: &[SqlArg],
    ) -> Result<Option<T>, SqlTemplateError>
    where
        D: RowDecoder<T> + ?Sized,
    {
        let operation = Operation::QueryForObject;
        let found = self.run(operation, sql, args, |stmt| {
            let mut cursor = stmt.execute_query();
            first_row(&mut cursor, decoder)
        })?;
        tracing::debug!(
            operation = %operation,
            sql,
            found = found.is_some(),
            "query completed"
        );
        Ok(found)
    }

    /// Same as [`query_for_object`](Self::query_for_object), but zero rows is an error.
    ///
    /// # Errors
    /// As `query_for_object`, plus `SqlTemplateError::ExecutionError` wrapping
    /// `SqlTemplateError::NoRows` when nothing matched.
    pub fn query_for_single_row_or_fail<T, D>(
        &self,
        sql: &str,
        decoder: &D,
        args: &[SqlArg],
    ) -> Result<T, SqlTemplateError>
    where
        D: RowDecoder<T> + ?Sized,
    {
        let operation = Operation::QueryForSingleRow;
        let value = self.run(operation, sql, args, |stmt| {
            let mut cursor = stmt.execute_query();
            first_row(&mut cursor, decoder)?.ok_or(SqlTemplateError::NoRows)
        })?;
        tracing::debug!(operation = %operation, sql, "query completed");
        Ok(value)
    }

    /// Bind `args`, run a modifying statement and return the affected-row count.
    ///
    /// # Errors
    /// Returns `SqlTemplateError::BindingError` if an argument cannot be bound, or
    /// `SqlTemplateError::ExecutionError` if the statement fails.
    pub fn update(&self, sql: &str, args: &[SqlArg]) -> Result<usize, SqlTemplateError> {
        let operation = Operation::Update;
        let affected = self.run(operation, sql, args, |stmt| stmt.execute_update())?;
        tracing::debug!(operation = %operation, sql, affected, "update completed");
        Ok(affected)
    }

    fn run<R, F>(
        &self,
        operation: Operation,
        sql: &str,
        args: &[SqlArg],
        work: F,
    ) -> Result<R, SqlTemplateError>
    where
        F: FnOnce(&mut SqliteStatement<'_>) -> Result<R, SqlTemplateError>,
    {
        let _serial = self.serial_guard();
        self.scoped(sql, args, work)
            .map_err(|err| Self::fail(operation, sql, args, err))
    }

    // Locals drop in reverse order: statement (and any cursor) before the connection.
    fn scoped<R, F>(&self, sql: &str, args: &[SqlArg], work: F) -> Result<R, SqlTemplateError>
    where
        F: FnOnce(&mut SqliteStatement<'_>) -> Result<R, SqlTemplateError>,
    {
        let handle = self.provider.acquire()?;
        let conn: &rusqlite::Connection = handle.borrow();
        let mut statement = SqliteStatement::prepare(conn, sql)?;
        bind_arguments(&mut statement, args)?;
        work(&mut statement)
    }

    // Reentrant: a decoder may call back into this template on the same thread.
    fn serial_guard(&self) -> Option<SerialGuard<'_>> {
        match self.options.concurrency {
            ConcurrencyPolicy::Serialized => Some(self.serial.lock()),
            ConcurrencyPolicy::Unrestricted => None,
        }
    }

    fn fail(
        operation: Operation,
        sql: &str,
        args: &[SqlArg],
        err: SqlTemplateError,
    ) -> SqlTemplateError {
        if let SqlTemplateError::BindingError {
            index, type_name, ..
        } = &err
        {
            tracing::error!(
                operation = %operation,
                sql,
                args = %ArgList(args),
                parameter_index = *index,
                parameter_type = %type_name,
                error = %err,
                "Error while setting parameters on prepared statement"
            );
            return err;
        }
        tracing::error!(
            operation = %operation,
            sql,
            args = %ArgList(args),
            error = %err,
            "Cannot execute query"
        );
        SqlTemplateError::ExecutionError {
            sql: sql.to_owned(),
            source: Box::new(err),
        }
    }
}
