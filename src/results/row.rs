use rusqlite::types::{FromSql, ValueRef};
use rust_decimal::Decimal;

use crate::error::SqlTemplateError;
use crate::types::{SqlDate, SqlTime, SqlTimestamp};

/// Read-only view of the row a cursor currently points at.
///
/// Decoders receive this view and address columns by name. It exposes no way to move the
/// cursor.
#[derive(Clone, Copy)]
pub struct ResultRow<'r> {
    row: &'r rusqlite::Row<'r>,
}

impl<'r> ResultRow<'r> {
    pub(crate) fn new(row: &'r rusqlite::Row<'r>) -> Self {
        Self { row }
    }

    /// Get a column converted to any `rusqlite` readable type.
    ///
    /// # Errors
    /// Returns `SqlTemplateError::SqliteError` if the column is missing or cannot be converted.
    pub fn get<T: FromSql>(&self, column: &str) -> Result<T, SqlTemplateError> {
        Ok(self.row.get(column)?)
    }

    /// Like [`get`](Self::get), with SQL NULL mapped to `None`.
    ///
    /// # Errors
    /// Returns `SqlTemplateError::SqliteError` if the column is missing or cannot be converted.
    pub fn get_optional<T: FromSql>(&self, column: &str) -> Result<Option<T>, SqlTemplateError> {
        self.get::<Option<T>>(column)
    }

    /// # Errors
    /// Returns `SqlTemplateError::SqliteError` on a missing column or type mismatch.
    pub fn get_int(&self, column: &str) -> Result<i32, SqlTemplateError> {
        self.get(column)
    }

    /// # Errors
    /// Returns `SqlTemplateError::SqliteError` on a missing column or type mismatch.
    pub fn get_long(&self, column: &str) -> Result<i64, SqlTemplateError> {
        self.get(column)
    }

    /// # Errors
    /// Returns `SqlTemplateError::SqliteError` on a missing column or type mismatch.
    pub fn get_short(&self, column: &str) -> Result<i16, SqlTemplateError> {
        self.get(column)
    }

    /// # Errors
    /// Returns `SqlTemplateError::SqliteError` on a missing column or type mismatch.
    pub fn get_byte(&self, column: &str) -> Result<i8, SqlTemplateError> {
        self.get(column)
    }

    /// # Errors
    /// Returns `SqlTemplateError::SqliteError` on a missing column or type mismatch.
    pub fn get_float(&self, column: &str) -> Result<f32, SqlTemplateError> {
        self.get(column)
    }

    /// # Errors
    /// Returns `SqlTemplateError::SqliteError` on a missing column or type mismatch.
    pub fn get_double(&self, column: &str) -> Result<f64, SqlTemplateError> {
        self.get(column)
    }

    /// # Errors
    /// Returns `SqlTemplateError::SqliteError` on a missing column or type mismatch.
    pub fn get_boolean(&self, column: &str) -> Result<bool, SqlTemplateError> {
        self.get(column)
    }

    /// # Errors
    /// Returns `SqlTemplateError::SqliteError` on a missing column or type mismatch.
    pub fn get_string(&self, column: &str) -> Result<String, SqlTemplateError> {
        self.get(column)
    }

    /// # Errors
    /// Returns `SqlTemplateError::SqliteError` on a missing column or type mismatch.
    pub fn get_bytes(&self, column: &str) -> Result<Vec<u8>, SqlTemplateError> {
        self.get(column)
    }

    /// # Errors
    /// Returns `SqlTemplateError::SqliteError` if the column is missing or not a timestamp.
    pub fn get_timestamp(&self, column: &str) -> Result<SqlTimestamp, SqlTemplateError> {
        self.get(column)
    }

    /// # Errors
    /// Returns `SqlTemplateError::SqliteError` if the column is missing or not a date.
    pub fn get_date(&self, column: &str) -> Result<SqlDate, SqlTemplateError> {
        self.get(column)
    }

    /// # Errors
    /// Returns `SqlTemplateError::SqliteError` if the column is missing or not a time.
    pub fn get_time(&self, column: &str) -> Result<SqlTime, SqlTemplateError> {
        self.get(column)
    }

    /// Read a decimal stored as integer, real or text.
    ///
    /// # Errors
    /// Returns `SqlTemplateError::DecodeError` if the stored value is not numeric.
    pub fn get_big_decimal(&self, column: &str) -> Result<Decimal, SqlTemplateError> {
        match self.row.get_ref(column)? {
            ValueRef::Integer(i) => Ok(Decimal::from(i)),
            ValueRef::Real(f) => Decimal::try_from(f).map_err(|e| {
                SqlTemplateError::DecodeError(format!("column {column}: {e}"))
            }),
            ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                .map_err(|e| SqlTemplateError::DecodeError(format!("column {column}: {e}")))?
                .trim()
                .parse::<Decimal>()
                .map_err(|e| SqlTemplateError::DecodeError(format!("column {column}: {e}"))),
            other => Err(SqlTemplateError::DecodeError(format!(
                "column {column} holds {:?}, not a decimal",
                other.data_type()
            ))),
        }
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.row.as_ref().column_names()
    }
}

impl std::fmt::Debug for ResultRow<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultRow")
            .field("columns", &self.column_names())
            .finish()
    }
}
