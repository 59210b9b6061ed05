use rusqlite::ToSql;
use rusqlite::types::{FromSql, FromSqlResult, Null, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;

use crate::binder::ParameterSetter;
use crate::error::SqlTemplateError;
use crate::types::{SqlDate, SqlTime, SqlTimestamp};

use super::statement::SqliteStatement;

// SQLite has no native temporal types: the wire types travel as ISO-8601 text, which is what
// the rusqlite chrono conversions parse on the way back.

impl ToSql for SqlTimestamp {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl ToSql for SqlDate {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl ToSql for SqlTime {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for SqlTimestamp {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        chrono::NaiveDateTime::column_result(value).map(SqlTimestamp::value_of)
    }
}

impl FromSql for SqlDate {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        chrono::NaiveDate::column_result(value).map(SqlDate::value_of)
    }
}

impl FromSql for SqlTime {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        chrono::NaiveTime::column_result(value).map(SqlTime::stored)
    }
}

impl SqliteStatement<'_> {
    fn bind<T: ToSql>(&mut self, index: usize, value: T) -> Result<(), SqlTemplateError> {
        self.stmt
            .raw_bind_parameter(index, value)
            .map_err(SqlTemplateError::SqliteError)
    }
}

impl ParameterSetter for SqliteStatement<'_> {
    fn parameter_count(&self) -> Option<usize> {
        Some(self.stmt.parameter_count())
    }

    fn set_int(&mut self, index: usize, value: i32) -> Result<(), SqlTemplateError> {
        self.bind(index, value)
    }

    fn set_long(&mut self, index: usize, value: i64) -> Result<(), SqlTemplateError> {
        self.bind(index, value)
    }

    fn set_short(&mut self, index: usize, value: i16) -> Result<(), SqlTemplateError> {
        self.bind(index, value)
    }

    fn set_byte(&mut self, index: usize, value: i8) -> Result<(), SqlTemplateError> {
        self.bind(index, value)
    }

    fn set_float(&mut self, index: usize, value: f32) -> Result<(), SqlTemplateError> {
        self.bind(index, value)
    }

    fn set_double(&mut self, index: usize, value: f64) -> Result<(), SqlTemplateError> {
        self.bind(index, value)
    }

    fn set_boolean(&mut self, index: usize, value: bool) -> Result<(), SqlTemplateError> {
        self.bind(index, value)
    }

    fn set_character(&mut self, index: usize, value: char) -> Result<(), SqlTemplateError> {
        self.bind(index, value.to_string())
    }

    fn set_string(&mut self, index: usize, value: &str) -> Result<(), SqlTemplateError> {
        self.bind(index, value)
    }

    fn set_timestamp(&mut self, index: usize, value: SqlTimestamp) -> Result<(), SqlTemplateError> {
        self.bind(index, value)
    }

    fn set_date(&mut self, index: usize, value: SqlDate) -> Result<(), SqlTemplateError> {
        self.bind(index, value)
    }

    fn set_time(&mut self, index: usize, value: SqlTime) -> Result<(), SqlTemplateError> {
        self.bind(index, value)
    }

    fn set_bytes(&mut self, index: usize, value: &[u8]) -> Result<(), SqlTemplateError> {
        self.bind(index, value)
    }

    // Exact only in TEXT or BLOB columns; numeric affinity turns the text into a number.
    fn set_big_decimal(&mut self, index: usize, value: Decimal) -> Result<(), SqlTemplateError> {
        self.bind(index, value.to_string())
    }

    fn set_null(&mut self, index: usize) -> Result<(), SqlTemplateError> {
        self.bind(index, Null)
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::*;
    use crate::binder::bind_arguments;
    use crate::types::SqlArg;

    fn scratch() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (a, b, c, d, e);").unwrap();
        conn
    }

    #[test]
    fn bound_values_land_with_sqlite_storage_classes() {
        let conn = scratch();
        {
            let mut stmt =
                SqliteStatement::prepare(&conn, "INSERT INTO t VALUES (?, ?, ?, ?, ?)").unwrap();
            let args = [
                SqlArg::Char('q'),
                SqlArg::Boolean(true),
                SqlArg::Null,
                SqlArg::Bytes(vec![0xde, 0xad]),
                SqlArg::BigDecimal(Decimal::new(450, 1)),
            ];
            bind_arguments(&mut stmt, &args).unwrap();
            assert_eq!(stmt.execute_update().unwrap(), 1);
        }
        let row: (String, i64, Option<i64>, Vec<u8>, String) = conn
            .query_row("SELECT a, b, c, d, e FROM t", [], |r| {
                Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?))
            })
            .unwrap();
        assert_eq!(row, ("q".into(), 1, None, vec![0xde, 0xad], "45.0".into()));
    }

    #[test]
    fn placeholder_count_comes_from_sqlite() {
        let conn = scratch();
        let stmt = SqliteStatement::prepare(&conn, "SELECT a FROM t WHERE a = ?1 OR b = ?2").unwrap();
        assert_eq!(stmt.parameter_count(), Some(2));
    }

    #[test]
    fn out_of_range_index_is_rejected_by_the_driver() {
        let conn = scratch();
        let mut stmt = SqliteStatement::prepare(&conn, "SELECT a FROM t WHERE a = ?").unwrap();
        assert!(stmt.set_int(2, 7).is_err());
    }

    #[test]
    fn stored_time_fraction_is_kept_on_read() {
        let conn = scratch();
        let read: SqlTime = conn
            .query_row("SELECT '04:05:06.789' AS tm", [], |r| r.get(0))
            .unwrap();
        assert_eq!(
            read.to_local_time(),
            chrono::NaiveTime::from_hms_milli_opt(4, 5, 6, 789).unwrap()
        );
        assert_eq!(read.to_string(), "04:05:06.789");
    }
}
