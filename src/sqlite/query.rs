use crate::error::SqlTemplateError;
use crate::results::{ResultRow, RowDecoder};

/// Forward-only cursor over the rows of an executing statement.
pub struct SqliteCursor<'stmt> {
    rows: rusqlite::Rows<'stmt>,
}

impl<'stmt> SqliteCursor<'stmt> {
    pub(crate) fn new(rows: rusqlite::Rows<'stmt>) -> Self {
        Self { rows }
    }

    /// Move to the next row. `None` once the result is exhausted.
    ///
    /// # Errors
    /// Returns `SqlTemplateError::SqliteError` if stepping the statement fails.
    pub fn advance(&mut self) -> Result<Option<ResultRow<'_>>, SqlTemplateError> {
        match self.rows.next()? {
            Some(row) => Ok(Some(ResultRow::new(row))),
            None => Ok(None),
        }
    }
}

/// Decode every remaining row, in the order `SQLite` produces them.
///
/// # Errors
/// Returns the first cursor or decoder error.
pub fn collect_rows<T, D>(
    cursor: &mut SqliteCursor<'_>,
    decoder: &D,
) -> Result<Vec<T>, SqlTemplateError>
where
    D: RowDecoder<T> + ?Sized,
{
    let mut results = Vec::new();
    while let Some(row) = cursor.advance()? {
        results.push(decoder.decode(&row)?);
    }
    Ok(results)
}

/// Decode the next row if there is one; later rows are left unread.
///
/// # Errors
/// Returns the cursor or decoder error.
pub fn first_row<T, D>(
    cursor: &mut SqliteCursor<'_>,
    decoder: &D,
) -> Result<Option<T>, SqlTemplateError>
where
    D: RowDecoder<T> + ?Sized,
{
    match cursor.advance()? {
        Some(row) => decoder.decode(&row).map(Some),
        None => Ok(None),
    }
}
