use crate::error::SqlTemplateError;

use super::row::ResultRow;

/// Turns the current row into a caller-chosen value.
///
/// Functions and closures taking `&ResultRow<'_>` implement this automatically:
/// ```rust
/// use sql_template::prelude::*;
///
/// fn product_name(row: &ResultRow<'_>) -> Result<String, SqlTemplateError> {
///     row.get_string("name")
/// }
///
/// fn takes_decoder<D: RowDecoder<String>>(_decoder: &D) {}
/// takes_decoder(&product_name);
/// ```
pub trait RowDecoder<T> {
    /// # Errors
    /// Returns `SqlTemplateError` if a column is missing or holds an unexpected value.
    fn decode(&self, row: &ResultRow<'_>) -> Result<T, SqlTemplateError>;
}

impl<T, F> RowDecoder<T> for F
where
    F: Fn(&ResultRow<'_>) -> Result<T, SqlTemplateError>,
{
    fn decode(&self, row: &ResultRow<'_>) -> Result<T, SqlTemplateError> {
        self(row)
    }
}
