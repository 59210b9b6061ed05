use rust_decimal::Decimal;

use crate::conversion::{coerce, setter_name};
use crate::error::SqlTemplateError;
use crate::types::{BindValue, SqlArg, SqlDate, SqlTime, SqlTimestamp};

/// Typed positional setters of a prepared statement. Indexes are 1-based.
pub trait ParameterSetter {
    /// Number of placeholders the statement declares, when the driver can tell.
    fn parameter_count(&self) -> Option<usize> {
        None
    }

    /// # Errors
    /// Returns `SqlTemplateError` if the driver rejects the value or index.
    fn set_int(&mut self, index: usize, value: i32) -> Result<(), SqlTemplateError>;
    /// # Errors
    /// Returns `SqlTemplateError` if the driver rejects the value or index.
    fn set_long(&mut self, index: usize, value: i64) -> Result<(), SqlTemplateError>;
    /// # Errors
    /// Returns `SqlTemplateError` if the driver rejects the value or index.
    fn set_short(&mut self, index: usize, value: i16) -> Result<(), SqlTemplateError>;
    /// # Errors
    /// Returns `SqlTemplateError` if the driver rejects the value or index.
    fn set_byte(&mut self, index: usize, value: i8) -> Result<(), SqlTemplateError>;
    /// # Errors
    /// Returns `SqlTemplateError` if the driver rejects the value or index.
    fn set_float(&mut self, index: usize, value: f32) -> Result<(), SqlTemplateError>;
    /// # Errors
    /// Returns `SqlTemplateError` if the driver rejects the value or index.
    fn set_double(&mut self, index: usize, value: f64) -> Result<(), SqlTemplateError>;
    /// # Errors
    /// Returns `SqlTemplateError` if the driver rejects the value or index.
    fn set_boolean(&mut self, index: usize, value: bool) -> Result<(), SqlTemplateError>;
    /// # Errors
    /// Returns `SqlTemplateError` if the driver rejects the value or index.
    fn set_character(&mut self, index: usize, value: char) -> Result<(), SqlTemplateError>;
    /// # Errors
    /// Returns `SqlTemplateError` if the driver rejects the value or index.
    fn set_string(&mut self, index: usize, value: &str) -> Result<(), SqlTemplateError>;
    /// # Errors
    /// Returns `SqlTemplateError` if the driver rejects the value or index.
    fn set_timestamp(&mut self, index: usize, value: SqlTimestamp)
    -> Result<(), SqlTemplateError>;
    /// # Errors
    /// Returns `SqlTemplateError` if the driver rejects the value or index.
    fn set_date(&mut self, index: usize, value: SqlDate) -> Result<(), SqlTemplateError>;
    /// # Errors
    /// Returns `SqlTemplateError` if the driver rejects the value or index.
    fn set_time(&mut self, index: usize, value: SqlTime) -> Result<(), SqlTemplateError>;
    /// # Errors
    /// Returns `SqlTemplateError` if the driver rejects the value or index.
    fn set_bytes(&mut self, index: usize, value: &[u8]) -> Result<(), SqlTemplateError>;
    /// # Errors
    /// Returns `SqlTemplateError` if the driver rejects the value or index.
    fn set_big_decimal(&mut self, index: usize, value: Decimal) -> Result<(), SqlTemplateError>;
    /// # Errors
    /// Returns `SqlTemplateError` if the driver rejects the index.
    fn set_null(&mut self, index: usize) -> Result<(), SqlTemplateError>;
}

/// Bind every argument to its placeholder, in order.
///
/// Each argument is coerced, then handed to the setter named after its original type. Binding
/// stops at the first argument that has no setter or that the driver refuses. Once every
/// argument is bound, the count is checked against the placeholders the statement declares.
///
/// # Errors
/// Returns `SqlTemplateError::BindingError` naming the failing index and type, or
/// `SqlTemplateError::ParameterCountMismatch` when placeholders are left unbound.
pub fn bind_arguments<S>(statement: &mut S, args: &[SqlArg]) -> Result<(), SqlTemplateError>
where
    S: ParameterSetter + ?Sized,
{
    for (offset, arg) in args.iter().enumerate() {
        let index = offset + 1;
        let setter = setter_name(arg);
        apply(statement, index, coerce(arg)).map_err(|reason| {
            SqlTemplateError::BindingError {
                index,
                type_name: arg.type_name().to_string(),
                setter: setter.clone(),
                reason,
            }
        })?;
        tracing::trace!(
            index,
            setter = %setter,
            primitive = arg.is_primitive(),
            "bound parameter"
        );
    }

    // Surplus arguments are refused by the driver above; missing ones would silently bind NULL.
    if let Some(expected) = statement.parameter_count() {
        if expected != args.len() {
            return Err(SqlTemplateError::ParameterCountMismatch {
                expected,
                actual: args.len(),
            });
        }
    }
    Ok(())
}

fn apply<S>(statement: &mut S, index: usize, value: BindValue<'_>) -> Result<(), String>
where
    S: ParameterSetter + ?Sized,
{
    let outcome = match value {
        BindValue::Int(v) => statement.set_int(index, v),
        BindValue::Long(v) => statement.set_long(index, v),
        BindValue::Short(v) => statement.set_short(index, v),
        BindValue::Byte(v) => statement.set_byte(index, v),
        BindValue::Float(v) => statement.set_float(index, v),
        BindValue::Double(v) => statement.set_double(index, v),
        BindValue::Boolean(v) => statement.set_boolean(index, v),
        BindValue::Char(v) => statement.set_character(index, v),
        BindValue::String(v) => statement.set_string(index, v),
        BindValue::Timestamp(v) => statement.set_timestamp(index, v),
        BindValue::Date(v) => statement.set_date(index, v),
        BindValue::Time(v) => statement.set_time(index, v),
        BindValue::Bytes(v) => statement.set_bytes(index, v),
        BindValue::BigDecimal(v) => statement.set_big_decimal(index, v),
        BindValue::Null => statement.set_null(index),
        BindValue::Unsupported(type_name) => {
            return Err(format!("no setter accepts values of type {type_name}"));
        }
    };
    outcome.map_err(|e| e.to_string())
}
