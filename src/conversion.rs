//! Argument coercion and setter naming.
//!
//! Both steps happen before anything touches a statement: [`coerce`] rewrites date/time
//! arguments into their wire-level types, and [`setter_name`] derives which typed setter the
//! binder will call from the argument's original type name.

use crate::types::{BindValue, SqlArg, SqlDate, SqlTime, SqlTimestamp};

const SETTER_PREFIX: &str = "set";

/// Rewrite an argument into the value handed to the statement setter.
///
/// Only the three calendar types change shape; every other argument passes through as the
/// matching dispatch tag, and types without a setter end up as [`BindValue::Unsupported`].
#[must_use]
pub fn coerce(arg: &SqlArg) -> BindValue<'_> {
    match arg {
        SqlArg::LocalDateTime(dt) => BindValue::Timestamp(SqlTimestamp::value_of(*dt)),
        SqlArg::LocalDate(d) => BindValue::Date(SqlDate::value_of(*d)),
        SqlArg::LocalTime(t) => BindValue::Time(SqlTime::value_of(*t)),
        SqlArg::Int(v) => BindValue::Int(*v),
        SqlArg::Long(v) => BindValue::Long(*v),
        SqlArg::Short(v) => BindValue::Short(*v),
        SqlArg::Byte(v) => BindValue::Byte(*v),
        SqlArg::Float(v) => BindValue::Float(*v),
        SqlArg::Double(v) => BindValue::Double(*v),
        SqlArg::Boolean(v) => BindValue::Boolean(*v),
        SqlArg::Char(v) => BindValue::Char(*v),
        SqlArg::String(v) => BindValue::String(v),
        SqlArg::Timestamp(v) => BindValue::Timestamp(*v),
        SqlArg::Date(v) => BindValue::Date(*v),
        SqlArg::Time(v) => BindValue::Time(*v),
        SqlArg::Bytes(v) => BindValue::Bytes(v),
        SqlArg::BigDecimal(v) => BindValue::BigDecimal(*v),
        SqlArg::Null => BindValue::Null,
        SqlArg::Opaque { type_name, .. } => BindValue::Unsupported(type_name),
    }
}

/// Map a type name to the suffix of its setter.
///
/// `Integer` and the three calendar types are renamed; any other name is its own suffix, so
/// the mapping is stable when applied to its own output.
#[must_use]
pub fn setter_suffix(type_name: &str) -> &str {
    match type_name {
        "Integer" => "Int",
        "LocalDateTime" => "Timestamp",
        "LocalDate" => "Date",
        "LocalTime" => "Time",
        other => other,
    }
}

/// Full setter name for an argument, e.g. `setInt` or `setTimestamp`.
#[must_use]
pub fn setter_name(arg: &SqlArg) -> String {
    format!("{SETTER_PREFIX}{}", setter_suffix(arg.type_name()))
}
