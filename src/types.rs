use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Values callers pass as positional statement arguments.
///
/// Plain Rust values convert through `From`, so argument lists are usually built with
/// [`sql_args!`](crate::sql_args):
/// ```rust
/// use sql_template::prelude::*;
///
/// let args = sql_args!["Nokia G11", 4499.0, 2];
/// assert_eq!(args[0], SqlArg::String("Nokia G11".into()));
/// assert_eq!(args[2].type_name(), "Integer");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SqlArg {
    /// 32-bit integer
    Int(i32),
    /// 64-bit integer
    Long(i64),
    /// 16-bit integer
    Short(i16),
    /// 8-bit integer
    Byte(i8),
    /// 32-bit float
    Float(f32),
    /// 64-bit float
    Double(f64),
    Boolean(bool),
    /// Single character, bound as one-character text
    Char(char),
    String(String),
    /// Wire-level timestamp
    Timestamp(SqlTimestamp),
    /// Wire-level date
    Date(SqlDate),
    /// Wire-level time of day
    Time(SqlTime),
    /// Calendar date-time without zone; coerced to [`SqlTimestamp`] before binding
    LocalDateTime(NaiveDateTime),
    /// Calendar date; coerced to [`SqlDate`] before binding
    LocalDate(NaiveDate),
    /// Wall-clock time; coerced to [`SqlTime`] before binding
    LocalTime(NaiveTime),
    /// Binary data
    Bytes(Vec<u8>),
    /// Arbitrary-precision decimal, bound as its canonical text form
    BigDecimal(Decimal),
    /// SQL NULL
    Null,
    /// A caller type the binder has no setter for.
    Opaque { type_name: String, repr: String },
}

impl SqlArg {
    /// Wrap an arbitrary caller value. Binding an opaque argument always fails with a
    /// binding error naming the value's type.
    #[must_use]
    pub fn opaque<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        SqlArg::Opaque {
            type_name: simple_type_name(std::any::type_name::<T>()).to_string(),
            repr: format!("{value:?}"),
        }
    }

    /// Simple name of the argument's runtime type, the input to setter naming.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            SqlArg::Int(_) => "Integer",
            SqlArg::Long(_) => "Long",
            SqlArg::Short(_) => "Short",
            SqlArg::Byte(_) => "Byte",
            SqlArg::Float(_) => "Float",
            SqlArg::Double(_) => "Double",
            SqlArg::Boolean(_) => "Boolean",
            SqlArg::Char(_) => "Character",
            SqlArg::String(_) => "String",
            SqlArg::Timestamp(_) => "Timestamp",
            SqlArg::Date(_) => "Date",
            SqlArg::Time(_) => "Time",
            SqlArg::LocalDateTime(_) => "LocalDateTime",
            SqlArg::LocalDate(_) => "LocalDate",
            SqlArg::LocalTime(_) => "LocalTime",
            SqlArg::Bytes(_) => "Bytes",
            SqlArg::BigDecimal(_) => "BigDecimal",
            SqlArg::Null => "Null",
            SqlArg::Opaque { type_name, .. } => type_name,
        }
    }

    /// True for the eight primitive wrapper kinds (boolean, character, byte, short, integer,
    /// long, float, double).
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            SqlArg::Boolean(_)
                | SqlArg::Char(_)
                | SqlArg::Byte(_)
                | SqlArg::Short(_)
                | SqlArg::Int(_)
                | SqlArg::Long(_)
                | SqlArg::Float(_)
                | SqlArg::Double(_)
        )
    }
}

fn simple_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

impl fmt::Display for SqlArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlArg::Int(v) => write!(f, "{v}"),
            SqlArg::Long(v) => write!(f, "{v}"),
            SqlArg::Short(v) => write!(f, "{v}"),
            SqlArg::Byte(v) => write!(f, "{v}"),
            // Debug keeps the trailing ".0" on whole floats
            SqlArg::Float(v) => write!(f, "{v:?}"),
            SqlArg::Double(v) => write!(f, "{v:?}"),
            SqlArg::Boolean(v) => write!(f, "{v}"),
            SqlArg::Char(v) => write!(f, "{v}"),
            SqlArg::String(v) => f.write_str(v),
            SqlArg::Timestamp(v) => write!(f, "{v}"),
            SqlArg::Date(v) => write!(f, "{v}"),
            SqlArg::Time(v) => write!(f, "{v}"),
            SqlArg::LocalDateTime(v) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S%.f")),
            SqlArg::LocalDate(v) => write!(f, "{v}"),
            SqlArg::LocalTime(v) => write!(f, "{v}"),
            SqlArg::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            SqlArg::BigDecimal(v) => write!(f, "{v}"),
            SqlArg::Null => f.write_str("null"),
            SqlArg::Opaque { repr, .. } => f.write_str(repr),
        }
    }
}

/// Display adapter rendering an argument list as `[a, b, c]` for log events.
#[derive(Debug, Clone, Copy)]
pub struct ArgList<'a>(pub &'a [SqlArg]);

impl fmt::Display for ArgList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, arg) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str("]")
    }
}

/// Wire-level timestamp. Keeps every field of the source date-time, nanoseconds included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SqlTimestamp(NaiveDateTime);

impl SqlTimestamp {
    #[must_use]
    pub fn value_of(value: NaiveDateTime) -> Self {
        SqlTimestamp(value)
    }

    #[must_use]
    pub fn to_local_date_time(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for SqlTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%F %T%.f"))
    }
}

/// Wire-level calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SqlDate(NaiveDate);

impl SqlDate {
    #[must_use]
    pub fn value_of(value: NaiveDate) -> Self {
        SqlDate(value)
    }

    #[must_use]
    pub fn to_local_date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for SqlDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%F"))
    }
}

/// Wire-level time of day.
///
/// Values built with [`value_of`](Self::value_of) have whole-second precision; values read
/// from a column keep the fraction that was stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SqlTime(NaiveTime);

impl SqlTime {
    /// Build from a wall-clock time, dropping fractional seconds.
    #[must_use]
    pub fn value_of(value: NaiveTime) -> Self {
        SqlTime(value.with_nanosecond(0).unwrap_or(value))
    }

    pub(crate) fn stored(value: NaiveTime) -> Self {
        SqlTime(value)
    }

    #[must_use]
    pub fn to_local_time(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for SqlTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%T%.f"))
    }
}

/// The closed set of values the binder knows a typed setter for, after coercion.
///
/// `Unsupported` carries arguments that passed through coercion untouched but have no setter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BindValue<'a> {
    Int(i32),
    Long(i64),
    Short(i16),
    Byte(i8),
    Float(f32),
    Double(f64),
    Boolean(bool),
    Char(char),
    String(&'a str),
    Timestamp(SqlTimestamp),
    Date(SqlDate),
    Time(SqlTime),
    Bytes(&'a [u8]),
    BigDecimal(Decimal),
    Null,
    Unsupported(&'a str),
}

/// How operations on one `SqlTemplate` instance are scheduled against each other.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyPolicy {
    /// One operation at a time per instance
    #[default]
    Serialized,
    /// No instance lock; the connection provider is trusted to handle concurrent use
    Unrestricted,
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for SqlArg {
                fn from(value: $ty) -> Self {
                    SqlArg::$variant(value)
                }
            }
        )+
    };
}

impl_from_value!(
    i32 => Int,
    i64 => Long,
    i16 => Short,
    i8 => Byte,
    f32 => Float,
    f64 => Double,
    bool => Boolean,
    char => Char,
    String => String,
    SqlTimestamp => Timestamp,
    SqlDate => Date,
    SqlTime => Time,
    NaiveDateTime => LocalDateTime,
    NaiveDate => LocalDate,
    NaiveTime => LocalTime,
    Vec<u8> => Bytes,
    Decimal => BigDecimal,
);

impl From<&str> for SqlArg {
    fn from(value: &str) -> Self {
        SqlArg::String(value.to_owned())
    }
}

impl From<&String> for SqlArg {
    fn from(value: &String) -> Self {
        SqlArg::String(value.clone())
    }
}

impl From<&[u8]> for SqlArg {
    fn from(value: &[u8]) -> Self {
        SqlArg::Bytes(value.to_vec())
    }
}

impl<T: Into<SqlArg>> From<Option<T>> for SqlArg {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlArg::Null, Into::into)
    }
}
