//! Small synchronous helpers for running parameterized SQL over `rusqlite`.
//!
//! [`SqlTemplate`] offers three operations (a list query, a single-row query and an update)
//! and takes care of acquiring the connection, preparing the statement, binding arguments and
//! releasing everything afterwards. Arguments are [`SqlArg`] values; the binder coerces
//! calendar values to their wire types and calls the typed setter named after each
//! argument's type.

pub mod binder;
pub mod conversion;
pub mod error;
mod macros;
pub mod prelude;
pub mod provider;
pub mod results;
mod serial;
pub mod sqlite;
pub mod template;
pub mod types;

pub use binder::{ParameterSetter, bind_arguments};
pub use error::SqlTemplateError;
pub use provider::ConnectionProvider;
pub use results::{ResultRow, RowDecoder};
pub use sqlite::{SqliteOptions, SqliteOptionsBuilder, SqliteProvider};
pub use template::{Operation, SqlTemplate, TemplateOptions};
pub use types::{
    ArgList, BindValue, ConcurrencyPolicy, SqlArg, SqlDate, SqlTime, SqlTimestamp,
};
