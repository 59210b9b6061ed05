//! Convenient imports for common functionality.
//!
//! This module re-exports the types most callers need to run queries and write decoders.

pub use crate::error::SqlTemplateError;
pub use crate::provider::ConnectionProvider;
pub use crate::results::{ResultRow, RowDecoder};
pub use crate::sql_args;
pub use crate::sqlite::{SqliteOptions, SqliteOptionsBuilder, SqliteProvider};
pub use crate::template::{SqlTemplate, TemplateOptions};
pub use crate::types::{ConcurrencyPolicy, SqlArg, SqlDate, SqlTime, SqlTimestamp};
