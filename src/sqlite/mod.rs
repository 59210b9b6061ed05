// SQLite module - the rusqlite-backed side of the template
//
// - config: connection options and the default connection provider
// - statement: prepared statement wrapper
// - params: typed setters and wire-type conversions
// - query: result cursor and row reduction

pub mod config;
pub mod params;
pub mod query;
pub mod statement;

pub use config::{SqliteOptions, SqliteOptionsBuilder, SqliteProvider};
pub use query::{SqliteCursor, collect_rows, first_row};
pub use statement::SqliteStatement;
