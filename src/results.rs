pub mod decoder;
pub mod row;

pub use decoder::RowDecoder;
pub use row::ResultRow;
