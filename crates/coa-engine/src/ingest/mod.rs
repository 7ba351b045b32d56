//! Row ingestion: table naming, column aliasing, cell parsing, and data access adapters.

pub mod aliases;
mod normalizer;
mod row;
mod source;

pub use aliases::TableKind;
pub use normalizer::{normalize_key, same_key};
pub use row::{rows_into, FromRow, Row, RowReader};
pub use source::{parse_rows, CsvDirectory, DataSource, DataSourceError, InMemoryTables};
