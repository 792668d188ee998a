//! CSV ingestion for reference tables.

pub mod table;

pub use table::{ColumnTypes, load_table, parse_table};
