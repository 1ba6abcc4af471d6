//! Parsers for the reference tables the batch driver consumes.
//!
//! The core never reads spreadsheets; upstream tooling exports the
//! mapping table to TSV or CSV with two columns:
//!
//! | Column | Description |
//! |--------|-------------|
//! | `display_name` | Output artifact label |
//! | `reference` | Raw field reference as authored |
//!
//! A header row is optional and detected from common column names.

pub mod table;

pub use table::{parse_table_file, parse_table_text, TableError};
