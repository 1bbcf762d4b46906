//! # xldiff-csv
//!
//! CSV reader for xldiff. A CSV file becomes a one-sheet workbook whose
//! first record is row 1, so header detection sees the file exactly as a
//! spreadsheet application would show it.

mod error;
mod options;
mod reader;

pub use error::{CsvError, CsvResult};
pub use options::CsvReadOptions;
pub use reader::CsvReader;
