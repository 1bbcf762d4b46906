//! Write/read round-trip tests for xldiff-xlsx.
//!
//! Each test builds the workbook it needs in memory, writes it to a temporary
//! file with `XlsxWriter`, reads it back with `XlsxReader` and asserts on what
//! came back.

mod common;
mod styles;
mod values;

pub use common::*;
