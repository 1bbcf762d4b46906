//! # xldiff-xlsx
//!
//! XLSX (Office Open XML) reader and writer for xldiff.
//!
//! The reader materialises every cell as the value a user sees: formula
//! cells contribute their cached result, and numbers carrying a date number
//! format become [`CellValue::DateTime`](xldiff_core::CellValue::DateTime).
//! The writer serialises values together with fonts, fills and number
//! formats, which is all a comparison report needs.

pub mod dates;
pub mod error;
pub mod reader;
pub mod writer;

mod styles;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;
