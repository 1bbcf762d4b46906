//! # xldiff-core
//!
//! Core document model for the xldiff spreadsheet comparison library.
//!
//! This crate provides the types every other xldiff crate speaks:
//! - [`CellValue`] - Materialised cell values (numbers, text, booleans, dates, errors)
//! - [`CellAddress`] - 1-based cell addressing (`A1` is row 1, column 1)
//! - [`Style`] - The subset of cell formatting used to mark up comparison output
//! - [`Workbook`], [`Worksheet`] - The document structures
//!
//! ## Example
//!
//! ```rust
//! use xldiff_core::{Workbook, CellValue};
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! // Using string addresses
//! sheet.set_cell_value("A1", "ID").unwrap();
//! sheet.set_cell_value("B1", 42.0).unwrap();
//!
//! // Or using row/column indices (1-based)
//! sheet.set_cell_value_at(2, 1, CellValue::string("SKU-1")).unwrap();
//! assert_eq!(sheet.max_row(), 2);
//! ```

pub mod cell;
pub mod error;
pub mod style;
pub mod workbook;
pub mod worksheet;

pub use cell::{CellAddress, CellData, CellError, CellValue, SharedString, ValueKey};
pub use error::{Error, Result};
pub use style::{Color, FillStyle, FontStyle, NumberFormat, Style, StylePool};
pub use workbook::Workbook;
pub use worksheet::Worksheet;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
