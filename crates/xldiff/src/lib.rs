//! # xldiff
//!
//! Visual comparison of spreadsheets.
//!
//! xldiff reads two workbooks (XLSX or CSV), finds the header row and key
//! column of every sheet, pairs rows by key so reordered records still line
//! up, and marks up a copy of the left workbook:
//!
//! - Header cells get a green fill
//! - Key cells get a yellow fill
//! - Cells whose value differs from the paired right cell get a red font
//!
//! ## Example
//!
//! ```rust
//! use xldiff::prelude::*;
//!
//! let mut left = Workbook::new();
//! let sheet = left.worksheet_mut(0).unwrap();
//! sheet.set_cell_value("A1", "SKU").unwrap();
//! sheet.set_cell_value("B1", "Price").unwrap();
//! sheet.set_cell_value("A2", "A-1").unwrap();
//! sheet.set_cell_value("B2", 10).unwrap();
//!
//! let mut right = left.clone();
//! right.worksheet_mut(0).unwrap().set_cell_value("B2", 12).unwrap();
//!
//! let comparison = Comparator::new().compare(&left, &right);
//! assert_eq!(comparison.total_diffs(), 1);
//!
//! let report = styled_workbook(&comparison, &ReportStyle::default()).unwrap();
//! // report.save("comparison_result.xlsx").unwrap();
//! # let _ = report;
//! ```

pub mod prelude;
pub mod report;

// Re-export core types
pub use xldiff_core::{
    CellAddress, CellData, CellError, CellValue, Color, Error, FillStyle, FontStyle, NumberFormat,
    Result, Style, StylePool, ValueKey, Workbook, Worksheet, MAX_COLS, MAX_ROWS,
    MAX_SHEET_NAME_LEN,
};

// Re-export engine types
pub use xldiff_engine::{
    compare, AnnotatedCell, Annotation, CellAnchor, Comparator, CompareError, CompareOptions,
    Comparison, DuplicateKeyPolicy, FixedDetector, HeaderKey, HeaderKeyDetector, NoHeaderDetector,
    PairingKind, SheetComparison, SheetSummary, Structural, SubstringDetector, Tag,
};

// Re-export I/O types
pub use xldiff_csv::{CsvError, CsvReadOptions, CsvReader};
pub use xldiff_xlsx::{XlsxError, XlsxReader, XlsxWriter};

use std::path::Path;

/// Extension trait for Workbook to add file I/O
pub trait WorkbookExt {
    /// Open a workbook from a file, choosing the reader by extension
    fn open<P: AsRef<Path>>(path: P) -> Result<Workbook>;

    /// Save the workbook to a file (XLSX only)
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()>;
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

impl WorkbookExt for Workbook {
    fn open<P: AsRef<Path>>(path: P) -> Result<Workbook> {
        let path = path.as_ref();

        match extension(path).as_deref() {
            Some("xlsx") | Some("xlsm") => {
                XlsxReader::read_file(path).map_err(|e| Error::other(e.to_string()))
            }
            Some("csv") => CsvReader::read_file(path, &CsvReadOptions::default())
                .map_err(|e| Error::other(e.to_string())),
            Some("tsv") => CsvReader::read_file(path, &CsvReadOptions::tsv())
                .map_err(|e| Error::other(e.to_string())),
            _ => Err(Error::other(format!(
                "Unsupported file format: {}",
                path.display()
            ))),
        }
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        match extension(path).as_deref() {
            Some("xlsx") => {
                XlsxWriter::write_file(self, path).map_err(|e| Error::other(e.to_string()))
            }
            _ => Err(Error::other(format!(
                "Unsupported output format: {}",
                path.display()
            ))),
        }
    }
}
