//! Prelude module - common imports for xldiff users
//!
//! ```rust
//! use xldiff::prelude::*;
//! ```

pub use crate::{
    // Cell types
    CellAddress,
    CellValue,
    // Comparison
    Comparator,
    CompareOptions,
    Comparison,
    // I/O types
    CsvReader,
    // Error types
    Error,
    // Detectors
    FixedDetector,
    HeaderKey,
    HeaderKeyDetector,
    NoHeaderDetector,
    Result,
    SheetComparison,
    SubstringDetector,
    // Main types
    Workbook,
    // Extension traits
    WorkbookExt,
    Worksheet,
    XlsxReader,
    XlsxWriter,
};
pub use crate::report::{styled_workbook, ReportStyle};
