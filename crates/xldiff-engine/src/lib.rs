//! # xldiff-engine
//!
//! Comparison engine for spreadsheets.
//!
//! Given a left and a right [`Workbook`](xldiff_core::Workbook), the engine
//! produces an annotated copy of every left sheet:
//! - [`detect`] - finds the header row and key column of a sheet
//! - [`pairing`] - pairs left rows with right rows, by key or by position
//! - [`annotate`] - tags cells as Header, Key and/or Diff
//! - [`compare`] - drives the above over whole workbooks
//!
//! ## Example
//!
//! ```rust
//! use xldiff_core::Workbook;
//! use xldiff_engine::Comparator;
//!
//! let mut left = Workbook::new();
//! left.worksheet_mut(0).unwrap().set_cell_value("A1", 10).unwrap();
//! let mut right = Workbook::new();
//! right.worksheet_mut(0).unwrap().set_cell_value("A1", 12).unwrap();
//!
//! let result = Comparator::new().compare(&left, &right);
//! assert!(result.sheet("Sheet1").unwrap().annotation_at(1, 1).is_diff());
//! ```

pub mod annotate;
pub mod compare;
pub mod detect;
pub mod error;
pub mod options;
pub mod pairing;

pub use annotate::{Annotation, Structural, Tag};
pub use compare::{compare, AnnotatedCell, Comparator, Comparison, SheetComparison, SheetSummary};
pub use detect::{FixedDetector, HeaderKey, HeaderKeyDetector, NoHeaderDetector, SubstringDetector};
pub use error::{CompareError, CompareResult};
pub use options::{CellAnchor, CompareOptions, DuplicateKeyPolicy};
pub use pairing::{PairingKind, RowPairing};
