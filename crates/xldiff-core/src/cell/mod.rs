//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellValue`] - The value stored in a cell
//! - [`ValueKey`] - A hashable projection of a value, used for key lookups
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellData`] - Complete cell data including value and style

mod address;
mod storage;
mod value;

pub use address::CellAddress;
pub use storage::{CellData, CellStorage};
pub use value::{CellError, CellValue, SharedString, ValueKey};
