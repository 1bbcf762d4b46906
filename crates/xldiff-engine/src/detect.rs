//! Header row and key column detection
//!
//! A detector looks at one sheet and decides which row holds the column
//! titles and which column identifies a record. Everything downstream (row
//! pairing, Header/Key tags) only sees the resulting [`HeaderKey`], so
//! detectors can be swapped without touching the matching logic.

use std::sync::Arc;

use crate::error::{CompareError, CompareResult};
use xldiff_core::{Worksheet, MAX_COLS, MAX_ROWS};

/// Location of the header row and the key column, both 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderKey {
    pub header_row: u32,
    pub key_column: u16,
}

impl HeaderKey {
    pub fn new(header_row: u32, key_column: u16) -> Self {
        Self {
            header_row,
            key_column,
        }
    }

    /// Rows strictly after the header row hold records
    pub fn is_data_row(&self, row: u32) -> bool {
        row > self.header_row
    }
}

/// Strategy for locating the header row and key column of a sheet
pub trait HeaderKeyDetector {
    /// Returns `None` when the sheet has no recognisable header
    fn detect(&self, sheet: &Worksheet) -> Option<HeaderKey>;
}

impl<D: HeaderKeyDetector + ?Sized> HeaderKeyDetector for &D {
    fn detect(&self, sheet: &Worksheet) -> Option<HeaderKey> {
        (**self).detect(sheet)
    }
}

impl<D: HeaderKeyDetector + ?Sized> HeaderKeyDetector for Box<D> {
    fn detect(&self, sheet: &Worksheet) -> Option<HeaderKey> {
        (**self).detect(sheet)
    }
}

impl<D: HeaderKeyDetector + ?Sized> HeaderKeyDetector for Arc<D> {
    fn detect(&self, sheet: &Worksheet) -> Option<HeaderKey> {
        (**self).detect(sheet)
    }
}

/// Finds the first cell, in row-major order within the leading rows, whose
/// text contains one of a set of tokens (case-insensitive)
///
/// That cell's row becomes the header row and its column the key column.
/// Scanning stops at the first hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstringDetector {
    tokens: Vec<String>,
    scan_rows: u32,
}

impl SubstringDetector {
    /// Tokens that mark an identifier column
    pub const DEFAULT_TOKENS: [&'static str; 3] = ["id", "sku", "#"];
    /// Number of leading rows searched for a header
    pub const DEFAULT_SCAN_ROWS: u32 = 20;

    /// Create a detector with custom tokens and scan window
    ///
    /// Tokens are matched case-insensitively.
    pub fn new<I, S>(tokens: I, scan_rows: u32) -> CompareResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: Vec<String> = tokens
            .into_iter()
            .map(|t| t.as_ref().to_lowercase())
            .collect();

        if tokens.is_empty() {
            return Err(CompareError::EmptyTokenList);
        }
        if tokens.iter().any(|t| t.is_empty()) {
            return Err(CompareError::EmptyToken);
        }
        if scan_rows == 0 {
            return Err(CompareError::ZeroScanRows);
        }

        Ok(Self { tokens, scan_rows })
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn scan_rows(&self) -> u32 {
        self.scan_rows
    }

    fn matches(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.tokens.iter().any(|t| lower.contains(t.as_str()))
    }
}

impl Default for SubstringDetector {
    fn default() -> Self {
        Self {
            tokens: Self::DEFAULT_TOKENS.iter().map(|t| t.to_string()).collect(),
            scan_rows: Self::DEFAULT_SCAN_ROWS,
        }
    }
}

impl HeaderKeyDetector for SubstringDetector {
    fn detect(&self, sheet: &Worksheet) -> Option<HeaderKey> {
        let last_row = self.scan_rows.min(sheet.max_row());

        sheet
            .row_indices()
            .take_while(|&row| row <= last_row)
            .find_map(|row| {
                sheet
                    .iter_row(row)
                    .filter(|(_, cell)| !cell.value.is_empty())
                    .find(|(_, cell)| self.matches(&cell.value.to_string()))
                    .map(|(col, _)| HeaderKey::new(row, col))
            })
    }
}

/// Reports a header row and key column fixed in advance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDetector {
    header: HeaderKey,
}

impl FixedDetector {
    pub fn new(header_row: u32, key_column: u16) -> CompareResult<Self> {
        if header_row == 0 || header_row > MAX_ROWS {
            return Err(CompareError::InvalidHeaderRow(header_row));
        }
        if key_column == 0 || key_column > MAX_COLS {
            return Err(CompareError::InvalidKeyColumn(key_column));
        }
        Ok(Self {
            header: HeaderKey::new(header_row, key_column),
        })
    }
}

impl HeaderKeyDetector for FixedDetector {
    fn detect(&self, _sheet: &Worksheet) -> Option<HeaderKey> {
        Some(self.header)
    }
}

/// Never finds a header, so every row is paired by position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoHeaderDetector;

impl HeaderKeyDetector for NoHeaderDetector {
    fn detect(&self, _sheet: &Worksheet) -> Option<HeaderKey> {
        None
    }
}
