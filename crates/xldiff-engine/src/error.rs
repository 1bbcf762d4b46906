//! Comparison configuration errors

use thiserror::Error;

/// Result type for engine configuration
pub type CompareResult<T> = std::result::Result<T, CompareError>;

/// Errors raised while configuring a comparison
///
/// Comparing two documents never fails; only invalid detector settings are
/// rejected, at construction time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompareError {
    /// A substring detector needs at least one token
    #[error("header detector needs at least one token")]
    EmptyTokenList,

    /// An empty token would match every cell
    #[error("header detector tokens must not be empty")]
    EmptyToken,

    /// The scan window must cover at least one row
    #[error("header scan window must cover at least one row")]
    ZeroScanRows,

    /// Header rows are 1-based
    #[error("invalid header row {0} (rows start at 1)")]
    InvalidHeaderRow(u32),

    /// Key columns are 1-based and bounded by the sheet width
    #[error("invalid key column {0}")]
    InvalidKeyColumn(u16),
}
