//! Comparison options

/// How a left cell finds its counterpart in a paired right row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CellAnchor {
    /// Compare against the right cell with the same column number
    #[default]
    Column,
    /// Compare against the right cell at the same index within the row's
    /// populated cells, ignoring column numbers
    Position,
}

/// What the keyed lookup does when a key value recurs in the right sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DuplicateKeyPolicy {
    /// The last right row carrying the key wins
    #[default]
    LastWins,
    /// The first right row carrying the key wins
    FirstWins,
    /// A recurring key pairs with nothing
    Exclude,
}

/// Options for comparing two workbooks
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// How cells of paired rows are lined up (default: by column)
    pub cell_anchor: CellAnchor,
    /// Duplicate key handling in the right sheet (default: last wins)
    pub duplicate_keys: DuplicateKeyPolicy,
    /// Emit an empty Diff cell where a paired right row has a value the left
    /// row lacks (column anchoring only, default: true)
    pub report_vacated_cells: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            cell_anchor: CellAnchor::Column,
            duplicate_keys: DuplicateKeyPolicy::LastWins,
            report_vacated_cells: true,
        }
    }
}

impl CompareOptions {
    /// Positional cell anchoring and no vacated-cell reporting
    pub fn positional() -> Self {
        Self {
            cell_anchor: CellAnchor::Position,
            report_vacated_cells: false,
            ..Self::default()
        }
    }
}
