//! Cell annotation: Header/Key structure tags and the Diff flag

use std::fmt;

use crate::detect::HeaderKey;
use crate::options::CellAnchor;
use xldiff_core::{CellValue, Worksheet};

/// Structural role of a cell; a cell is at most one of these
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Structural {
    /// Cell of the header row
    Header,
    /// Key-column cell of a data row
    Key,
}

/// Annotation tag attached to an output cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Tag {
    Header,
    Key,
    Diff,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Header => "header",
            Tag::Key => "key",
            Tag::Diff => "diff",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Structural> for Tag {
    fn from(s: Structural) -> Self {
        match s {
            Structural::Header => Tag::Header,
            Structural::Key => Tag::Key,
        }
    }
}

/// Tags of one output cell
///
/// Header and Key exclude each other; Diff combines with either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Annotation {
    pub structural: Option<Structural>,
    pub diff: bool,
}

impl Annotation {
    pub fn new(structural: Option<Structural>, diff: bool) -> Self {
        Self { structural, diff }
    }

    pub fn is_header(&self) -> bool {
        self.structural == Some(Structural::Header)
    }

    pub fn is_key(&self) -> bool {
        self.structural == Some(Structural::Key)
    }

    pub fn is_diff(&self) -> bool {
        self.diff
    }

    /// No tags at all
    pub fn is_plain(&self) -> bool {
        self.structural.is_none() && !self.diff
    }

    pub fn has(&self, tag: Tag) -> bool {
        match tag {
            Tag::Header => self.is_header(),
            Tag::Key => self.is_key(),
            Tag::Diff => self.diff,
        }
    }

    /// Tags in Header, Key, Diff order
    pub fn tags(&self) -> impl Iterator<Item = Tag> {
        self.structural
            .map(Tag::from)
            .into_iter()
            .chain(self.diff.then_some(Tag::Diff))
    }
}

/// Header wins over Key; Key only applies to rows below the header
pub fn structural_tag(row: u32, col: u16, header: Option<HeaderKey>) -> Option<Structural> {
    let header = header?;
    if row == header.header_row {
        Some(Structural::Header)
    } else if col == header.key_column && header.is_data_row(row) {
        Some(Structural::Key)
    } else {
        None
    }
}

/// Populated cells of a row (non-empty values), in column order
pub fn populated_cells(sheet: &Worksheet, row: u32) -> impl Iterator<Item = (u16, &CellValue)> {
    sheet
        .iter_row(row)
        .map(|(col, cell)| (col, &cell.value))
        .filter(|(_, value)| !value.is_empty())
}

/// A left cell being annotated
#[derive(Debug, Clone, Copy)]
pub struct LeftCell<'a> {
    pub row: u32,
    pub col: u16,
    /// Zero-based index among the row's populated cells
    pub position: usize,
    pub value: &'a CellValue,
}

/// The right row a left row was paired with
#[derive(Debug, Clone, Copy)]
pub struct RightRow<'a> {
    pub sheet: &'a Worksheet,
    pub row: u32,
}

impl<'a> RightRow<'a> {
    pub fn new(sheet: &'a Worksheet, row: u32) -> Self {
        Self { sheet, row }
    }

    /// Value stored at `col`, if any
    pub fn value_at_column(&self, col: u16) -> Option<&'a CellValue> {
        self.sheet.value_at(self.row, col).filter(|v| !v.is_empty())
    }

    /// Value of the `index`-th populated cell, if the row has that many
    pub fn value_at_position(&self, index: usize) -> Option<&'a CellValue> {
        populated_cells(self.sheet, self.row)
            .nth(index)
            .map(|(_, value)| value)
    }
}

/// Whether the left cell differs from its counterpart in the paired row
///
/// An unpaired row differs entirely. Under [`CellAnchor::Position`] a right
/// row with too few populated cells differs; under [`CellAnchor::Column`]
/// a missing right cell compares as empty.
pub fn cell_differs(cell: &LeftCell<'_>, right: Option<RightRow<'_>>, anchor: CellAnchor) -> bool {
    let Some(right) = right else {
        return true;
    };
    match anchor {
        CellAnchor::Position => match right.value_at_position(cell.position) {
            Some(other) => other != cell.value,
            None => true,
        },
        CellAnchor::Column => match right.value_at_column(cell.col) {
            Some(other) => other != cell.value,
            None => !cell.value.is_empty(),
        },
    }
}

/// Annotate one left cell
pub fn annotate(
    cell: &LeftCell<'_>,
    right: Option<RightRow<'_>>,
    anchor: CellAnchor,
    header: Option<HeaderKey>,
) -> Annotation {
    Annotation {
        structural: structural_tag(cell.row, cell.col, header),
        diff: cell_differs(cell, right, anchor),
    }
}
