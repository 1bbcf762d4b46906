//! Cell storage implementation
//!
//! Sparse, row-based storage for worksheet cells. Only cells that carry a
//! value or a non-default style are kept.

use std::collections::BTreeMap;

use super::CellValue;

/// Complete data for a single cell
#[derive(Debug, Clone, PartialEq)]
pub struct CellData {
    /// The cell's value
    pub value: CellValue,
    /// Index into the worksheet's style pool (0 = default style)
    pub style_index: u32,
}

impl CellData {
    /// Create a new cell with a value and default style
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            style_index: 0,
        }
    }

    /// Create a new cell with a value and style
    pub fn with_style(value: CellValue, style_index: u32) -> Self {
        Self { value, style_index }
    }

    /// Create an empty cell
    pub fn empty() -> Self {
        Self::new(CellValue::Empty)
    }

    /// Check if this cell is effectively empty (no value and default style)
    pub fn is_empty(&self) -> bool {
        self.value.is_empty() && self.style_index == 0
    }
}

impl Default for CellData {
    fn default() -> Self {
        Self::empty()
    }
}

/// Sparse row-based storage for worksheet cells
///
/// Structure: `BTreeMap<row, BTreeMap<col, CellData>>`, so iteration is
/// always row-major and rows are visited in ascending order.
#[derive(Debug, Clone, Default)]
pub struct CellStorage {
    rows: BTreeMap<u32, BTreeMap<u16, CellData>>,
}

impl CellStorage {
    /// Create a new empty cell storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cell
    pub fn get(&self, row: u32, col: u16) -> Option<&CellData> {
        self.rows.get(&row).and_then(|r| r.get(&col))
    }

    /// Get a mutable cell
    pub fn get_mut(&mut self, row: u32, col: u16) -> Option<&mut CellData> {
        self.rows.get_mut(&row).and_then(|r| r.get_mut(&col))
    }

    /// Set a cell
    ///
    /// If the cell data is empty (no value, default style), the cell is removed.
    pub fn set(&mut self, row: u32, col: u16, data: CellData) {
        if data.is_empty() {
            self.remove(row, col);
        } else {
            self.rows.entry(row).or_default().insert(col, data);
        }
    }

    /// Set just the cell value (preserving style)
    pub fn set_value(&mut self, row: u32, col: u16, value: CellValue) {
        match self.get_mut(row, col) {
            Some(cell) => {
                cell.value = value;
                if cell.is_empty() {
                    self.remove(row, col);
                }
            }
            None if !value.is_empty() => self.set(row, col, CellData::new(value)),
            None => {}
        }
    }

    /// Set just the cell style (preserving value)
    pub fn set_style(&mut self, row: u32, col: u16, style_index: u32) {
        match self.get_mut(row, col) {
            Some(cell) => {
                cell.style_index = style_index;
                if cell.is_empty() {
                    self.remove(row, col);
                }
            }
            None if style_index != 0 => {
                self.set(row, col, CellData::with_style(CellValue::Empty, style_index))
            }
            None => {}
        }
    }

    /// Remove a cell
    pub fn remove(&mut self, row: u32, col: u16) -> Option<CellData> {
        let row_map = self.rows.get_mut(&row)?;
        let removed = row_map.remove(&col);
        if row_map.is_empty() {
            self.rows.remove(&row);
        }
        removed
    }

    /// Get the number of stored cells
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(|r| r.len()).sum()
    }

    /// Check if storage is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Highest row holding a cell (0 when empty)
    pub fn max_row(&self) -> u32 {
        self.rows.keys().next_back().copied().unwrap_or(0)
    }

    /// Get the bounds of used cells
    ///
    /// Returns (min_row, min_col, max_row, max_col) or None if empty
    pub fn used_bounds(&self) -> Option<(u32, u16, u32, u16)> {
        let min_row = *self.rows.keys().next()?;
        let max_row = *self.rows.keys().next_back()?;

        let mut min_col = u16::MAX;
        let mut max_col = 0u16;
        for row_data in self.rows.values() {
            if let Some(&col) = row_data.keys().next() {
                min_col = min_col.min(col);
            }
            if let Some(&col) = row_data.keys().next_back() {
                max_col = max_col.max(col);
            }
        }

        Some((min_row, min_col, max_row, max_col))
    }

    /// Iterate over all cells in row order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.rows
            .iter()
            .flat_map(|(&row, cols)| cols.iter().map(move |(&col, data)| (row, col, data)))
    }

    /// Iterate over cells in a specific row
    pub fn iter_row(&self, row: u32) -> impl Iterator<Item = (u16, &CellData)> {
        self.rows
            .get(&row)
            .into_iter()
            .flat_map(|cols| cols.iter().map(|(&col, data)| (col, data)))
    }

    /// Iterate over row indices that have data
    pub fn row_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.rows.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut storage = CellStorage::new();
        storage.set_value(1, 1, CellValue::Number(10.0));
        storage.set_value(3, 2, CellValue::string("x"));

        assert_eq!(storage.get(1, 1).map(|c| &c.value), Some(&CellValue::Number(10.0)));
        assert!(storage.get(2, 1).is_none());
        assert_eq!(storage.cell_count(), 2);
        assert_eq!(storage.used_bounds(), Some((1, 1, 3, 2)));
    }

    #[test]
    fn test_empty_values_are_not_stored() {
        let mut storage = CellStorage::new();
        storage.set_value(1, 1, CellValue::Empty);
        assert!(storage.is_empty());

        storage.set_value(1, 1, CellValue::Number(1.0));
        storage.set_value(1, 1, CellValue::Empty);
        assert!(storage.is_empty());
        assert_eq!(storage.used_bounds(), None);
    }

    #[test]
    fn test_style_only_cell_is_kept() {
        let mut storage = CellStorage::new();
        storage.set_style(2, 2, 3);
        assert_eq!(storage.cell_count(), 1);
        assert!(storage.get(2, 2).is_some_and(|c| c.value.is_empty()));

        storage.set_style(2, 2, 0);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_row_major_iteration() {
        let mut storage = CellStorage::new();
        storage.set_value(2, 1, CellValue::from(3));
        storage.set_value(1, 2, CellValue::from(2));
        storage.set_value(1, 1, CellValue::from(1));

        let order: Vec<(u32, u16)> = storage.iter().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(order, vec![(1, 1), (1, 2), (2, 1)]);
        assert_eq!(storage.row_indices().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(storage.iter_row(1).count(), 2);
    }
}
