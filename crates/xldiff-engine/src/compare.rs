//! Sheet and workbook comparison
//!
//! For every sheet of the left workbook the comparator detects the header
//! row and key column, pairs rows with the right sheet of the same name and
//! annotates every populated left cell. Sheets that exist only on the right
//! are not represented in the result.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;

use crate::annotate::{annotate, populated_cells, structural_tag, Annotation, LeftCell, RightRow};
use crate::detect::{HeaderKey, HeaderKeyDetector, SubstringDetector};
use crate::options::{CellAnchor, CompareOptions};
use crate::pairing::{PairingKind, RowPairing};
use xldiff_core::{CellAddress, CellValue, Workbook, Worksheet};

/// A left value with its annotation
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedCell {
    pub value: CellValue,
    pub annotation: Annotation,
}

/// Counters for one compared sheet
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetSummary {
    /// Sheet name
    pub name: String,
    /// Whether the right workbook has a sheet of this name
    pub right_sheet_present: bool,
    /// Strategy used to pair rows
    pub pairing: PairingKind,
    /// Detected header row and key column
    pub header_key: Option<HeaderKey>,
    /// Left rows holding at least one value
    pub rows: usize,
    /// Of those, rows paired with a right row
    pub matched_rows: usize,
    /// Of those, rows without a right counterpart
    pub unmatched_rows: usize,
    /// Annotated output cells
    pub cells: usize,
    /// Output cells tagged Diff
    pub diff_cells: usize,
    /// Distinct key values found on more than one right row
    pub duplicate_keys: usize,
}

/// Annotated copy of one left sheet
#[derive(Debug, Clone)]
pub struct SheetComparison {
    cells: BTreeMap<CellAddress, AnnotatedCell>,
    summary: SheetSummary,
}

impl SheetComparison {
    pub fn name(&self) -> &str {
        &self.summary.name
    }

    pub fn header_key(&self) -> Option<HeaderKey> {
        self.summary.header_key
    }

    pub fn summary(&self) -> &SheetSummary {
        &self.summary
    }

    /// Annotated cell at a position
    pub fn cell_at(&self, row: u32, col: u16) -> Option<&AnnotatedCell> {
        self.cells.get(&CellAddress::new(row, col))
    }

    /// Annotated cell by A1 address; `None` for invalid addresses too
    pub fn cell(&self, address: &str) -> Option<&AnnotatedCell> {
        let addr = CellAddress::parse(address).ok()?;
        self.cells.get(&addr)
    }

    /// Annotation at a position (plain when no cell was emitted there)
    pub fn annotation_at(&self, row: u32, col: u16) -> Annotation {
        self.cell_at(row, col)
            .map(|c| c.annotation)
            .unwrap_or_default()
    }

    /// All annotated cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (CellAddress, &AnnotatedCell)> {
        self.cells.iter().map(|(addr, cell)| (*addr, cell))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Highest row holding an annotated cell (0 when empty)
    pub fn max_row(&self) -> u32 {
        self.cells.keys().next_back().map_or(0, |a| a.row)
    }

    /// Highest column holding an annotated cell (0 when empty)
    pub fn max_column(&self) -> u16 {
        self.cells.keys().map(|a| a.col).max().unwrap_or(0)
    }

    pub fn diff_count(&self) -> usize {
        self.summary.diff_cells
    }

    pub fn has_differences(&self) -> bool {
        self.summary.diff_cells > 0
    }
}

/// Result of comparing two workbooks, in left sheet order
#[derive(Debug, Clone, Default)]
pub struct Comparison {
    sheets: Vec<SheetComparison>,
}

impl Comparison {
    pub fn sheets(&self) -> &[SheetComparison] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetComparison> {
        self.sheets.iter().find(|s| s.name() == name)
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn total_diffs(&self) -> usize {
        self.sheets.iter().map(SheetComparison::diff_count).sum()
    }

    pub fn has_differences(&self) -> bool {
        self.sheets.iter().any(SheetComparison::has_differences)
    }

    pub fn summaries(&self) -> Vec<&SheetSummary> {
        self.sheets.iter().map(SheetComparison::summary).collect()
    }
}

/// Compares workbooks with a header detector and a set of options
///
/// The comparator holds no per-comparison state, so one instance can serve
/// many comparisons, including from several threads at once.
#[derive(Clone)]
pub struct Comparator {
    detector: Arc<dyn HeaderKeyDetector + Send + Sync>,
    options: CompareOptions,
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Comparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Comparator")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Comparator {
    /// Substring header detection with default options
    pub fn new() -> Self {
        Self {
            detector: Arc::new(SubstringDetector::default()),
            options: CompareOptions::default(),
        }
    }

    /// Use a different header/key detector
    pub fn with_detector<D>(mut self, detector: D) -> Self
    where
        D: HeaderKeyDetector + Send + Sync + 'static,
    {
        self.detector = Arc::new(detector);
        self
    }

    pub fn with_options(mut self, options: CompareOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// Compare every left sheet with the right sheet of the same name
    pub fn compare(&self, left: &Workbook, right: &Workbook) -> Comparison {
        let sheets = left
            .worksheets()
            .map(|sheet| self.compare_sheet(sheet, right.worksheet_by_name(sheet.name())))
            .collect();
        Comparison { sheets }
    }

    /// Compare one left sheet with its right counterpart, if any
    pub fn compare_sheet(&self, left: &Worksheet, right: Option<&Worksheet>) -> SheetComparison {
        let header_key = self.detector.detect(left);
        let pairing = RowPairing::new(right, header_key, self.options.duplicate_keys);
        let report_vacated =
            self.options.cell_anchor == CellAnchor::Column && self.options.report_vacated_cells;
        let last_col = left.max_column();

        let mut cells = BTreeMap::new();
        let mut summary = SheetSummary {
            name: left.name().to_string(),
            right_sheet_present: right.is_some(),
            pairing: pairing.kind(),
            header_key,
            rows: 0,
            matched_rows: 0,
            unmatched_rows: 0,
            cells: 0,
            diff_cells: 0,
            duplicate_keys: 0,
        };

        for row in left.row_indices() {
            let mut populated = populated_cells(left, row).peekable();
            if populated.peek().is_none() {
                continue;
            }

            let right_row = pairing
                .matched_row(left, row)
                .zip(pairing.right())
                .map(|(matched, sheet)| RightRow::new(sheet, matched));

            summary.rows += 1;
            if right_row.is_some() {
                summary.matched_rows += 1;
            } else {
                summary.unmatched_rows += 1;
            }

            for (position, (col, value)) in populated.enumerate() {
                let cell = LeftCell {
                    row,
                    col,
                    position,
                    value,
                };
                let annotation = annotate(&cell, right_row, self.options.cell_anchor, header_key);
                cells.insert(
                    CellAddress::new(row, col),
                    AnnotatedCell {
                        value: value.clone(),
                        annotation,
                    },
                );
            }

            if let Some(right_row) = right_row.filter(|_| report_vacated) {
                mark_vacated(&mut cells, row, last_col, right_row, header_key);
            }
        }

        summary.cells = cells.len();
        summary.diff_cells = cells.values().filter(|c| c.annotation.diff).count();
        summary.duplicate_keys = pairing.duplicate_keys();

        debug!(
            "sheet '{}': header {:?}, {} pairing, {}/{} rows matched, {} of {} cells differ",
            summary.name,
            header_key,
            summary.pairing,
            summary.matched_rows,
            summary.rows,
            summary.diff_cells,
            summary.cells
        );

        SheetComparison { cells, summary }
    }

}

/// Emit empty Diff cells where the paired right row holds a value the left
/// row lacks, up to the left sheet's last column
fn mark_vacated(
    cells: &mut BTreeMap<CellAddress, AnnotatedCell>,
    row: u32,
    last_col: u16,
    right_row: RightRow<'_>,
    header_key: Option<HeaderKey>,
) {
    for (col, _) in populated_cells(right_row.sheet, right_row.row) {
        if col > last_col {
            break;
        }
        cells
            .entry(CellAddress::new(row, col))
            .or_insert_with(|| AnnotatedCell {
                value: CellValue::Empty,
                annotation: Annotation::new(structural_tag(row, col, header_key), true),
            });
    }
}

/// Compare two workbooks with substring header detection and default options
pub fn compare(left: &Workbook, right: &Workbook) -> Comparison {
    Comparator::new().compare(left, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::NoHeaderDetector;
    use crate::options::DuplicateKeyPolicy;
    use pretty_assertions::assert_eq;

    fn sheet(name: &str, rows: &[&[CellValue]]) -> Worksheet {
        let mut ws = Worksheet::new(name);
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                ws.set_cell_value_at(r as u32 + 1, c as u16 + 1, value.clone())
                    .unwrap();
            }
        }
        ws
    }

    fn book(sheets: Vec<Worksheet>) -> Workbook {
        let mut wb = Workbook::empty();
        for ws in sheets {
            wb.add_existing_worksheet(ws).unwrap();
        }
        wb
    }

    fn v<T: Into<CellValue>>(value: T) -> CellValue {
        value.into()
    }

    #[test]
    fn test_equal_values_carry_no_diff() {
        let left = book(vec![sheet("S", &[&[v(10), v("Hello")]])]);
        let right = book(vec![sheet("S", &[&[v(10), v("World")]])]);

        let result = compare(&left, &right);
        let s = result.sheet("S").unwrap();

        assert!(!s.annotation_at(1, 1).diff);
        assert!(s.annotation_at(1, 2).diff);
        assert_eq!(s.cell("B1").unwrap().value, v("Hello"));
        assert_eq!(s.summary().pairing, PairingKind::Positional);
        assert_eq!(result.total_diffs(), 1);
    }

    #[test]
    fn test_sheet_only_on_left_is_all_diff() {
        let left = book(vec![sheet(
            "Only",
            &[&[v("Name"), v("ID")], &[v("a"), v(1)]],
        )]);
        let right = book(vec![sheet("Other", &[&[v("Name"), v("ID")], &[v("a"), v(1)]])]);

        let result = compare(&left, &right);
        assert_eq!(result.sheet_count(), 1);
        let s = result.sheet("Only").unwrap();

        assert!(s.iter().all(|(_, c)| c.annotation.diff));
        assert_eq!(s.len(), 4);
        // Header/Key detection still runs on the left sheet alone
        assert!(s.annotation_at(1, 1).is_header());
        assert!(s.annotation_at(2, 2).is_key());
        assert!(!s.summary().right_sheet_present);
        assert_eq!(s.summary().pairing, PairingKind::Unpaired);
    }

    #[test]
    fn test_right_only_sheets_are_dropped_and_order_follows_left() {
        let left = book(vec![sheet("B", &[&[v(1)]]), sheet("A", &[&[v(1)]])]);
        let right = book(vec![
            sheet("A", &[&[v(1)]]),
            sheet("C", &[&[v(1)]]),
            sheet("B", &[&[v(1)]]),
        ]);

        let result = compare(&left, &right);
        let names: Vec<&str> = result.sheets().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert!(!result.has_differences());
    }

    #[test]
    fn test_sheet_names_match_exactly() {
        let left = book(vec![sheet("Data", &[&[v(1)]])]);
        let right = book(vec![sheet("data", &[&[v(1)]])]);

        assert!(compare(&left, &right).has_differences());
    }

    #[test]
    fn test_zero_sheet_documents() {
        let empty = Workbook::empty();
        assert!(compare(&empty, &empty).is_empty());

        let right = book(vec![sheet("S", &[&[v(1)]])]);
        assert!(compare(&empty, &right).is_empty());
    }

    #[test]
    fn test_header_and_key_tags() {
        let rows: &[&[CellValue]] = &[
            &[v("Name"), v("ID"), v("Value")],
            &[v("A"), v(1), v(100)],
            &[v("B"), v(2), v(200)],
        ];
        let left = book(vec![sheet("S", rows)]);
        let right = left.clone();

        let s = compare(&left, &right).sheets()[0].clone();
        for col in 1..=3 {
            assert!(s.annotation_at(1, col).is_header());
        }
        assert!(s.annotation_at(2, 2).is_key());
        assert!(s.annotation_at(3, 2).is_key());
        assert!(s.annotation_at(2, 1).is_plain());
        assert_eq!(s.header_key(), Some(HeaderKey::new(1, 2)));
    }

    #[test]
    fn test_reordered_rows_without_change() {
        let left = book(vec![sheet(
            "S",
            &[
                &[v("ID"), v("Name"), v("Value")],
                &[v(1), v("Alice"), v(100)],
                &[v(2), v("Bob"), v(200)],
            ],
        )]);
        let right = book(vec![sheet(
            "S",
            &[
                &[v("ID"), v("Name"), v("Value")],
                &[v(2), v("Bob"), v(200)],
                &[v(1), v("Alice"), v(100)],
            ],
        )]);

        let result = compare(&left, &right);
        assert_eq!(result.total_diffs(), 0);
        assert_eq!(result.sheets()[0].summary().pairing, PairingKind::Keyed);
    }

    #[test]
    fn test_reordered_rows_with_change() {
        let left = book(vec![sheet(
            "S",
            &[
                &[v("ID"), v("Name"), v("Value")],
                &[v(1), v("Alice"), v(100)],
                &[v(2), v("Bob"), v(200)],
            ],
        )]);
        let right = book(vec![sheet(
            "S",
            &[
                &[v("ID"), v("Name"), v("Value")],
                &[v(2), v("Bob"), v(200)],
                &[v(1), v("Alice"), v(999)],
            ],
        )]);

        let result = compare(&left, &right);
        let s = &result.sheets()[0];
        assert!(s.annotation_at(2, 3).diff);
        assert_eq!(s.cell_at(2, 3).unwrap().value, v(100));
        assert_eq!(result.total_diffs(), 1);
    }

    #[test]
    fn test_pre_header_rows_never_header_or_key() {
        let rows: &[&[CellValue]] = &[
            &[v("Title or Empty")],
            &[v("Title or Empty"), v("x")],
            &[v("Name"), v("ID"), v("Value")],
            &[v("A"), v(1), v(100)],
        ];
        let left = book(vec![sheet("S", rows)]);
        let s = compare(&left, &left.clone()).sheets()[0].clone();

        assert!(s.annotation_at(1, 1).is_plain());
        assert!(s.annotation_at(2, 2).is_plain());
        assert!(s.annotation_at(3, 2).is_header());
        assert!(s.annotation_at(4, 2).is_key());
    }

    #[test]
    fn test_unmatched_key_marks_whole_row() {
        let left = book(vec![sheet(
            "S",
            &[&[v("SKU"), v("Q")], &[v("S1"), v(1)], &[v("S2"), v(2)]],
        )]);
        let right = book(vec![sheet("S", &[&[v("SKU"), v("Q")], &[v("S1"), v(1)]])]);

        let s = compare(&left, &right).sheets()[0].clone();
        assert!(s.annotation_at(3, 1).diff && s.annotation_at(3, 1).is_key());
        assert!(s.annotation_at(3, 2).diff);
        assert!(!s.annotation_at(2, 2).diff);
        assert_eq!(s.summary().unmatched_rows, 1);
        assert_eq!(s.summary().matched_rows, 2);
    }

    #[test]
    fn test_vacated_cells_are_reported() {
        let left = book(vec![sheet("S", &[&[v(1), CellValue::Empty, v(3)]])]);
        let right = book(vec![sheet("S", &[&[v(1), v(2), v(3), v(4)]])]);

        let s = compare(&left, &right).sheets()[0].clone();
        let b1 = s.cell_at(1, 2).unwrap();
        assert_eq!(b1.value, CellValue::Empty);
        assert!(b1.annotation.diff);
        // D1 lies beyond the left sheet's columns
        assert!(s.cell_at(1, 4).is_none());

        let quiet = Comparator::new().with_options(CompareOptions {
            report_vacated_cells: false,
            ..Default::default()
        });
        let s = quiet.compare(&left, &right).sheets()[0].clone();
        assert!(s.cell_at(1, 2).is_none());
        assert_eq!(s.diff_count(), 0);
    }

    #[test]
    fn test_positional_anchor() {
        // Left row has a leading gap, right row does not
        let left = book(vec![sheet("S", &[&[CellValue::Empty, v("a"), v("b")]])]);
        let right = book(vec![sheet("S", &[&[v("a"), v("b")]])]);

        let by_position = Comparator::new().with_options(CompareOptions::positional());
        assert_eq!(by_position.compare(&left, &right).total_diffs(), 0);

        // By column: B1 and C1 differ, and right A1 shows up as vacated
        let by_column = compare(&left, &right);
        assert_eq!(by_column.total_diffs(), 3);
        assert_eq!(by_column.sheets()[0].cell_at(1, 1).unwrap().value, CellValue::Empty);
    }

    #[test]
    fn test_no_header_detector_forces_positional() {
        let rows_l: &[&[CellValue]] = &[&[v("ID")], &[v(1)], &[v(2)]];
        let rows_r: &[&[CellValue]] = &[&[v("ID")], &[v(2)], &[v(1)]];
        let left = book(vec![sheet("S", rows_l)]);
        let right = book(vec![sheet("S", rows_r)]);

        let comparator = Comparator::new().with_detector(NoHeaderDetector);
        let result = comparator.compare(&left, &right);
        let s = &result.sheets()[0];

        assert_eq!(s.summary().pairing, PairingKind::Positional);
        assert!(s.annotation_at(1, 1).structural.is_none());
        assert_eq!(result.total_diffs(), 2);
    }

    #[test]
    fn test_duplicate_keys_summary() {
        let left = book(vec![sheet("S", &[&[v("ID"), v("V")], &[v(1), v("a")]])]);
        let right = book(vec![sheet(
            "S",
            &[&[v("ID"), v("V")], &[v(1), v("a")], &[v(1), v("b")]],
        )]);

        let last = compare(&left, &right);
        assert_eq!(last.sheets()[0].summary().duplicate_keys, 1);
        assert!(last.sheets()[0].annotation_at(2, 2).diff);

        let first = Comparator::new()
            .with_options(CompareOptions {
                duplicate_keys: DuplicateKeyPolicy::FirstWins,
                ..Default::default()
            })
            .compare(&left, &right);
        assert_eq!(first.total_diffs(), 0);
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let left = book(vec![sheet("S", &[&[v("ID")], &[v(1)]])]);
        let right = book(vec![sheet("S", &[&[v("ID")], &[v(2)]])]);
        let (left_before, right_before) = (left.clone(), right.clone());

        let _ = compare(&left, &right);

        let cells = |wb: &Workbook| -> Vec<(u32, u16, CellValue)> {
            wb.worksheet(0)
                .unwrap()
                .iter_cells()
                .map(|(r, c, d)| (r, c, d.value.clone()))
                .collect()
        };
        assert_eq!(cells(&left), cells(&left_before));
        assert_eq!(cells(&right), cells(&right_before));
    }
}
