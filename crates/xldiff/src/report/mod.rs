//! Presentation of comparison results
//!
//! - [`styled_workbook`] - an XLSX-ready copy of the left workbook with
//!   Header/Key fills and a Diff font colour
//! - [`display_sheet`] - dense rows of display strings and tags, capped at
//!   [`PREVIEW_MAX_ROWS`] by [`PREVIEW_MAX_COLS`]
//! - [`html`] - HTML tables for the same rows

pub mod html;

use chrono::Timelike;
use xldiff_core::{CellValue, Color, NumberFormat, Result, Style, Workbook, Worksheet};
use xldiff_engine::{Annotation, Comparison, SheetComparison, Structural, Tag};

/// Colours used to mark up the output workbook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportStyle {
    /// Solid fill of header cells
    pub header_fill: Color,
    /// Solid fill of key cells
    pub key_fill: Color,
    /// Font colour of cells that differ
    pub diff_font: Color,
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self {
            header_fill: Color::argb(0xFF, 0x00, 0xFF, 0x00),
            key_fill: Color::argb(0xFF, 0xFF, 0xFF, 0x00),
            diff_font: Color::argb(0xFF, 0xFF, 0x00, 0x00),
        }
    }
}

impl ReportStyle {
    /// Cell style for a value with the given annotation
    ///
    /// Returns `None` when the cell needs no formatting at all.
    pub fn style_for(&self, value: &CellValue, annotation: Annotation) -> Option<Style> {
        let mut style = Style::new();

        match annotation.structural {
            Some(Structural::Header) => style = style.fill_color(self.header_fill),
            Some(Structural::Key) => style = style.fill_color(self.key_fill),
            None => {}
        }
        if annotation.diff {
            style = style.font_color(self.diff_font);
        }
        if let Some(dt) = value.as_datetime() {
            let format = if dt.num_seconds_from_midnight() == 0 && dt.nanosecond() == 0 {
                NumberFormat::date_short()
            } else {
                NumberFormat::datetime()
            };
            style = style.number_format(format);
        }

        (style != Style::default()).then_some(style)
    }
}

/// Build the output workbook: one sheet per compared sheet, every annotated
/// cell copied with its value and styled by its tags
pub fn styled_workbook(comparison: &Comparison, style: &ReportStyle) -> Result<Workbook> {
    let mut workbook = Workbook::empty();
    for sheet in comparison.sheets() {
        workbook.add_existing_worksheet(styled_sheet(sheet, style)?)?;
    }
    Ok(workbook)
}

fn styled_sheet(sheet: &SheetComparison, style: &ReportStyle) -> Result<Worksheet> {
    let mut out = Worksheet::new(sheet.name());
    for (addr, cell) in sheet.iter() {
        if !cell.value.is_empty() {
            out.set_cell_value_at(addr.row, addr.col, cell.value.clone())?;
        }
        if let Some(cell_style) = style.style_for(&cell.value, cell.annotation) {
            out.set_cell_style_at(addr.row, addr.col, &cell_style)?;
        }
    }
    Ok(out)
}

/// One cell of a dense display row
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DisplayCell {
    /// Value as shown to a user; empty for gaps
    pub value: String,
    pub annotation: Annotation,
}

impl DisplayCell {
    pub fn tags(&self) -> impl Iterator<Item = Tag> {
        self.annotation.tags()
    }

    /// Space separated tag names, e.g. `"key diff"`
    pub fn class_names(&self) -> String {
        self.tags().map(|t| t.as_str()).collect::<Vec<_>>().join(" ")
    }
}

/// Most rows [`display_sheet`] returns
pub const PREVIEW_MAX_ROWS: u32 = 1000;
/// Most columns [`display_sheet`] returns
pub const PREVIEW_MAX_COLS: u16 = 100;

/// Rows and columns shown for `sheet`, clamped to the preview limits
pub fn preview_bounds(sheet: &SheetComparison) -> (u32, u16) {
    (
        sheet.max_row().min(PREVIEW_MAX_ROWS),
        sheet.max_column().min(PREVIEW_MAX_COLS),
    )
}

/// Whether [`display_sheet`] leaves out any annotated cell of `sheet`
pub fn is_truncated(sheet: &SheetComparison) -> bool {
    sheet.max_row() > PREVIEW_MAX_ROWS || sheet.max_column() > PREVIEW_MAX_COLS
}

/// Dense rows `1..=max_row`, each holding columns `1..=max_column`,
/// clamped to [`preview_bounds`]
pub fn display_sheet(sheet: &SheetComparison) -> Vec<Vec<DisplayCell>> {
    let (height, width) = preview_bounds(sheet);
    let mut rows = vec![vec![DisplayCell::default(); width as usize]; height as usize];

    // Cells iterate in row-major order
    for (addr, cell) in sheet.iter().take_while(|(addr, _)| addr.row <= height) {
        if addr.col > width {
            continue;
        }
        rows[addr.row as usize - 1][addr.col as usize - 1] = DisplayCell {
            value: cell.value.to_string(),
            annotation: cell.annotation,
        };
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use xldiff_engine::compare;

    fn pair() -> (Workbook, Workbook) {
        let mut left = Workbook::new();
        let ws = left.worksheet_mut(0).unwrap();
        ws.set_cell_value("A1", "ID").unwrap();
        ws.set_cell_value("B1", "Price").unwrap();
        ws.set_cell_value("A2", 1).unwrap();
        ws.set_cell_value("B2", 10).unwrap();
        ws.set_cell_value("C3", "note").unwrap();

        let mut right = left.clone();
        right
            .worksheet_mut(0)
            .unwrap()
            .set_cell_value("B2", 12)
            .unwrap();
        (left, right)
    }

    #[test]
    fn test_default_colours() {
        let style = ReportStyle::default();
        assert_eq!(style.header_fill.to_argb_hex().as_deref(), Some("FF00FF00"));
        assert_eq!(style.key_fill.to_argb_hex().as_deref(), Some("FFFFFF00"));
        assert_eq!(style.diff_font.to_argb_hex().as_deref(), Some("FFFF0000"));
    }

    #[test]
    fn test_style_for() {
        let style = ReportStyle::default();
        let value = CellValue::from(1);

        assert_eq!(style.style_for(&value, Annotation::default()), None);

        let key_diff = style
            .style_for(&value, Annotation::new(Some(Structural::Key), true))
            .unwrap();
        assert_eq!(key_diff.fill.color(), Some(style.key_fill));
        assert_eq!(key_diff.font.color, style.diff_font);

        let date = CellValue::DateTime(
            chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        );
        let date_style = style.style_for(&date, Annotation::default()).unwrap();
        assert!(date_style.number_format.is_date_format());
    }

    #[test]
    fn test_styled_workbook() {
        let (left, right) = pair();
        let comparison = compare(&left, &right);
        let out = styled_workbook(&comparison, &ReportStyle::default()).unwrap();

        let ws = out.worksheet_by_name("Sheet1").unwrap();
        assert_eq!(ws.get_value("B2").unwrap(), CellValue::from(10));
        assert_eq!(ws.get_value("C3").unwrap(), CellValue::from("note"));

        let header = ws.cell_style("A1").unwrap().unwrap();
        assert_eq!(header.fill.color(), Some(ReportStyle::default().header_fill));
        let key = ws.cell_style("A2").unwrap().unwrap();
        assert_eq!(key.fill.color(), Some(ReportStyle::default().key_fill));
        let diff = ws.cell_style("B2").unwrap().unwrap();
        assert_eq!(diff.font.color, ReportStyle::default().diff_font);
        assert!(diff.fill.is_none());
    }

    #[test]
    fn test_display_rows_are_dense() {
        let (left, right) = pair();
        let comparison = compare(&left, &right);
        let rows = display_sheet(&comparison.sheets()[0]);

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.len() == 3));
        assert_eq!(rows[0][0].value, "ID");
        assert_eq!(rows[0][0].class_names(), "header");
        assert_eq!(rows[1][1].value, "10");
        assert_eq!(rows[1][1].class_names(), "diff");
        assert_eq!(rows[1][0].class_names(), "key");
        assert_eq!(rows[1][2], DisplayCell::default());
        assert_eq!(rows[2][2].value, "note");
    }

    #[test]
    fn test_far_corner_cell_is_clamped() {
        let mut wb = Workbook::new();
        let ws = wb.worksheet_mut(0).unwrap();
        ws.set_cell_value_at(5000, 1000, "far").unwrap();
        ws.set_cell_value_at(2, 3, "near").unwrap();
        ws.set_cell_value_at(1_048_576, 16_384, "corner").unwrap();
        let comparison = compare(&wb, &wb.clone());
        let sheet = &comparison.sheets()[0];

        assert!(is_truncated(sheet));
        let rows = display_sheet(sheet);
        assert_eq!(rows.len(), PREVIEW_MAX_ROWS as usize);
        assert!(rows.iter().all(|r| r.len() == PREVIEW_MAX_COLS as usize));
        assert_eq!(rows[1][2].value, "near");
        assert!(rows.iter().flatten().all(|c| c.value != "far" && c.value != "corner"));
    }

    #[test]
    fn test_small_sheet_is_not_truncated() {
        let (left, right) = pair();
        let comparison = compare(&left, &right);
        let sheet = &comparison.sheets()[0];
        assert!(!is_truncated(sheet));
        assert_eq!(preview_bounds(sheet), (3, 3));
    }
}
