//! Fonts, fills and number formats survive a write/read cycle.

use crate::roundtrip;
use pretty_assertions::assert_eq;
use xldiff_core::style::{Color, FillStyle, NumberFormat, Style};
use xldiff_core::{CellValue, Workbook};

#[test]
fn test_fill_and_font_colors() {
    let header = Style::new().fill_color(Color::GREEN);
    let changed = Style::new().font_color(Color::RED).bold(true);

    let mut workbook = Workbook::new();
    let sheet = workbook.worksheet_mut(0).unwrap();
    sheet.set_cell_value("A1", "ID").unwrap();
    sheet.set_cell_style("A1", &header).unwrap();
    sheet.set_cell_value("B2", 999).unwrap();
    sheet.set_cell_style("B2", &changed).unwrap();
    sheet.set_cell_value("C2", 5).unwrap();

    let (read, _dir) = roundtrip(&workbook);
    let sheet = read.worksheet(0).unwrap();

    let a1 = sheet.cell_style("A1").unwrap().expect("A1 should be styled");
    assert_eq!(
        a1.fill.color().and_then(|c| c.to_argb_hex()),
        Some("FF00FF00".to_string())
    );

    let b2 = sheet.cell_style("B2").unwrap().expect("B2 should be styled");
    assert!(b2.font.bold);
    assert_eq!(b2.font.color.to_argb_hex(), Some("FFFF0000".to_string()));
    assert!(b2.fill.is_none());

    assert_eq!(sheet.cell_style("C2").unwrap(), None);
}

#[test]
fn test_style_only_cell_is_kept() {
    let mut workbook = Workbook::new();
    let sheet = workbook.worksheet_mut(0).unwrap();
    sheet
        .set_cell_style("D4", &Style::new().fill_color(Color::YELLOW))
        .unwrap();

    let (read, _dir) = roundtrip(&workbook);
    let sheet = read.worksheet(0).unwrap();

    assert_eq!(sheet.get_value("D4").unwrap(), CellValue::Empty);
    let style = sheet.cell_style("D4").unwrap().expect("D4 should be styled");
    assert_eq!(
        style.fill,
        FillStyle::solid(Color::from_hex("FFFFFF00").unwrap())
    );
    assert_eq!(sheet.max_row(), 4);
}

#[test]
fn test_number_format_is_kept() {
    let mut workbook = Workbook::new();
    let sheet = workbook.worksheet_mut(0).unwrap();
    sheet.set_cell_value("A1", 0.25).unwrap();
    sheet
        .set_cell_style("A1", &Style::new().number_format(NumberFormat::from_string("0.0%")))
        .unwrap();

    let (read, _dir) = roundtrip(&workbook);
    let sheet = read.worksheet(0).unwrap();

    assert_eq!(sheet.get_value("A1").unwrap(), CellValue::Number(0.25));
    assert_eq!(
        sheet.cell_style("A1").unwrap().map(|s| s.number_format.clone()),
        Some(NumberFormat::Custom("0.0%".to_string()))
    );
}
