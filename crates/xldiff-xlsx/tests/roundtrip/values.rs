//! Cell values survive a write/read cycle.

use crate::roundtrip;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use xldiff_core::{CellError, CellValue, Workbook};

#[test]
fn test_scalar_values() {
    let mut workbook = Workbook::new();
    let sheet = workbook.worksheet_mut(0).unwrap();
    sheet.set_cell_value("A1", 10).unwrap();
    sheet.set_cell_value("B1", "Hello").unwrap();
    sheet.set_cell_value("C1", 3.25).unwrap();
    sheet.set_cell_value("D1", true).unwrap();
    sheet.set_cell_value("E1", CellError::Div0).unwrap();
    sheet.set_cell_value("A7", "a & b < c").unwrap();

    let (read, _dir) = roundtrip(&workbook);
    let sheet = read.worksheet(0).unwrap();

    assert_eq!(sheet.get_value("A1").unwrap(), CellValue::Number(10.0));
    assert_eq!(sheet.get_value("B1").unwrap(), CellValue::string("Hello"));
    assert_eq!(sheet.get_value("C1").unwrap(), CellValue::Number(3.25));
    assert_eq!(sheet.get_value("D1").unwrap(), CellValue::Boolean(true));
    assert_eq!(
        sheet.get_value("E1").unwrap(),
        CellValue::Error(CellError::Div0)
    );
    assert_eq!(
        sheet.get_value("A7").unwrap(),
        CellValue::string("a & b < c")
    );
    assert_eq!(sheet.max_row(), 7);
    assert_eq!(sheet.cell_count(), 6);
}

#[test]
fn test_dates_and_times() {
    let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let midnight = day.and_hms_opt(0, 0, 0).unwrap();
    let afternoon = day.and_hms_opt(15, 45, 30).unwrap();

    let mut workbook = Workbook::new();
    let sheet = workbook.worksheet_mut(0).unwrap();
    sheet.set_cell_value("A1", midnight).unwrap();
    sheet.set_cell_value("A2", afternoon).unwrap();

    let (read, _dir) = roundtrip(&workbook);
    let sheet = read.worksheet(0).unwrap();

    assert_eq!(sheet.get_value("A1").unwrap(), CellValue::DateTime(midnight));
    assert_eq!(sheet.get_value("A2").unwrap(), CellValue::DateTime(afternoon));
}

#[test]
fn test_sheet_order_and_names() {
    let mut workbook = Workbook::empty();
    for name in ["Summary", "Q1 Sales", "Inventory"] {
        workbook.add_worksheet_with_name(name).unwrap();
    }
    workbook
        .worksheet_by_name_mut("Inventory")
        .unwrap()
        .set_cell_value("B2", "SKU")
        .unwrap();

    let (read, _dir) = roundtrip(&workbook);

    assert_eq!(read.sheet_names(), vec!["Summary", "Q1 Sales", "Inventory"]);
    assert!(read.worksheet(0).unwrap().is_empty());
    assert_eq!(
        read.worksheet_by_name("Inventory")
            .unwrap()
            .get_value("B2")
            .unwrap(),
        CellValue::string("SKU")
    );
}
