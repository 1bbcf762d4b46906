//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::error::{CsvError, CsvResult};
use crate::options::CsvReadOptions;
use xldiff_core::{CellValue, Workbook, Worksheet, MAX_COLS};

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a one-sheet workbook
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Workbook> {
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read CSV from a reader into a one-sheet workbook
    ///
    /// Every record is a row, starting at row 1; records may have differing
    /// lengths. Empty fields leave their cell unpopulated.
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Workbook> {
        let worksheet = Self::read_worksheet(reader, options)?;
        debug!(
            "read csv sheet '{}': {} cells, {} rows",
            worksheet.name(),
            worksheet.cell_count(),
            worksheet.max_row()
        );

        let mut workbook = Workbook::empty();
        workbook.add_existing_worksheet(worksheet)?;
        Ok(workbook)
    }

    /// Read CSV from a reader into a single worksheet
    pub fn read_worksheet<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Worksheet> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut worksheet = Worksheet::new(options.sheet_name.as_str());

        for (row_idx, result) in csv_reader.records().enumerate() {
            let record = result?;
            let row = u32::try_from(row_idx + 1).map_err(|_| CsvError::Parse {
                row: row_idx + 1,
                column: 1,
                message: "too many rows".into(),
            })?;

            if record.len() > MAX_COLS as usize {
                return Err(CsvError::Parse {
                    row: row_idx + 1,
                    column: MAX_COLS as usize + 1,
                    message: format!("record has {} fields", record.len()),
                });
            }

            for (col_idx, field) in record.iter().enumerate() {
                let value = if options.auto_detect_types {
                    Self::detect_type(field)
                } else if field.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::string(field)
                };

                worksheet.set_cell_value_at(row, col_idx as u16 + 1, value)?;
            }
        }

        Ok(worksheet)
    }

    /// Detect the type of a field value
    ///
    /// Only `true`/`false` (any case) become booleans; `1`, `0`, `yes` and
    /// `no` stay numbers or text so that identifier columns are not
    /// reinterpreted.
    fn detect_type(field: &str) -> CellValue {
        let trimmed = field.trim();

        if trimmed.is_empty() {
            return CellValue::Empty;
        }

        if trimmed.eq_ignore_ascii_case("true") {
            return CellValue::Boolean(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return CellValue::Boolean(false);
        }

        // Try number
        if let Ok(n) = trimmed.parse::<f64>() {
            if n.is_finite() {
                return CellValue::Number(n);
            }
        }

        // Default to string
        CellValue::string(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_detect_type() {
        assert_eq!(CsvReader::detect_type("10"), CellValue::Number(10.0));
        assert_eq!(CsvReader::detect_type(" 2.5 "), CellValue::Number(2.5));
        assert_eq!(CsvReader::detect_type("TRUE"), CellValue::Boolean(true));
        assert_eq!(CsvReader::detect_type("false"), CellValue::Boolean(false));
        assert_eq!(CsvReader::detect_type("1"), CellValue::Number(1.0));
        assert_eq!(CsvReader::detect_type("yes"), CellValue::string("yes"));
        assert_eq!(CsvReader::detect_type("inf"), CellValue::string("inf"));
        assert_eq!(CsvReader::detect_type("   "), CellValue::Empty);
    }

    #[test]
    fn test_read_rows_from_one() {
        let data = "ID,Name\n1,Alice\n2,Bob\n";
        let workbook = CsvReader::read(data.as_bytes(), &CsvReadOptions::default()).unwrap();

        assert_eq!(workbook.sheet_names(), vec!["Sheet1"]);
        let sheet = workbook.worksheet(0).unwrap();
        assert_eq!(sheet.get_value("A1").unwrap(), CellValue::string("ID"));
        assert_eq!(sheet.get_value("B3").unwrap(), CellValue::string("Bob"));
        assert_eq!(sheet.get_value("A2").unwrap(), CellValue::Number(1.0));
        assert_eq!(sheet.max_row(), 3);
    }

    #[test]
    fn test_ragged_records_and_empty_fields() {
        let data = "a,,c\nd\n,,,h\n";
        let workbook = CsvReader::read(data.as_bytes(), &CsvReadOptions::default()).unwrap();
        let sheet = workbook.worksheet(0).unwrap();

        assert_eq!(sheet.value_at(1, 2), None);
        assert_eq!(sheet.get_value("C1").unwrap(), CellValue::string("c"));
        assert_eq!(sheet.iter_row(2).count(), 1);
        assert_eq!(sheet.get_value("D3").unwrap(), CellValue::string("h"));
        assert_eq!(sheet.max_column(), 4);
    }

    #[test]
    fn test_text_only() {
        let options = CsvReadOptions {
            auto_detect_types: false,
            sheet_name: "Raw".into(),
            ..Default::default()
        };
        let workbook = CsvReader::read("10,true\n".as_bytes(), &options).unwrap();
        let sheet = workbook.worksheet_by_name("Raw").unwrap();

        assert_eq!(sheet.get_value("A1").unwrap(), CellValue::string("10"));
        assert_eq!(sheet.get_value("B1").unwrap(), CellValue::string("true"));
    }

    #[test]
    fn test_tsv() {
        let workbook = CsvReader::read("SKU\tPrice\nX-1\t9.5\n".as_bytes(), &CsvReadOptions::tsv())
            .unwrap();
        let sheet = workbook.worksheet(0).unwrap();
        assert_eq!(sheet.get_value("B2").unwrap(), CellValue::Number(9.5));
    }
}
