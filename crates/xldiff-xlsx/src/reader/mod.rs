//! XLSX reader

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use log::{debug, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::dates::serial_to_datetime;
use crate::error::{XlsxError, XlsxResult};
use crate::styles::{attr_value, read_styles_xml, ParsedStyles};
use xldiff_core::style::Style;
use xldiff_core::{CellAddress, CellError, CellValue, Workbook, Worksheet};

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode special characters in XML:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
fn decode_excel_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find("_x") {
        result.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        let decoded = candidate
            .get(2..6)
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .filter(|_| candidate.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);

        match decoded {
            Some(c) => {
                result.push(c);
                rest = &candidate[7..];
            }
            None => {
                result.push('_');
                rest = &candidate[1..];
            }
        }
    }
    result.push_str(rest);

    result
}

/// Workbook-level context needed to interpret cells
struct ReadContext {
    shared_strings: Vec<String>,
    cell_styles: Vec<Style>,
    date_1904: bool,
}

/// Raw attributes and contents of one `<c>` element
#[derive(Default)]
struct RawCell {
    reference: Option<String>,
    cell_type: Option<String>,
    style: Option<u32>,
    value: Option<String>,
    has_formula: bool,
}

/// XLSX file reader
///
/// Produces a [`Workbook`] holding materialised values only: formulas are
/// replaced by their cached results, and a formula cell without a cached
/// result is read as empty.
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let file = File::open(path)?;
        Self::read(file)
    }

    /// Read a workbook from a reader
    ///
    /// A document without worksheets yields an empty workbook.
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let parsed_styles = Self::read_styles(&mut archive)?;
        let (sheet_info, date_1904) = Self::read_workbook_xml(&mut archive)?;
        let sheet_paths = Self::read_workbook_rels(&mut archive)?;

        let context = ReadContext {
            shared_strings,
            cell_styles: parsed_styles.cell_styles,
            date_1904,
        };

        let mut workbook = Workbook::empty();

        for (name, r_id) in &sheet_info {
            let Some(path) = sheet_paths.get(r_id) else {
                warn!("sheet '{}' has no worksheet part ({}), skipping", name, r_id);
                continue;
            };
            let mut worksheet = Worksheet::new(name.as_str());
            Self::read_worksheet(&mut archive, path, &mut worksheet, &context)?;
            debug!(
                "read sheet '{}': {} cells, {} rows",
                name,
                worksheet.cell_count(),
                worksheet.max_row()
            );
            workbook.add_existing_worksheet(worksheet)?;
        }

        Ok(workbook)
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(false);

        let mut buf = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;
        // Phonetic runs (<rPh>) repeat the text in another script
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current_string));
                        current_string.clear();
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    let text = e.unescape()?;
                    current_string.push_str(&text);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    fn read_styles<R: Read + Seek>(archive: &mut zip::ZipArchive<R>) -> XlsxResult<ParsedStyles> {
        match archive.by_name("xl/styles.xml") {
            Ok(file) => read_styles_xml(file),
            Err(_) => Ok(ParsedStyles::fallback()),
        }
    }

    /// Read workbook.xml to get sheet names and rIds, plus the date system
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<(Vec<(String, String)>, bool)> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();
        let mut date_1904 = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"sheet" => {
                        if let (Some(name), Some(r_id)) =
                            (attr_value(&e, b"name"), attr_value(&e, b"r:id"))
                        {
                            sheets.push((name, r_id));
                        }
                    }
                    b"workbookPr" => {
                        date_1904 = attr_value(&e, b"date1904")
                            .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok((sheets, date_1904))
    }

    /// Read workbook.xml.rels to get sheet file paths
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let id = attr_value(&e, b"Id");
                    let target = attr_value(&e, b"Target");
                    let rel_type = attr_value(&e, b"Type");

                    // Only include worksheet relationships
                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Target is relative to xl/ folder
                            let full_path = match target.strip_prefix('/') {
                                Some(absolute) => absolute.to_string(),
                                None => format!("xl/{}", target),
                            };
                            rels.insert(id, full_path);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Read a worksheet's cells from the archive
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        worksheet: &mut Worksheet,
        context: &ReadContext,
    ) -> XlsxResult<()> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(false);

        let mut buf = Vec::new();

        let mut current: Option<RawCell> = None;
        let mut in_value = false;
        let mut in_inline_str = false;
        let mut in_inline_text = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"c" => current = Some(Self::parse_cell_attrs(&e)),
                    b"v" if current.is_some() => in_value = true,
                    b"f" => {
                        if let Some(cell) = current.as_mut() {
                            cell.has_formula = true;
                        }
                    }
                    b"is" if current.is_some() => in_inline_str = true,
                    b"t" if in_inline_str => in_inline_text = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    // Empty cell element (may still carry a style)
                    b"c" => Self::process_cell(worksheet, Self::parse_cell_attrs(&e), context)?,
                    b"f" => {
                        if let Some(cell) = current.as_mut() {
                            cell.has_formula = true;
                        }
                    }
                    _ => {}
                },
                Ok(Event::Text(e)) if in_value || in_inline_text => {
                    let text = e.unescape()?;
                    if let Some(cell) = current.as_mut() {
                        cell.value.get_or_insert_with(String::new).push_str(&text);
                    }
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"c" => {
                        if let Some(cell) = current.take() {
                            Self::process_cell(worksheet, cell, context)?;
                        }
                    }
                    b"v" => in_value = false,
                    b"is" => in_inline_str = false,
                    b"t" if in_inline_str => in_inline_text = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }

    fn parse_cell_attrs(e: &BytesStart<'_>) -> RawCell {
        RawCell {
            reference: attr_value(e, b"r"),
            cell_type: attr_value(e, b"t"),
            style: attr_value(e, b"s").and_then(|s| s.parse::<u32>().ok()),
            value: None,
            has_formula: false,
        }
    }

    /// Process a cell and add it to the worksheet
    fn process_cell(worksheet: &mut Worksheet, cell: RawCell, context: &ReadContext) -> XlsxResult<()> {
        let Some(cell_ref) = cell.reference.as_deref() else {
            warn!(
                "sheet '{}': cell without a reference, skipping",
                worksheet.name()
            );
            return Ok(());
        };
        let addr = CellAddress::parse(cell_ref).map_err(|e| {
            XlsxError::Parse(format!("Invalid cell reference '{}': {}", cell_ref, e))
        })?;

        let style = match cell.style {
            Some(0) | None => None,
            Some(s) => Some(context.cell_styles.get(s as usize).ok_or_else(|| {
                XlsxError::Parse(format!("Style index {} out of bounds", s))
            })?),
        };

        let value = match cell.value.as_deref() {
            Some(raw) => Self::parse_value(
                worksheet.name(),
                cell_ref,
                cell.cell_type.as_deref(),
                raw,
                style,
                context,
            )?,
            None => CellValue::Empty,
        };

        if cell.has_formula && value.is_empty() {
            debug!(
                "sheet '{}': formula cell {} has no cached value",
                worksheet.name(),
                cell_ref
            );
        }

        worksheet.set_cell_value_at(addr.row, addr.col, value)?;
        if let Some(style) = style {
            worksheet.set_cell_style_at(addr.row, addr.col, style)?;
        }

        Ok(())
    }

    /// Interpret the text of a `<v>` (or inline `<t>`) element by cell type
    fn parse_value(
        sheet: &str,
        cell_ref: &str,
        cell_type: Option<&str>,
        raw: &str,
        style: Option<&Style>,
        context: &ReadContext,
    ) -> XlsxResult<CellValue> {
        let value = match cell_type {
            // Shared string
            Some("s") => {
                let idx: usize = raw.trim().parse().map_err(|_| {
                    XlsxError::Parse(format!("Invalid shared string index: {}", raw))
                })?;
                let s = context.shared_strings.get(idx).ok_or_else(|| {
                    XlsxError::Parse(format!("Shared string index {} out of bounds", idx))
                })?;
                CellValue::string(s.as_str())
            }

            // Boolean
            Some("b") => CellValue::Boolean(raw == "1" || raw.eq_ignore_ascii_case("true")),

            // Error
            Some("e") => CellError::parse(raw)
                .map(CellValue::Error)
                .unwrap_or_else(|| CellValue::string(raw)),

            // Inline string / formula string result
            Some("inlineStr") | Some("str") => CellValue::string(decode_excel_escapes(raw)),

            // ISO 8601 date
            Some("d") => match chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .or_else(|_| chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
                .ok()
                .or_else(|| {
                    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                }) {
                Some(dt) => CellValue::DateTime(dt),
                None => {
                    warn!("sheet '{}': unparsable date '{}' in {}", sheet, raw, cell_ref);
                    CellValue::string(raw)
                }
            },

            // Number (default type or explicit "n")
            None | Some("n") => match raw.trim().parse::<f64>() {
                Ok(n) if !n.is_finite() => {
                    warn!(
                        "sheet '{}': non-finite value '{}' in numeric cell {}, keeping as text",
                        sheet, raw, cell_ref
                    );
                    CellValue::string(raw)
                }
                Ok(n) => {
                    let is_date = style.is_some_and(|s| s.number_format.is_date_format());
                    match is_date.then(|| serial_to_datetime(n, context.date_1904)).flatten() {
                        Some(dt) => CellValue::DateTime(dt),
                        None => CellValue::Number(n),
                    }
                }
                Err(_) => {
                    warn!(
                        "sheet '{}': non-numeric value '{}' in numeric cell {}, keeping as text",
                        sheet, raw, cell_ref
                    );
                    CellValue::string(raw)
                }
            },

            // Unknown type - treat as string
            Some(_) => CellValue::string(raw),
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, Write};

    #[test]
    fn test_decode_excel_escapes() {
        assert_eq!(decode_excel_escapes("hello_x000d_world"), "hello\rworld");
        assert_eq!(decode_excel_escapes("col1_x0009_col2"), "col1\tcol2");
        assert_eq!(
            decode_excel_escapes("line1_x000d__x000a_line2"),
            "line1\r\nline2"
        );
        assert_eq!(decode_excel_escapes("under_x005f_score"), "under_score");
        assert_eq!(decode_excel_escapes("_x000D_"), "\r");
        assert_eq!(decode_excel_escapes("plain text"), "plain text");
    }

    #[test]
    fn test_decode_excel_escapes_partial_sequence() {
        assert_eq!(decode_excel_escapes("_x00"), "_x00");
        assert_eq!(decode_excel_escapes("_x000d"), "_x000d");
        assert_eq!(decode_excel_escapes("a_xyz_"), "a_xyz_");
    }

    /// Builds a minimal package around the given worksheet and styles XML
    fn package(sheets: &[(&str, &str)], shared: Option<&str>, styles: Option<&str>) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let cursor = Cursor::new(&mut buf);
            let mut zip = zip::ZipWriter::new(cursor);
            let options = zip::write::SimpleFileOptions::default();

            zip.start_file("[Content_Types].xml", options).unwrap();
            zip.write_all(br#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#).unwrap();

            let mut workbook = String::from(r#"<?xml version="1.0"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#);
            let mut rels = String::from(r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
            for (i, (name, _)) in sheets.iter().enumerate() {
                workbook.push_str(&format!(
                    r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                    name,
                    i + 1,
                    i + 1
                ));
                rels.push_str(&format!(
                    r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                    i + 1,
                    i + 1
                ));
            }
            workbook.push_str("</sheets></workbook>");
            rels.push_str("</Relationships>");

            zip.start_file("xl/workbook.xml", options).unwrap();
            zip.write_all(workbook.as_bytes()).unwrap();
            zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
            zip.write_all(rels.as_bytes()).unwrap();

            for (i, (_, data)) in sheets.iter().enumerate() {
                zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)
                    .unwrap();
                zip.write_all(
                    format!(
                        r#"<?xml version="1.0"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
                        data
                    )
                    .as_bytes(),
                )
                .unwrap();
            }

            if let Some(shared) = shared {
                zip.start_file("xl/sharedStrings.xml", options).unwrap();
                zip.write_all(shared.as_bytes()).unwrap();
            }
            if let Some(styles) = styles {
                zip.start_file("xl/styles.xml", options).unwrap();
                zip.write_all(styles.as_bytes()).unwrap();
            }

            zip.finish().unwrap();
        }
        buf
    }

    #[test]
    fn test_read_empty_sheet() {
        let buf = package(&[("Sheet1", "")], None, None);
        let workbook = XlsxReader::read(Cursor::new(buf)).unwrap();

        assert_eq!(workbook.sheet_count(), 1);
        assert_eq!(workbook.worksheet(0).unwrap().name(), "Sheet1");
        assert!(workbook.worksheet(0).unwrap().is_empty());
    }

    #[test]
    fn test_read_zero_sheets() {
        let buf = package(&[], None, None);
        let workbook = XlsxReader::read(Cursor::new(buf)).unwrap();
        assert!(workbook.is_empty());
    }

    #[test]
    fn test_read_value_kinds() {
        let shared = r#"<?xml version="1.0"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><si><t>ID</t></si><si><r><t>Hel</t></r><r><t>lo</t></r></si></sst>"#;
        let data = concat!(
            r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>"#,
            r#"<row r="2"><c r="A2"><v>10</v></c><c r="B2" t="b"><v>1</v></c><c r="C2" t="e"><v>#N/A</v></c></row>"#,
            r#"<row r="3"><c r="A3" t="inlineStr"><is><t>inline</t></is></c><c r="C3"><f>A2*2</f><v>20</v></c><c r="D3" t="str"><f>"x"&amp;"y"</f><v>xy</v></c></row>"#,
            r#"<row r="4"><c r="A4"><f>NOW()</f></c></row>"#,
        );
        let buf = package(&[("Data", data)], Some(shared), None);
        let workbook = XlsxReader::read(Cursor::new(buf)).unwrap();
        let sheet = workbook.worksheet_by_name("Data").unwrap();

        assert_eq!(sheet.get_value("A1").unwrap(), CellValue::string("ID"));
        assert_eq!(sheet.get_value("B1").unwrap(), CellValue::string("Hello"));
        assert_eq!(sheet.get_value("A2").unwrap(), CellValue::Number(10.0));
        assert_eq!(sheet.get_value("B2").unwrap(), CellValue::Boolean(true));
        assert_eq!(
            sheet.get_value("C2").unwrap(),
            CellValue::Error(CellError::Na)
        );
        assert_eq!(sheet.get_value("A3").unwrap(), CellValue::string("inline"));
        assert_eq!(sheet.get_value("C3").unwrap(), CellValue::Number(20.0));
        assert_eq!(sheet.get_value("D3").unwrap(), CellValue::string("xy"));
        assert_eq!(sheet.value_at(4, 1), None);
        assert_eq!(sheet.max_row(), 3);
    }

    #[test]
    fn test_non_finite_numbers_are_kept_as_text() {
        let data = r#"<row r="1"><c r="A1"><v>NaN</v></c><c r="B1" t="n"><v>inf</v></c><c r="C1"><v>5</v></c></row>"#;
        let buf = package(&[("Sheet1", data)], None, None);
        let workbook = XlsxReader::read(Cursor::new(buf)).unwrap();
        let sheet = workbook.worksheet(0).unwrap();

        assert_eq!(sheet.get_value("A1").unwrap(), CellValue::string("NaN"));
        assert_eq!(sheet.get_value("B1").unwrap(), CellValue::string("inf"));
        assert_eq!(sheet.get_value("C1").unwrap(), CellValue::Number(5.0));
    }

    #[test]
    fn test_read_dates_from_number_format() {
        let styles = r#"<?xml version="1.0"?><styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><numFmts count="1"><numFmt numFmtId="164" formatCode="yyyy-mm-dd"/></numFmts><cellXfs count="3"><xf numFmtId="0"/><xf numFmtId="14"/><xf numFmtId="164"/></cellXfs></styleSheet>"#;
        let data = r#"<row r="1"><c r="A1" s="1"><v>45000</v></c><c r="B1" s="2"><v>45000.5</v></c><c r="C1"><v>45000</v></c></row>"#;
        let buf = package(&[("Dates", data)], None, Some(styles));
        let workbook = XlsxReader::read(Cursor::new(buf)).unwrap();
        let sheet = workbook.worksheet(0).unwrap();

        let day = NaiveDate::from_ymd_opt(2023, 3, 15).unwrap();
        assert_eq!(
            sheet.get_value("A1").unwrap(),
            CellValue::DateTime(day.and_hms_opt(0, 0, 0).unwrap())
        );
        assert_eq!(
            sheet.get_value("B1").unwrap(),
            CellValue::DateTime(day.and_hms_opt(12, 0, 0).unwrap())
        );
        assert_eq!(sheet.get_value("C1").unwrap(), CellValue::Number(45000.0));
    }

    #[test]
    fn test_missing_content_types_is_rejected() {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            zip.start_file("hello.txt", zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(b"hi").unwrap();
            zip.finish().unwrap();
        }
        assert!(matches!(
            XlsxReader::read(Cursor::new(buf)),
            Err(XlsxError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(
            XlsxReader::read(Cursor::new(b"not a zip".to_vec())),
            Err(XlsxError::Zip(_))
        ));
    }
}
