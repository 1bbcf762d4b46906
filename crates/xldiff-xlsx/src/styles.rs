//! XLSX styles (styles.xml) read/write helpers

use std::collections::HashMap;
use std::io::{BufReader, Read};

use chrono::Timelike;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use xldiff_core::style::{Color, FillStyle, FontStyle, NumberFormat, Style};
use xldiff_core::{CellData, Workbook, Worksheet};

// === Writing ===

/// Workbook-wide table of cell formats (`cellXfs`)
///
/// Worksheets pool styles locally; the table maps each worksheet's local
/// style indices onto one deduplicated list of xf records. Date cells whose
/// own style lacks a date number format get a variant of that style with
/// one, so dates survive a write/read cycle.
#[derive(Debug)]
pub(crate) struct XlsxStyleTable {
    /// Global, deduplicated styles. Index corresponds to the cellXfs index.
    styles: Vec<Style>,
    /// Per-worksheet mapping: (local style index, date format override) -> xf id
    sheet_maps: Vec<HashMap<(u32, Option<u32>), u32>>,
}

#[derive(Debug, Clone, Copy)]
struct ResolvedXfIds {
    font_id: u32,
    fill_id: u32,
    num_fmt_id: u32,
}

impl XlsxStyleTable {
    pub(crate) fn build(workbook: &Workbook) -> Self {
        let mut styles: Vec<Style> = vec![Style::default()];
        let mut style_to_xf: HashMap<Style, u32> = HashMap::new();
        style_to_xf.insert(Style::default(), 0);

        let mut sheet_maps = Vec::with_capacity(workbook.sheet_count());

        for sheet in workbook.worksheets() {
            let mut map: HashMap<(u32, Option<u32>), u32> = HashMap::new();
            map.insert((0, None), 0);

            for (_row, _col, cell) in sheet.iter_cells() {
                let key = (cell.style_index, date_override(sheet, cell));
                if map.contains_key(&key) {
                    continue;
                }

                let mut style = sheet
                    .style_by_index(key.0)
                    .cloned()
                    .unwrap_or_default();
                if let Some(id) = key.1 {
                    style.number_format = NumberFormat::from_id(id);
                }

                let xf_id = *style_to_xf.entry(style.clone()).or_insert_with(|| {
                    styles.push(style);
                    styles.len() as u32 - 1
                });
                map.insert(key, xf_id);
            }

            sheet_maps.push(map);
        }

        Self { styles, sheet_maps }
    }

    pub(crate) fn xf_id_for(&self, sheet_index: usize, sheet: &Worksheet, cell: &CellData) -> u32 {
        let key = (cell.style_index, date_override(sheet, cell));
        self.sheet_maps
            .get(sheet_index)
            .and_then(|m| m.get(&key).copied())
            .unwrap_or(0)
    }

    pub(crate) fn to_styles_xml(&self) -> String {
        let mut font_ids: HashMap<FontStyle, u32> = HashMap::new();
        let mut fonts: Vec<FontStyle> = vec![FontStyle::default()];
        font_ids.insert(FontStyle::default(), 0);

        // Excel requires the first two fills to be: none and gray125
        let mut fill_ids: HashMap<FillStyle, u32> = HashMap::new();
        let mut fills: Vec<FillStyle> = vec![FillStyle::None];
        fill_ids.insert(FillStyle::None, 0);

        let mut numfmt_ids: HashMap<String, u32> = HashMap::new();
        let mut numfmts: Vec<(u32, String)> = Vec::new();
        let mut next_numfmt_id: u32 = 164;

        let mut resolved: Vec<ResolvedXfIds> = Vec::with_capacity(self.styles.len());

        for style in &self.styles {
            let font_id = match font_ids.get(&style.font) {
                Some(&id) => id,
                None => {
                    let id = fonts.len() as u32;
                    fonts.push(style.font.clone());
                    font_ids.insert(style.font.clone(), id);
                    id
                }
            };

            let fill_id = match style.fill {
                FillStyle::None => 0,
                fill => *fill_ids.entry(fill).or_insert_with(|| {
                    fills.push(fill);
                    // +1 for the gray125 slot that is written but not pooled
                    fills.len() as u32
                }),
            };

            let num_fmt_id = match &style.number_format {
                NumberFormat::General => 0,
                NumberFormat::BuiltIn(id) => *id,
                NumberFormat::Custom(code) => {
                    if let Some(&id) = numfmt_ids.get(code) {
                        id
                    } else {
                        let id = next_numfmt_id;
                        next_numfmt_id += 1;
                        numfmt_ids.insert(code.clone(), id);
                        numfmts.push((id, code.clone()));
                        id
                    }
                }
            };

            resolved.push(ResolvedXfIds {
                font_id,
                fill_id,
                num_fmt_id,
            });
        }

        let mut xml = String::new();
        xml.push_str(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        if !numfmts.is_empty() {
            xml.push_str(&format!("\n  <numFmts count=\"{}\">", numfmts.len()));
            for (id, code) in &numfmts {
                xml.push_str(&format!(
                    "\n    <numFmt numFmtId=\"{}\" formatCode=\"{}\"/>",
                    id,
                    escape_xml(code)
                ));
            }
            xml.push_str("\n  </numFmts>");
        }

        xml.push_str(&format!("\n  <fonts count=\"{}\">", fonts.len()));
        for font in &fonts {
            xml.push_str("\n    ");
            xml.push_str(&write_font(font));
        }
        xml.push_str("\n  </fonts>");

        // fills[0] = none, fills[1] = gray125, then the pooled fills
        xml.push_str(&format!("\n  <fills count=\"{}\">", fills.len() + 1));
        xml.push_str("\n    ");
        xml.push_str(&write_fill(&FillStyle::None));
        xml.push_str("\n    <fill><patternFill patternType=\"gray125\"/></fill>");
        for fill in fills.iter().skip(1) {
            xml.push_str("\n    ");
            xml.push_str(&write_fill(fill));
        }
        xml.push_str("\n  </fills>");

        xml.push_str(
            r#"
  <borders count="1">
    <border><left/><right/><top/><bottom/><diagonal/></border>
  </borders>
  <cellStyleXfs count="1">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
  </cellStyleXfs>"#,
        );

        xml.push_str(&format!("\n  <cellXfs count=\"{}\">", self.styles.len()));
        for ids in &resolved {
            xml.push_str("\n    ");
            xml.push_str(&write_xf(*ids));
        }
        xml.push_str("\n  </cellXfs>");

        xml.push_str(
            r#"
  <cellStyles count="1">
    <cellStyle name="Normal" xfId="0" builtinId="0"/>
  </cellStyles>
  <dxfs count="0"/>
  <tableStyles count="0" defaultTableStyle="TableStyleMedium9" defaultPivotStyle="PivotStyleLight16"/>"#,
        );

        xml.push_str("\n</styleSheet>");
        xml
    }
}

/// Number format a date cell needs when its own style does not carry one
fn date_override(sheet: &Worksheet, cell: &CellData) -> Option<u32> {
    let dt = cell.value.as_datetime()?;
    let has_date_format = sheet
        .style_by_index(cell.style_index)
        .is_some_and(|s| s.number_format.is_date_format());
    if has_date_format {
        return None;
    }
    if dt.num_seconds_from_midnight() == 0 && dt.nanosecond() == 0 {
        Some(NumberFormat::ID_DATE_SHORT)
    } else {
        Some(NumberFormat::ID_DATETIME)
    }
}

pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn write_color(tag: &str, color: &Color) -> String {
    match color {
        Color::Auto => format!("<{tag} auto=\"1\"/>"),
        Color::Rgb { r, g, b } => format!("<{tag} rgb=\"FF{:02X}{:02X}{:02X}\"/>", r, g, b),
        Color::Argb { a, r, g, b } => {
            format!("<{tag} rgb=\"{:02X}{:02X}{:02X}{:02X}\"/>", a, r, g, b)
        }
        Color::Indexed(i) => format!("<{tag} indexed=\"{}\"/>", i),
        Color::Theme(i) => format!("<{tag} theme=\"{}\"/>", i),
    }
}

fn write_font(font: &FontStyle) -> String {
    let mut s = String::from("<font>");
    if font.bold {
        s.push_str("<b/>");
    }
    if font.italic {
        s.push_str("<i/>");
    }
    s.push_str(&format!("<sz val=\"{}\"/>", font.size));
    if !font.color.is_auto() {
        s.push_str(&write_color("color", &font.color));
    }
    s.push_str(&format!("<name val=\"{}\"/>", escape_xml(&font.name)));
    s.push_str("</font>");
    s
}

fn write_fill(fill: &FillStyle) -> String {
    match fill {
        FillStyle::None => "<fill><patternFill patternType=\"none\"/></fill>".to_string(),
        FillStyle::Solid { color } => format!(
            "<fill><patternFill patternType=\"solid\">{}<bgColor indexed=\"64\"/></patternFill></fill>",
            write_color("fgColor", color)
        ),
    }
}

fn write_xf(ids: ResolvedXfIds) -> String {
    let mut attrs = String::new();
    if ids.num_fmt_id != 0 {
        attrs.push_str(" applyNumberFormat=\"1\"");
    }
    if ids.font_id != 0 {
        attrs.push_str(" applyFont=\"1\"");
    }
    if ids.fill_id != 0 {
        attrs.push_str(" applyFill=\"1\"");
    }

    format!(
        "<xf numFmtId=\"{}\" fontId=\"{}\" fillId=\"{}\" borderId=\"0\" xfId=\"0\"{}/>",
        ids.num_fmt_id, ids.font_id, ids.fill_id, attrs
    )
}

// === Reading ===

/// Cell formats parsed from styles.xml, indexed by `cellXfs` position
#[derive(Debug)]
pub(crate) struct ParsedStyles {
    pub cell_styles: Vec<Style>,
}

impl ParsedStyles {
    pub(crate) fn fallback() -> Self {
        Self {
            cell_styles: vec![Style::default()],
        }
    }
}

pub(crate) fn read_styles_xml<R: Read>(reader: R) -> XlsxResult<ParsedStyles> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();

    let mut numfmts: HashMap<u32, String> = HashMap::new();
    let mut fonts: Vec<FontStyle> = Vec::new();
    let mut fills: Vec<FillStyle> = Vec::new();
    let mut cell_xfs: Vec<Style> = Vec::new();

    let mut current_font: Option<FontStyle> = None;
    let mut in_fill = false;
    let mut fill_pattern: Option<String> = None;
    let mut fill_fg = Color::Auto;

    let mut in_cell_xfs = false;
    // (numFmtId, fontId, fillId) of an open <xf>
    let mut current_xf: Option<(u32, u32, u32)> = None;
    // dxfs carry fonts and fills of their own that must not join the tables
    let mut in_dxfs = false;

    loop {
        let event = xml_reader.read_event_into(&mut buf);
        let is_empty = matches!(event, Ok(Event::Empty(_)));
        match event {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"dxfs" => in_dxfs = !is_empty,
                _ if in_dxfs => {}

                b"numFmt" => {
                    let id = attr_value(&e, b"numFmtId").and_then(|s| s.parse().ok());
                    let code = attr_value(&e, b"formatCode");
                    if let (Some(id), Some(code)) = (id, code) {
                        numfmts.insert(id, code);
                    }
                }

                b"font" => {
                    let font = FontStyle::default();
                    if is_empty {
                        fonts.push(font);
                    } else {
                        current_font = Some(font);
                    }
                }
                b"b" => {
                    if let Some(font) = current_font.as_mut() {
                        font.bold = attr_value(&e, b"val").map_or(true, |v| v != "0");
                    }
                }
                b"i" => {
                    if let Some(font) = current_font.as_mut() {
                        font.italic = attr_value(&e, b"val").map_or(true, |v| v != "0");
                    }
                }
                b"sz" => {
                    if let Some(font) = current_font.as_mut() {
                        if let Some(size) = attr_value(&e, b"val").and_then(|v| v.parse().ok()) {
                            font.size = size;
                        }
                    }
                }
                b"name" => {
                    if let Some(font) = current_font.as_mut() {
                        if let Some(name) = attr_value(&e, b"val") {
                            font.name = name;
                        }
                    }
                }
                b"color" => {
                    if let Some(font) = current_font.as_mut() {
                        font.color = parse_color_attrs(&e);
                    }
                }

                b"fill" => {
                    if is_empty {
                        fills.push(FillStyle::None);
                    } else {
                        in_fill = true;
                        fill_pattern = None;
                        fill_fg = Color::Auto;
                    }
                }
                b"patternFill" if in_fill => {
                    fill_pattern = attr_value(&e, b"patternType");
                }
                b"fgColor" if in_fill => {
                    fill_fg = parse_color_attrs(&e);
                }

                b"cellXfs" => in_cell_xfs = !is_empty,
                b"xf" if in_cell_xfs => {
                    let id = |key: &[u8]| {
                        attr_value(&e, key)
                            .and_then(|s| s.parse::<u32>().ok())
                            .unwrap_or(0)
                    };
                    let ids = (id(b"numFmtId"), id(b"fontId"), id(b"fillId"));
                    if is_empty {
                        cell_xfs.push(resolve_style(ids, &numfmts, &fonts, &fills));
                    } else {
                        current_xf = Some(ids);
                    }
                }
                _ => {}
            },

            Ok(Event::End(e)) => match e.name().as_ref() {
                b"dxfs" => in_dxfs = false,
                _ if in_dxfs => {}
                b"font" => {
                    if let Some(font) = current_font.take() {
                        fonts.push(font);
                    }
                }
                b"fill" if in_fill => {
                    let fill = match fill_pattern.as_deref() {
                        Some("solid") => FillStyle::Solid { color: fill_fg },
                        _ => FillStyle::None,
                    };
                    fills.push(fill);
                    in_fill = false;
                }
                b"xf" => {
                    if let Some(ids) = current_xf.take() {
                        cell_xfs.push(resolve_style(ids, &numfmts, &fonts, &fills));
                    }
                }
                b"cellXfs" => in_cell_xfs = false,
                _ => {}
            },

            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }

        buf.clear();
    }

    if cell_xfs.is_empty() {
        return Ok(ParsedStyles::fallback());
    }
    Ok(ParsedStyles {
        cell_styles: cell_xfs,
    })
}

fn resolve_style(
    (num_fmt_id, font_id, fill_id): (u32, u32, u32),
    numfmts: &HashMap<u32, String>,
    fonts: &[FontStyle],
    fills: &[FillStyle],
) -> Style {
    let number_format = match numfmts.get(&num_fmt_id) {
        Some(code) => NumberFormat::Custom(code.clone()),
        None => NumberFormat::from_id(num_fmt_id),
    };

    Style {
        font: fonts.get(font_id as usize).cloned().unwrap_or_default(),
        fill: fills.get(fill_id as usize).copied().unwrap_or_default(),
        number_format,
    }
}

pub(crate) fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.to_string()))
}

fn parse_color_attrs(e: &BytesStart<'_>) -> Color {
    // Priority: rgb > theme > indexed > auto
    if let Some(color) = attr_value(e, b"rgb").and_then(|rgb| Color::from_hex(&rgb)) {
        return color;
    }
    if let Some(index) = attr_value(e, b"theme").and_then(|s| s.parse::<u8>().ok()) {
        return Color::Theme(index);
    }
    if let Some(index) = attr_value(e, b"indexed").and_then(|s| s.parse::<u8>().ok()) {
        return Color::Indexed(index);
    }
    Color::Auto
}
