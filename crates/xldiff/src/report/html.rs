//! HTML tables of comparison results
//!
//! Every cell carries the CSS classes of its tags (`header`, `key`, `diff`),
//! styled by [`STYLESHEET`] the same way the XLSX report is.

use xldiff_core::CellAddress;
use xldiff_engine::{Comparison, SheetComparison};

use super::{display_sheet, is_truncated, PREVIEW_MAX_COLS, PREVIEW_MAX_ROWS};

/// Colours matching the default report style
pub const STYLESHEET: &str = r#"body{font-family:system-ui,-apple-system,"Segoe UI",Arial,sans-serif;margin:16px;}
h2{font-size:15px;margin:18px 0 6px 0;}
.summary{font-size:12px;color:#555;margin-bottom:6px;}
table.sheet{border-collapse:collapse;font-size:12px;}
table.sheet th,table.sheet td{border:1px solid #ccc;padding:3px 6px;white-space:nowrap;}
table.sheet th{background:#eee;color:#555;font-weight:normal;}
td.header{background:#00ff00;}
td.key{background:#ffff00;}
td.diff{color:#ff0000;}
.empty{color:#888;font-style:italic;}
"#;

pub(crate) fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// One sheet as a heading, a summary line and a table
pub fn render_sheet(sheet: &SheetComparison) -> String {
    let summary = sheet.summary();
    let mut out = String::new();

    out.push_str(&format!("<h2>{}</h2>", escape_html(sheet.name())));
    out.push_str(&format!(
        "<div class=\"summary\">{} pairing, {} of {} rows matched, {} differing cells</div>",
        summary.pairing, summary.matched_rows, summary.rows, summary.diff_cells
    ));

    let rows = display_sheet(sheet);
    if rows.is_empty() {
        out.push_str("<div class=\"empty\">Sheet is empty.</div>");
        return out;
    }

    if is_truncated(sheet) {
        out.push_str(&format!(
            "<div class=\"summary\">Preview limited to the first {} rows and {} columns.</div>",
            PREVIEW_MAX_ROWS, PREVIEW_MAX_COLS
        ));
    }

    out.push_str("<table class=\"sheet\"><thead><tr><th></th>");
    let width = rows.first().map_or(0, |r| r.len() as u16);
    for col in 1..=width {
        out.push_str(&format!("<th>{}</th>", CellAddress::column_to_letters(col)));
    }
    out.push_str("</tr></thead><tbody>");

    for (i, row) in rows.iter().enumerate() {
        out.push_str(&format!("<tr><th>{}</th>", i + 1));
        for cell in row {
            let classes = cell.class_names();
            if classes.is_empty() {
                out.push_str("<td>");
            } else {
                out.push_str(&format!("<td class=\"{}\">", classes));
            }
            out.push_str(&escape_html(&cell.value));
            out.push_str("</td>");
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
    out
}

/// All sheets of a comparison, in left sheet order
pub fn render_comparison(comparison: &Comparison) -> String {
    if comparison.is_empty() {
        return "<div class=\"empty\">The left workbook has no sheets.</div>".to_string();
    }
    comparison.sheets().iter().map(render_sheet).collect()
}

/// A standalone page: stylesheet, all sheets, then `footer` verbatim
pub fn render_document(comparison: &Comparison, title: &str, footer: Option<&str>) -> String {
    let mut html = String::new();
    html.push_str("<!doctype html><html><head><meta charset=\"utf-8\" />");
    html.push_str(&format!("<title>{}</title>", escape_html(title)));
    html.push_str("<style>");
    html.push_str(STYLESHEET);
    html.push_str("</style></head><body>");
    html.push_str(&format!("<h1>{}</h1>", escape_html(title)));
    if let Some(footer) = footer {
        html.push_str(footer);
    }
    html.push_str(&render_comparison(comparison));
    html.push_str("</body></html>");
    html
}
