//! Table output for display layers.
//!
//! [`TableLayout`] is the hand-off to whatever draws the table: header cells
//! and body cells, row-major. [`TableLayout::to_html`] covers the common
//! case of dropping the sheet into a web page.

use std::fmt::Write;

use serde::Serialize;

use crate::sheet::Sheet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableLayout {
    /// Header cells, present when the sheet was loaded in header mode.
    pub header: Option<Vec<String>>,
    /// One entry per data row.
    pub body: Vec<Vec<String>>,
}

impl TableLayout {
    pub fn from_sheet(sheet: &Sheet) -> Self {
        Self {
            header: sheet.header_names().map(<[String]>::to_vec),
            body: sheet.rows().to_vec(),
        }
    }

    /// Render as an HTML `<table>`. Cell text is escaped.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<table>\n");

        if let Some(header) = &self.header {
            html.push_str("  <thead>\n    <tr>");
            for cell in header {
                push_cell(&mut html, "th", cell);
            }
            html.push_str("</tr>\n  </thead>\n");
        }

        html.push_str("  <tbody>\n");
        for row in &self.body {
            html.push_str("    <tr>");
            for cell in row {
                push_cell(&mut html, "td", cell);
            }
            html.push_str("</tr>\n");
        }
        html.push_str("  </tbody>\n</table>");

        html
    }
}

/// Shorthand for `TableLayout::from_sheet(sheet).to_html()`.
pub fn render_html(sheet: &Sheet) -> String {
    TableLayout::from_sheet(sheet).to_html()
}

fn push_cell(html: &mut String, tag: &str, text: &str) {
    let _ = write!(html, "<{}>", tag);
    escape_into(html, text);
    let _ = write!(html, "</{}>", tag);
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}
