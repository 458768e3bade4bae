//! Text rendering for each command's result.

use clap::ValueEnum;
use serde_json::{Map, Value};

use gsheet_core::{render_html, ColumnKey, Row, Sheet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
    Html,
}

pub fn render_sheet(sheet: &Sheet, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Csv => Ok(sheet.to_csv_string()),
        OutputFormat::Json => serde_json::to_string_pretty(sheet),
        OutputFormat::Html => Ok(render_html(sheet)),
    }
}

/// JSON for one row: an object keyed by header when the sheet has headers,
/// otherwise an array.
pub fn row_json(sheet: &Sheet, row: &Row<'_>) -> Value {
    match sheet.header_names() {
        Some(names) => {
            let mut obj = Map::new();
            for (name, cell) in names.iter().zip(row.cells()) {
                obj.insert(name.clone(), Value::String(cell.clone()));
            }
            Value::Object(obj)
        }
        None => Value::Array(row.cells().iter().cloned().map(Value::String).collect()),
    }
}

/// Interpret a command-line column argument. An exact header match wins, so
/// a column literally named "2" stays reachable; otherwise digits are a
/// position.
pub fn column_key(raw: &str, sheet: &Sheet) -> ColumnKey {
    let is_header = sheet
        .headers()
        .is_some_and(|headers| headers.position(raw).is_some());
    if is_header {
        return ColumnKey::Name(raw.to_string());
    }
    match raw.parse::<usize>() {
        Ok(index) => ColumnKey::Index(index),
        Err(_) => ColumnKey::Name(raw.to_string()),
    }
}
