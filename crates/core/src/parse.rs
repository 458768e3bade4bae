//! Payload → `Sheet`.
//!
//! Both source variants end up here: CSV text from the publish-to-web export
//! and the JSON value range from the Sheets API. Each produces a list of raw
//! rows, and [`Sheet::from_raw_rows`] does the rest (header split, padding,
//! transpose).
//!
//! CSV handling is naive. Quotes are ordinary characters and a
//! comma always separates fields, so a quoted field with an embedded comma
//! is split. Line endings may be `\n` or `\r\n`. A single trailing newline
//! does not add an empty row; any other blank line is a row with one empty
//! cell.

use serde::Deserialize;

use crate::error::SheetError;
use crate::sheet::{transpose, Sheet};

/// Wire format of a fetched payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    /// Publish-to-web CSV export.
    Csv,
    /// Sheets API `values.get` response.
    Json,
}

/// Parse a payload into a sheet. The first row becomes the header row
/// when `has_header` is set.
pub fn parse(payload: &str, format: PayloadFormat, has_header: bool) -> Result<Sheet, SheetError> {
    let raw = match format {
        PayloadFormat::Csv => csv_rows(payload)?,
        PayloadFormat::Json => json_rows(payload)?,
    };
    let sheet = Sheet::from_raw_rows(raw, has_header);
    log::debug!(
        "parsed {:?} payload: {} rows x {} cols (headers: {})",
        format,
        sheet.row_count(),
        sheet.col_count(),
        has_header,
    );
    Ok(sheet)
}

pub fn parse_csv(payload: &str, has_header: bool) -> Result<Sheet, SheetError> {
    parse(payload, PayloadFormat::Csv, has_header)
}

pub fn parse_values_json(payload: &str, has_header: bool) -> Result<Sheet, SheetError> {
    parse(payload, PayloadFormat::Json, has_header)
}

fn strip_bom(payload: &str) -> &str {
    payload.trim_start_matches('\u{feff}')
}

fn csv_rows(payload: &str) -> Result<Vec<Vec<String>>, SheetError> {
    let payload = strip_bom(payload);
    if payload.is_empty() {
        return Ok(Vec::new());
    }
    let body = payload.strip_suffix('\n').unwrap_or(payload);

    // One record per line, so a blank line is a row holding one empty cell.
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'));

    body.split('\n')
        .enumerate()
        .map(|(line_no, line)| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                return Ok(vec![String::new()]);
            }
            let mut record = csv::StringRecord::new();
            builder
                .from_reader(line.as_bytes())
                .read_record(&mut record)
                .map_err(|e| SheetError::Parse(format!("CSV line {}: {}", line_no + 1, e)))?;
            Ok(record.iter().map(String::from).collect())
        })
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    values: Vec<Vec<serde_json::Value>>,
    #[serde(default)]
    major_dimension: Option<String>,
}

fn json_rows(payload: &str) -> Result<Vec<Vec<String>>, SheetError> {
    let range: ValueRange = serde_json::from_str(strip_bom(payload))
        .map_err(|e| SheetError::Parse(format!("invalid value range JSON: {}", e)))?;

    let mut rows = range
        .values
        .iter()
        .enumerate()
        .map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(|(c, value)| json_cell(value, r, c))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Column-major ranges: flip to rows (short columns pad with "").
    if range.major_dimension.as_deref() == Some("COLUMNS") {
        rows = transpose(&rows);
    }

    Ok(rows)
}

fn json_cell(value: &serde_json::Value, row: usize, col: usize) -> Result<String, SheetError> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(SheetError::Parse(format!(
            "values[{}][{}]: expected a scalar cell, found {}",
            row,
            col,
            if other.is_array() { "an array" } else { "an object" },
        ))),
    }
}
