use std::ops::Index;

use serde::Serialize;

use crate::error::SheetError;
use crate::headers::{ColumnKey, Headers};

/// A loaded spreadsheet: data rows, the same cells column-major, and the
/// optional header row. Built once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sheet {
    headers: Option<Headers>,
    rows: Vec<Vec<String>>,
    #[serde(skip)]
    cols: Vec<Vec<String>>,
}

impl Sheet {
    /// Build a sheet from an optional header row and data rows.
    ///
    /// The grid is squared off to the widest row (header included); short
    /// rows are padded with empty cells.
    pub fn new(headers: Option<Vec<String>>, mut rows: Vec<Vec<String>>) -> Self {
        let width = headers
            .iter()
            .chain(rows.iter())
            .map(Vec::len)
            .max()
            .unwrap_or(0);

        for row in &mut rows {
            row.resize(width, String::new());
        }
        let headers = headers.map(|mut names| {
            names.resize(width, String::new());
            Headers::new(names)
        });
        let cols = transpose_with_width(&rows, width);

        Self { headers, rows, cols }
    }

    /// Split raw payload rows into header + data according to header mode.
    pub fn from_raw_rows(mut raw: Vec<Vec<String>>, has_header: bool) -> Self {
        let headers = if !has_header {
            None
        } else if raw.is_empty() {
            Some(Vec::new())
        } else {
            Some(raw.remove(0))
        };
        Self::new(headers, raw)
    }

    /// A sheet with no rows and no columns.
    pub fn empty(has_header: bool) -> Self {
        Self::from_raw_rows(Vec::new(), has_header)
    }

    pub fn has_header(&self) -> bool {
        self.headers.is_some()
    }

    pub fn headers(&self) -> Option<&Headers> {
        self.headers.as_ref()
    }

    pub fn header_names(&self) -> Option<&[String]> {
        self.headers.as_ref().map(Headers::names)
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn cols(&self) -> &[Vec<String>] {
        &self.cols
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Result<Row<'_>, SheetError> {
        let cells = self.rows.get(index).ok_or(SheetError::RowOutOfRange {
            index,
            len: self.rows.len(),
        })?;
        Ok(Row {
            index,
            cells,
            headers: self.headers.as_ref(),
        })
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().enumerate().map(move |(index, cells)| Row {
            index,
            cells,
            headers: self.headers.as_ref(),
        })
    }

    /// Column by position, or by header name when the sheet has headers.
    pub fn col<K: Into<ColumnKey>>(&self, key: K) -> Result<&[String], SheetError> {
        let index = self.column_index(&key.into())?;
        Ok(&self.cols[index])
    }

    /// Cell at `column` (position or header name) in data row `row`.
    pub fn get<K: Into<ColumnKey>>(&self, column: K, row: usize) -> Result<&str, SheetError> {
        let col = self.col(column)?;
        col.get(row)
            .map(String::as_str)
            .ok_or(SheetError::RowOutOfRange { index: row, len: col.len() })
    }

    /// Resolve a key to a column position, checking bounds.
    pub fn column_index(&self, key: &ColumnKey) -> Result<usize, SheetError> {
        resolve_column(key, self.cols.len(), self.headers.as_ref())
    }

    /// Header line (if any) then one line per data row, comma-joined and
    /// newline-separated, without a trailing newline.
    ///
    /// Fields are written verbatim: a cell containing a comma or newline
    /// does not survive a parse → serialize round-trip.
    pub fn to_csv_string(&self) -> String {
        self.headers
            .iter()
            .map(Headers::names)
            .chain(self.rows.iter().map(Vec::as_slice))
            .map(|line| line.join(","))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One data row, addressable by position or (with headers) by name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    index: usize,
    cells: &'a [String],
    headers: Option<&'a Headers>,
}

impl<'a> Row<'a> {
    /// Position of this row among the data rows.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn cells(&self) -> &'a [String] {
        self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get<K: Into<ColumnKey>>(&self, key: K) -> Result<&'a str, SheetError> {
        let index = resolve_column(&key.into(), self.cells.len(), self.headers)?;
        Ok(self.cells[index].as_str())
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.cells.to_vec()
    }
}

impl Index<usize> for Row<'_> {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.cells[index]
    }
}

impl Index<&str> for Row<'_> {
    type Output = str;

    fn index(&self, name: &str) -> &str {
        match self.get(name) {
            Ok(cell) => cell,
            Err(e) => panic!("{}", e),
        }
    }
}

fn resolve_column(key: &ColumnKey, len: usize, headers: Option<&Headers>) -> Result<usize, SheetError> {
    match key {
        ColumnKey::Index(index) if *index < len => Ok(*index),
        ColumnKey::Index(index) => Err(SheetError::ColumnOutOfRange { index: *index, len }),
        ColumnKey::Name(name) => {
            let headers = headers.ok_or_else(|| SheetError::HeadersDisabled(name.clone()))?;
            headers
                .position(name)
                .ok_or_else(|| SheetError::UnknownHeader(name.clone()))
        }
    }
}

/// Swap rows and columns. The width is the longest row; shorter rows read
/// as `""` past their end. An empty grid transposes to an empty grid.
pub fn transpose(grid: &[Vec<String>]) -> Vec<Vec<String>> {
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    transpose_with_width(grid, width)
}

fn transpose_with_width(grid: &[Vec<String>], width: usize) -> Vec<Vec<String>> {
    (0..width)
        .map(|c| {
            grid.iter()
                .map(|row| row.get(c).cloned().unwrap_or_default())
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    fn with_headers() -> Sheet {
        Sheet::from_raw_rows(grid(&[&["a", "b"], &["1", "2"], &["3", "4"]]), true)
    }

    #[test]
    fn test_header_row_is_consumed() {
        let sheet = with_headers();
        assert_eq!(sheet.header_names().unwrap(), ["a", "b"]);
        assert_eq!(sheet.rows().to_vec(), grid(&[&["1", "2"], &["3", "4"]]));
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.col_count(), 2);
    }

    #[test]
    fn test_no_header_keeps_every_row() {
        let sheet = Sheet::from_raw_rows(grid(&[&["1", "2"], &["3", "4"], &["5", "6"]]), false);
        assert!(!sheet.has_header());
        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.col(1).unwrap(), ["2", "4", "6"]);
    }

    #[test]
    fn test_col_by_name_and_index_agree() {
        let sheet = with_headers();
        assert_eq!(sheet.col("b").unwrap(), sheet.col(1).unwrap());
        assert_eq!(sheet.col("b").unwrap(), ["2", "4"]);
    }

    #[test]
    fn test_get_by_name() {
        let sheet = with_headers();
        assert_eq!(sheet.get("a", 1).unwrap(), "3");
        assert_eq!(sheet.get(1, 0).unwrap(), "2");
    }

    #[test]
    fn test_row_aliases() {
        let sheet = with_headers();
        let row = sheet.row(1).unwrap();
        assert_eq!(row.index(), 1);
        assert_eq!(&row["a"], &row[0]);
        assert_eq!(row.get("b").unwrap(), "4");
        assert_eq!(row.get(0).unwrap(), "3");
    }

    #[test]
    fn test_row_out_of_range() {
        let sheet = with_headers();
        assert_eq!(
            sheet.row(2).unwrap_err(),
            SheetError::RowOutOfRange { index: 2, len: 2 }
        );
    }

    #[test]
    fn test_col_out_of_range() {
        let sheet = with_headers();
        assert_eq!(
            sheet.col(5).unwrap_err(),
            SheetError::ColumnOutOfRange { index: 5, len: 2 }
        );
    }

    #[test]
    fn test_unknown_header() {
        let sheet = with_headers();
        assert_eq!(sheet.col("zzz").unwrap_err(), SheetError::UnknownHeader("zzz".into()));
        assert!(sheet.row(0).unwrap().get("zzz").is_err());
    }

    #[test]
    fn test_name_without_headers() {
        let sheet = Sheet::from_raw_rows(grid(&[&["a", "b"]]), false);
        assert_eq!(sheet.col("a").unwrap_err(), SheetError::HeadersDisabled("a".into()));
    }

    #[test]
    fn test_get_row_out_of_range() {
        let sheet = with_headers();
        assert!(matches!(
            sheet.get("a", 9).unwrap_err(),
            SheetError::RowOutOfRange { index: 9, .. }
        ));
    }

    #[test]
    #[should_panic(expected = "no column with header 'nope'")]
    fn test_index_by_unknown_name_panics() {
        let sheet = with_headers();
        let row = sheet.row(0).unwrap();
        let _ = &row["nope"];
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let sheet = Sheet::from_raw_rows(grid(&[&["a", "b", "c"], &["1"], &["2", "3"]]), true);
        assert_eq!(sheet.rows().to_vec(), grid(&[&["1", "", ""], &["2", "3", ""]]));
        assert_eq!(sheet.col("c").unwrap(), ["", ""]);
    }

    #[test]
    fn test_short_header_row_is_padded() {
        let sheet = Sheet::from_raw_rows(grid(&[&["a"], &["1", "2"]]), true);
        assert_eq!(sheet.header_names().unwrap(), ["a", ""]);
        assert_eq!(sheet.col_count(), 2);
        assert_eq!(sheet.col(1).unwrap(), ["2"]);
    }

    #[test]
    fn test_empty_sheet() {
        let sheet = Sheet::empty(false);
        assert!(sheet.is_empty());
        assert_eq!(sheet.row_count(), 0);
        assert_eq!(sheet.col_count(), 0);
        assert!(sheet.row(0).is_err());
        assert!(sheet.col(0).is_err());
        assert_eq!(sheet.to_csv_string(), "");
    }

    #[test]
    fn test_empty_sheet_with_header_mode() {
        let sheet = Sheet::empty(true);
        assert!(sheet.has_header());
        assert!(sheet.headers().unwrap().is_empty());
        assert_eq!(sheet.col_count(), 0);
    }

    #[test]
    fn test_header_only_sheet_has_empty_columns() {
        let sheet = Sheet::from_raw_rows(grid(&[&["a", "b"]]), true);
        assert_eq!(sheet.row_count(), 0);
        assert_eq!(sheet.col_count(), 2);
        assert!(sheet.col("a").unwrap().is_empty());
    }

    #[test]
    fn test_to_csv_string_with_header() {
        assert_eq!(with_headers().to_csv_string(), "a,b\n1,2\n3,4");
    }

    #[test]
    fn test_to_csv_string_does_not_escape() {
        let sheet = Sheet::new(None, grid(&[&["x,y", "z"]]));
        assert_eq!(sheet.to_csv_string(), "x,y,z");
    }

    #[test]
    fn test_iter_rows() {
        let sheet = with_headers();
        let firsts: Vec<&str> = sheet.iter_rows().map(|r| r.cells()[0].as_str()).collect();
        assert_eq!(firsts, ["1", "3"]);
    }

    #[test]
    fn test_transpose_round_trip() {
        let rows = grid(&[&["1", "2", "3"], &["4", "5", "6"]]);
        let cols = transpose(&rows);
        assert_eq!(cols, grid(&[&["1", "4"], &["2", "5"], &["3", "6"]]));
        assert_eq!(transpose(&cols), rows);
    }

    #[test]
    fn test_transpose_ragged_grid_pads() {
        let cols = transpose(&grid(&[&["1", "2"], &["3"]]));
        assert_eq!(cols, grid(&[&["1", "3"], &["2", ""]]));

        let cols = transpose(&grid(&[&["1"], &["2", "3", "4"]]));
        assert_eq!(cols, grid(&[&["1", "2"], &["", "3"], &["", "4"]]));
        assert!(transpose(&[]).is_empty());
    }

    #[test]
    fn test_serialize_shape() {
        let json = serde_json::to_value(with_headers()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "headers": ["a", "b"],
                "rows": [["1", "2"], ["3", "4"]],
            })
        );
        let json = serde_json::to_value(Sheet::empty(false)).unwrap();
        assert!(json["headers"].is_null());
    }
}
