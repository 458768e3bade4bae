//! `gsheet-core`: in-memory model of a published spreadsheet.
//!
//! Pure crate: takes a payload string, returns an immutable [`Sheet`].
//! No network or file IO. Fetching lives in `gsheet-client`.

pub mod error;
pub mod headers;
pub mod parse;
pub mod render;
pub mod sheet;

pub use error::SheetError;
pub use headers::{ColumnKey, Headers};
pub use parse::{parse, parse_csv, parse_values_json, PayloadFormat};
pub use render::{render_html, TableLayout};
pub use sheet::{transpose, Row, Sheet};
