//! Google Sheets fetch client, shared by the CLI and library users.
//!
//! Builds export / Sheets API URLs, performs the GET, and parses the body
//! with `gsheet-core`. No auth flow, no retries, no pagination.

mod client;
mod loader;
mod source;

pub use client::{ClientOptions, FetchError, SheetClient, DEFAULT_TIMEOUT_SECS, USER_AGENT};
pub use loader::{LoadHandle, LoadOptions, SheetLoader};
pub use source::{SheetSource, API_BASE, EXPORT_BASE};

pub use gsheet_core::{ColumnKey, Row, Sheet, SheetError};
