//! CLI Exit Code Registry
//!
//! Single source of truth for `gsheet` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error (unspecified)                          |
//! | 2    | Usage error (bad args, no source, missing API key)   |
//! | 3    | Network failure (connect, TLS, timeout)              |
//! | 4    | Upstream answered with a non-2xx status              |
//! | 5    | Payload could not be parsed                          |
//! | 6    | Lookup failed (row/column/header not found)          |
//! | 7    | Config file unreadable or invalid                    |

use gsheet_client::FetchError;
use gsheet_config::ConfigError;
use gsheet_core::SheetError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure (e.g. writing output).
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Connection refused, DNS, TLS, timeout, truncated body.
pub const EXIT_NETWORK: u8 = 3;

/// Non-2xx status from the export host or Sheets API.
pub const EXIT_HTTP: u8 = 4;

/// Body is not CSV / value-range JSON (or lacks `values`).
pub const EXIT_PARSE: u8 = 5;

/// Row index, column index, or header name does not exist.
pub const EXIT_LOOKUP: u8 = 6;

/// Config file unreadable, malformed, or names an unknown source.
pub const EXIT_CONFIG: u8 = 7;

pub fn fetch_exit_code(err: &FetchError) -> u8 {
    match err {
        FetchError::InvalidSource(_) => EXIT_USAGE,
        FetchError::Network(_) => EXIT_NETWORK,
        FetchError::Http(..) => EXIT_HTTP,
        FetchError::Parse(_) => EXIT_PARSE,
    }
}

pub fn sheet_exit_code(err: &SheetError) -> u8 {
    if err.is_lookup() {
        EXIT_LOOKUP
    } else {
        EXIT_PARSE
    }
}

pub fn config_exit_code(_err: &ConfigError) -> u8 {
    EXIT_CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let codes = [
            EXIT_SUCCESS, EXIT_ERROR, EXIT_USAGE, EXIT_NETWORK,
            EXIT_HTTP, EXIT_PARSE, EXIT_LOOKUP, EXIT_CONFIG,
        ];
        let mut sorted = codes.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len());
    }

    #[test]
    fn test_fetch_mapping() {
        assert_eq!(fetch_exit_code(&FetchError::Network("x".into())), EXIT_NETWORK);
        assert_eq!(fetch_exit_code(&FetchError::Http(404, String::new())), EXIT_HTTP);
        assert_eq!(fetch_exit_code(&FetchError::Parse("x".into())), EXIT_PARSE);
        assert_eq!(fetch_exit_code(&FetchError::InvalidSource("x".into())), EXIT_USAGE);
    }

    #[test]
    fn test_sheet_mapping() {
        assert_eq!(sheet_exit_code(&SheetError::UnknownHeader("x".into())), EXIT_LOOKUP);
        assert_eq!(
            sheet_exit_code(&SheetError::RowOutOfRange { index: 3, len: 1 }),
            EXIT_LOOKUP
        );
        assert_eq!(sheet_exit_code(&SheetError::Parse("x".into())), EXIT_PARSE);
    }
}
