//! Where a sheet comes from, and the URL that fetches it.
//!
//! Export:  {export_base}/spreadsheets/d/e/{id}/pub?output=csv
//! API:     {api_base}/v4/spreadsheets/{id}/values/{sheet}[!{range}]?key={key}

use gsheet_core::PayloadFormat;
use url::Url;

use crate::client::FetchError;

pub const EXPORT_BASE: &str = "https://docs.google.com";
pub const API_BASE: &str = "https://sheets.googleapis.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSource {
    /// Publish-to-web CSV export. `id` is the `2PACX-…` token from the
    /// publish URL.
    Export { id: String },
    /// Sheets API v4 `values.get`.
    Api {
        id: String,
        sheet: String,
        key: String,
        /// A1-notation range, e.g. `A1:G23`.
        range: Option<String>,
    },
}

impl SheetSource {
    pub fn export(id: impl Into<String>) -> Self {
        SheetSource::Export { id: id.into() }
    }

    pub fn api(id: impl Into<String>, sheet: impl Into<String>, key: impl Into<String>) -> Self {
        SheetSource::Api {
            id: id.into(),
            sheet: sheet.into(),
            key: key.into(),
            range: None,
        }
    }

    /// Restrict an API source to a cell range. Export sources always fetch
    /// the whole sheet, so this leaves them unchanged.
    pub fn with_range(self, range: impl Into<String>) -> Self {
        match self {
            SheetSource::Api { id, sheet, key, .. } => SheetSource::Api {
                id,
                sheet,
                key,
                range: Some(range.into()),
            },
            export => export,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            SheetSource::Export { id } | SheetSource::Api { id, .. } => id,
        }
    }

    pub fn format(&self) -> PayloadFormat {
        match self {
            SheetSource::Export { .. } => PayloadFormat::Csv,
            SheetSource::Api { .. } => PayloadFormat::Json,
        }
    }

    /// Short label for logs and messages. Never includes the API key.
    pub fn describe(&self) -> String {
        match self {
            SheetSource::Export { id } => format!("export {}", id),
            SheetSource::Api { id, sheet, range: Some(range), .. } => {
                format!("api {} {}!{}", id, sheet, range)
            }
            SheetSource::Api { id, sheet, range: None, .. } => format!("api {} {}", id, sheet),
        }
    }

    /// Build the request URL against `base` (scheme + host, optional port).
    pub fn url(&self, base: &str) -> Result<Url, FetchError> {
        self.validate()?;

        let mut url = Url::parse(base)
            .map_err(|e| FetchError::InvalidSource(format!("bad base URL '{}': {}", base, e)))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| FetchError::InvalidSource(format!("base URL '{}' cannot take a path", base)))?;
            segments.pop_if_empty();

            match self {
                SheetSource::Export { id } => {
                    segments.extend(["spreadsheets", "d", "e", id.as_str(), "pub"]);
                }
                SheetSource::Api { id, sheet, range, .. } => {
                    let target = match range {
                        Some(range) => format!("{}!{}", sheet, range),
                        None => sheet.clone(),
                    };
                    segments.extend(["v4", "spreadsheets", id.as_str(), "values", target.as_str()]);
                }
            }
        }

        match self {
            SheetSource::Export { .. } => {
                url.query_pairs_mut().append_pair("output", "csv");
            }
            SheetSource::Api { key, .. } => {
                url.query_pairs_mut().append_pair("key", key);
            }
        }

        Ok(url)
    }

    fn validate(&self) -> Result<(), FetchError> {
        if self.id().trim().is_empty() {
            return Err(FetchError::InvalidSource("spreadsheet id is empty".into()));
        }
        if let SheetSource::Api { sheet, key, range, .. } = self {
            if sheet.trim().is_empty() {
                return Err(FetchError::InvalidSource("sheet name is empty".into()));
            }
            if key.trim().is_empty() {
                return Err(FetchError::InvalidSource("API key is empty".into()));
            }
            if range.as_deref().is_some_and(|r| r.trim().is_empty()) {
                return Err(FetchError::InvalidSource("cell range is empty".into()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_url() {
        let url = SheetSource::export("2PACX-1vabc").url(EXPORT_BASE).unwrap();
        assert_eq!(
            url.as_str(),
            "https://docs.google.com/spreadsheets/d/e/2PACX-1vabc/pub?output=csv"
        );
    }

    #[test]
    fn test_api_url() {
        let url = SheetSource::api("1abc", "Stock", "AIzaKEY").url(API_BASE).unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/1abc/values/Stock?key=AIzaKEY"
        );
    }

    #[test]
    fn test_api_url_with_range() {
        let url = SheetSource::api("1abc", "Stock", "AIzaKEY")
            .with_range("A1:G23")
            .url(API_BASE)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/1abc/values/Stock!A1:G23?key=AIzaKEY"
        );
    }

    #[test]
    fn test_sheet_name_is_encoded() {
        let url = SheetSource::api("1abc", "Q1 Budget", "k").url(API_BASE).unwrap();
        assert!(url.as_str().contains("/values/Q1%20Budget?key=k"), "{}", url);
    }

    #[test]
    fn test_base_with_port_and_trailing_slash() {
        let url = SheetSource::export("abc").url("http://127.0.0.1:8080/").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/spreadsheets/d/e/abc/pub?output=csv");
    }

    #[test]
    fn test_range_ignored_for_export() {
        let source = SheetSource::export("abc").with_range("A1:B2");
        assert_eq!(source, SheetSource::export("abc"));
    }

    #[test]
    fn test_format_per_variant() {
        assert_eq!(SheetSource::export("a").format(), PayloadFormat::Csv);
        assert_eq!(SheetSource::api("a", "s", "k").format(), PayloadFormat::Json);
    }

    #[test]
    fn test_describe_hides_key() {
        let source = SheetSource::api("1abc", "Stock", "secret-key").with_range("A1:B2");
        let label = source.describe();
        assert_eq!(label, "api 1abc Stock!A1:B2");
        assert!(!label.contains("secret"));
    }

    #[test]
    fn test_empty_fields_rejected() {
        assert!(matches!(
            SheetSource::export("  ").url(EXPORT_BASE),
            Err(FetchError::InvalidSource(_))
        ));
        assert!(matches!(
            SheetSource::api("id", "", "k").url(API_BASE),
            Err(FetchError::InvalidSource(_))
        ));
        assert!(matches!(
            SheetSource::api("id", "s", "").url(API_BASE),
            Err(FetchError::InvalidSource(_))
        ));
    }

    #[test]
    fn test_bad_base_rejected() {
        let err = SheetSource::export("abc").url("not a url").unwrap_err();
        assert!(err.to_string().contains("bad base URL"));
    }
}
