//! Sheets HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required). One GET per load,
//! no retries. Any non-2xx status is a failure: the body is reported in the
//! error, never parsed as sheet data.

use std::time::Duration;

use gsheet_core::{parse, Sheet, SheetError};
use url::Url;

use crate::source::{SheetSource, API_BASE, EXPORT_BASE};

pub const USER_AGENT: &str = concat!("gsheet/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Longest slice of an error body kept in `FetchError::Http`.
const MAX_ERROR_BODY: usize = 512;

/// Error type for fetch + parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Source can't be turned into a request URL
    InvalidSource(String),
    /// Connection, TLS, timeout, or body read failure
    Network(String),
    /// Server answered with a non-success status
    Http(u16, String),
    /// Body isn't a usable CSV / value range payload
    Parse(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::InvalidSource(msg) => write!(f, "Invalid source: {}", msg),
            FetchError::Network(msg) => write!(f, "Network error: {}", msg),
            FetchError::Http(code, msg) if msg.is_empty() => write!(f, "HTTP {}", code),
            FetchError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            FetchError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<SheetError> for FetchError {
    fn from(err: SheetError) -> Self {
        match err {
            SheetError::Parse(msg) => FetchError::Parse(msg),
            other => FetchError::Parse(other.to_string()),
        }
    }
}

/// Settings for [`SheetClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub timeout: Duration,
    /// Scheme + host serving export CSV
    pub export_base: String,
    /// Scheme + host serving the Sheets API
    pub api_base: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            export_base: EXPORT_BASE.to_string(),
            api_base: API_BASE.to_string(),
        }
    }
}

/// Google Sheets client (blocking).
#[derive(Clone)]
pub struct SheetClient {
    http: reqwest::blocking::Client,
    export_base: String,
    api_base: String,
}

impl SheetClient {
    /// Client against the public Google endpoints.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_options(ClientOptions::default())
    }

    /// Client against other hosts (mirrors, test servers).
    pub fn with_base_urls(export_base: impl Into<String>, api_base: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_options(ClientOptions {
            export_base: export_base.into(),
            api_base: api_base.into(),
            ..ClientOptions::default()
        })
    }

    pub fn with_options(opts: ClientOptions) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(opts.timeout)
            .build()
            .map_err(|e| FetchError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            export_base: opts.export_base,
            api_base: opts.api_base,
        })
    }

    /// Request URL for `source` on this client's hosts.
    pub fn url_for(&self, source: &SheetSource) -> Result<Url, FetchError> {
        match source {
            SheetSource::Export { .. } => source.url(&self.export_base),
            SheetSource::Api { .. } => source.url(&self.api_base),
        }
    }

    /// GET the raw payload (CSV text or value range JSON).
    pub fn fetch_payload(&self, source: &SheetSource) -> Result<String, FetchError> {
        let url = self.url_for(source)?;
        log::info!("fetching {}", source.describe());

        // without_url(): API source URLs carry the key
        let response = self.http.get(url)
            .send()
            .map_err(|e| FetchError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_else(|e| {
                log::debug!("could not read HTTP {} body: {}", status.as_u16(), e.without_url());
                String::new()
            });
            log::warn!("{} returned HTTP {}", source.describe(), status.as_u16());
            return Err(FetchError::Http(status.as_u16(), truncate(body.trim(), MAX_ERROR_BODY)));
        }

        let body = response.text()
            .map_err(|e| FetchError::Network(format!("failed to read response body: {}", e.without_url())))?;
        log::debug!("{}: {} bytes", source.describe(), body.len());
        Ok(body)
    }

    /// Fetch and parse in one step.
    pub fn load(&self, source: &SheetSource, has_header: bool) -> Result<Sheet, FetchError> {
        let payload = self.fetch_payload(source)?;
        let sheet = parse(&payload, source.format(), has_header)?;
        log::info!(
            "loaded {}: {} rows x {} cols",
            source.describe(),
            sheet.row_count(),
            sheet.col_count(),
        );
        Ok(sheet)
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &text[..end])
}
