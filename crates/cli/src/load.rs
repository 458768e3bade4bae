//! Turning CLI source flags into a loaded `Sheet`.
//!
//! Precedence: `--file` (local payload), `--source NAME` (config), then
//! `--id` with or without `--sheet`. API keys resolve flag > config > env.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, ValueEnum};

use gsheet_client::{ClientOptions, SheetClient, SheetSource, API_BASE, EXPORT_BASE};
use gsheet_config::{Settings, SourceConfig, SourceKind};
use gsheet_core::{parse, PayloadFormat, Sheet};

use crate::exit_codes;
use crate::CliError;

pub const API_KEY_ENV: &str = "GSHEET_API_KEY";

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PayloadArg {
    Csv,
    Json,
}

impl From<PayloadArg> for PayloadFormat {
    fn from(arg: PayloadArg) -> Self {
        match arg {
            PayloadArg::Csv => PayloadFormat::Csv,
            PayloadArg::Json => PayloadFormat::Json,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Named source from the config file
    #[arg(long, short = 's', value_name = "NAME", conflicts_with_all = ["id", "file"])]
    pub source: Option<String>,

    /// Spreadsheet id: the export id, or the API spreadsheet id with --sheet
    #[arg(long, conflicts_with = "file")]
    pub id: Option<String>,

    /// Sheet/tab name (switches to the Sheets API)
    #[arg(long, requires = "id")]
    pub sheet: Option<String>,

    /// A1 range for the Sheets API, e.g. A1:G23
    #[arg(long, conflicts_with = "file")]
    pub range: Option<String>,

    /// Sheets API key (falls back to the config, then GSHEET_API_KEY)
    #[arg(long, value_name = "KEY", conflicts_with = "file")]
    pub key: Option<String>,

    /// Parse a local payload instead of fetching
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Payload format for --file (default: json for *.json, else csv)
    #[arg(long, requires = "file")]
    pub payload: Option<PayloadArg>,

    /// First row holds column names
    #[arg(long)]
    pub headers: bool,
}

pub fn load_sheet(args: &SourceArgs, settings: &Settings) -> Result<Sheet, CliError> {
    if let Some(path) = &args.file {
        return load_file(path, args.payload, args.headers);
    }

    let (source, has_header) = resolve_source(args, settings)?;
    let client = build_client(settings)?;
    Ok(client.load(&source, has_header)?)
}

fn load_file(path: &Path, payload: Option<PayloadArg>, has_header: bool) -> Result<Sheet, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::args(format!("cannot read {}: {}", path.display(), e)))?;

    let format = match payload {
        Some(arg) => arg.into(),
        None if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) => PayloadFormat::Json,
        None => PayloadFormat::Csv,
    };

    log::debug!("parsing {} as {:?}", path.display(), format);
    Ok(parse(&text, format, has_header)?)
}

/// Pick the sheet source and effective header mode from flags + config.
pub fn resolve_source(args: &SourceArgs, settings: &Settings) -> Result<(SheetSource, bool), CliError> {
    if let Some(name) = &args.source {
        let config = settings.source(name)?;
        let source = source_from_config(config, args)?;
        return Ok((source, args.headers || config.has_header));
    }

    let Some(id) = &args.id else {
        return Err(CliError::args("no source given")
            .with_hint("use --source NAME, --id ID [--sheet NAME], or --file PATH"));
    };

    let source = match &args.sheet {
        Some(sheet) => {
            let key = resolve_api_key(args.key.clone())?;
            api_source(id, sheet, key, args.range.as_deref())
        }
        None => {
            if args.range.is_some() {
                return Err(CliError::args("--range requires --sheet (export URLs cannot select a range)"));
            }
            SheetSource::export(id.as_str())
        }
    };

    Ok((source, args.headers))
}

fn source_from_config(config: &SourceConfig, args: &SourceArgs) -> Result<SheetSource, CliError> {
    match config.kind {
        SourceKind::Export => Ok(SheetSource::export(config.id.as_str())),
        SourceKind::Api => {
            let sheet = config.sheet.as_deref().unwrap_or_default();
            let key = resolve_api_key(args.key.clone().or_else(|| config.key.clone()))?;
            let range = args.range.as_deref().or(config.range.as_deref());
            Ok(api_source(&config.id, sheet, key, range))
        }
    }
}

fn api_source(id: &str, sheet: &str, key: String, range: Option<&str>) -> SheetSource {
    let source = SheetSource::api(id, sheet, key);
    match range {
        Some(range) => source.with_range(range),
        None => source,
    }
}

/// Resolve the API key: explicit value > `GSHEET_API_KEY` > error.
pub fn resolve_api_key(explicit: Option<String>) -> Result<String, CliError> {
    if let Some(key) = explicit {
        let key = key.trim().to_string();
        if key.is_empty() {
            return Err(CliError::args("API key is empty"));
        }
        return Ok(key);
    }

    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(CliError::args("missing Sheets API key")
            .with_hint(format!("pass --key, set key in the config source, or export {}", API_KEY_ENV))),
    }
}

pub fn build_client(settings: &Settings) -> Result<SheetClient, CliError> {
    let http = &settings.http;
    let opts = ClientOptions {
        timeout: Duration::from_secs(http.timeout_secs),
        export_base: http.export_base.clone().unwrap_or_else(|| EXPORT_BASE.to_string()),
        api_base: http.api_base.clone().unwrap_or_else(|| API_BASE.to_string()),
    };
    SheetClient::with_options(opts).map_err(|e| CliError {
        code: exit_codes::EXIT_ERROR,
        message: e.to_string(),
        hint: None,
    })
}
