// gsheet CLI - fetch a published Google Sheet and print rows, columns, or cells

mod exit_codes;
mod load;
mod output;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use gsheet_client::FetchError;
use gsheet_config::{ConfigError, Settings, SourceKind};
use gsheet_core::SheetError;

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};
use load::{load_sheet, SourceArgs};
use output::{column_key, render_sheet, row_json, OutputFormat};

#[derive(Parser)]
#[command(name = "gsheet")]
#[command(about = "Fetch a published Google Sheet (CSV export or Sheets API) and query it")]
#[command(version)]
struct Cli {
    /// Config file (default: <config dir>/gsheet/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log more (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a sheet and print all of it
    #[command(after_help = "\
Examples:
  gsheet fetch --id 2PACX-1vQ... --headers
  gsheet fetch --id 1abc --sheet Stock --range A1:G23 --key $KEY -t json
  gsheet fetch --source budget -t html -o budget.html
  gsheet fetch --file export.csv --headers -t json")]
    Fetch {
        #[command(flatten)]
        src: SourceArgs,

        /// Output format
        #[arg(long, short = 't', value_enum, default_value = "csv")]
        to: OutputFormat,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Print one data row (0-based, header excluded)
    Row {
        index: usize,

        #[command(flatten)]
        src: SourceArgs,

        /// Print as JSON (object keyed by header when --headers)
        #[arg(long)]
        json: bool,
    },

    /// Print one column, one cell per line
    Col {
        /// Column position (0-based) or header name
        #[arg(id = "column_key", value_name = "KEY")]
        key: String,

        #[command(flatten)]
        src: SourceArgs,

        /// Print as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Print a single cell
    Cell {
        /// Column position (0-based) or header name
        column: String,

        /// Data row (0-based, header excluded)
        row: usize,

        #[command(flatten)]
        src: SourceArgs,
    },

    /// List the sources defined in the config file
    Sources {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = load_settings(cli.config.as_deref()).and_then(|settings| match cli.command {
        Commands::Fetch { src, to, output } => cmd_fetch(&settings, &src, to, output),
        Commands::Row { index, src, json } => cmd_row(&settings, &src, index, json),
        Commands::Col { key, src, json } => cmd_col(&settings, &src, &key, json),
        Commands::Cell { column, row, src } => cmd_cell(&settings, &src, &column, row),
        Commands::Sources { json } => cmd_sources(&settings, json),
    });

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn load_settings(path: Option<&std::path::Path>) -> Result<Settings, CliError> {
    let settings = match path {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::args(format!("config file not found: {}", path.display())));
            }
            Settings::load_from(path)?
        }
        None => Settings::load()?,
    };
    Ok(settings)
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<FetchError> for CliError {
    fn from(err: FetchError) -> Self {
        let hint = match &err {
            FetchError::Http(403, _) => Some("check the API key and that the sheet is shared".to_string()),
            FetchError::Http(404, _) => Some("check the spreadsheet id; export sources must be published to the web".to_string()),
            _ => None,
        };
        Self { code: exit_codes::fetch_exit_code(&err), message: err.to_string(), hint }
    }
}

impl From<SheetError> for CliError {
    fn from(err: SheetError) -> Self {
        let hint = match &err {
            SheetError::HeadersDisabled(_) => Some("pass --headers to look columns up by name".to_string()),
            _ => None,
        };
        Self { code: exit_codes::sheet_exit_code(&err), message: err.to_string(), hint }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self { code: exit_codes::config_exit_code(&err), message: err.to_string(), hint: None }
    }
}

// ============================================================================
// Output helpers
// ============================================================================

fn write_stdout(text: &str) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", text).map_err(|e| CliError::io(e.to_string()))
}

// ============================================================================
// fetch
// ============================================================================

fn cmd_fetch(
    settings: &Settings,
    src: &SourceArgs,
    to: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let sheet = load_sheet(src, settings)?;
    let text = render_sheet(&sheet, to).map_err(|e| CliError::io(e.to_string()))?;

    match output {
        Some(path) => {
            let mut contents = text;
            contents.push('\n');
            std::fs::write(&path, contents)
                .map_err(|e| CliError::io(format!("cannot write {}: {}", path.display(), e)))?;
            log::info!(
                "wrote {} rows x {} cols to {}",
                sheet.row_count(),
                sheet.col_count(),
                path.display(),
            );
            Ok(())
        }
        None => write_stdout(&text),
    }
}

// ============================================================================
// row / col / cell
// ============================================================================

fn cmd_row(settings: &Settings, src: &SourceArgs, index: usize, json: bool) -> Result<(), CliError> {
    let sheet = load_sheet(src, settings)?;
    let row = sheet.row(index)?;

    if json {
        write_stdout(&row_json(&sheet, &row).to_string())
    } else {
        write_stdout(&row.cells().join(","))
    }
}

fn cmd_col(settings: &Settings, src: &SourceArgs, key: &str, json: bool) -> Result<(), CliError> {
    let sheet = load_sheet(src, settings)?;
    let col = sheet.col(column_key(key, &sheet))?;

    if json {
        let text = serde_json::to_string(col).map_err(|e| CliError::io(e.to_string()))?;
        write_stdout(&text)
    } else {
        write_stdout(&col.join("\n"))
    }
}

fn cmd_cell(settings: &Settings, src: &SourceArgs, column: &str, row: usize) -> Result<(), CliError> {
    let sheet = load_sheet(src, settings)?;
    let cell = sheet.get(column_key(column, &sheet), row)?;
    write_stdout(cell)
}

// ============================================================================
// sources
// ============================================================================

fn cmd_sources(settings: &Settings, json: bool) -> Result<(), CliError> {
    if json {
        let entries: Vec<serde_json::Value> = settings
            .sources
            .iter()
            .map(|(name, source)| {
                serde_json::json!({
                    "name": name,
                    "kind": source.kind,
                    "id": source.id,
                    "sheet": source.sheet,
                    "range": source.range,
                    "has_header": source.has_header,
                })
            })
            .collect();
        let text = serde_json::to_string_pretty(&entries).map_err(|e| CliError::io(e.to_string()))?;
        return write_stdout(&text);
    }

    if settings.sources.is_empty() {
        eprintln!("no sources configured");
        return Ok(());
    }

    let lines: Vec<String> = settings
        .sources
        .iter()
        .map(|(name, source)| {
            let target = match (source.kind, &source.sheet, &source.range) {
                (SourceKind::Api, Some(sheet), Some(range)) => format!("api\t{}\t{}!{}", source.id, sheet, range),
                (SourceKind::Api, Some(sheet), None) => format!("api\t{}\t{}", source.id, sheet),
                (SourceKind::Api, None, _) => format!("api\t{}", source.id),
                (SourceKind::Export, _, _) => format!("export\t{}", source.id),
            };
            format!("{}\t{}", name, target)
        })
        .collect();
    write_stdout(&lines.join("\n"))
}
