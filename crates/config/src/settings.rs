// gsheet settings
// Loaded from ~/.config/gsheet/config.toml

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ConfigError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpSettings {
    /// Request timeout in seconds (must be > 0)
    pub timeout_secs: u64,

    /// Override for the export host (default: https://docs.google.com)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_base: Option<String>,

    /// Override for the Sheets API host (default: https://sheets.googleapis.com)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            export_base: None,
            api_base: None,
        }
    }
}

/// Which endpoint a named source uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Publish-to-web CSV export
    Export,
    /// Sheets API v4 values
    Api,
}

/// A named sheet under `[sources.<name>]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub id: String,

    /// Tab name (api only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,

    /// API key (api only). `--key` overrides it; when absent the CLI falls back to GSHEET_API_KEY.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// A1 range (api only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,

    #[serde(default)]
    pub has_header: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub http: HttpSettings,
    pub sources: BTreeMap<String, SourceConfig>,
}

impl Settings {
    /// Default config file location, if the platform has a config dir.
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|c| c.join("gsheet").join("config.toml"))
    }

    /// Load from the default location. A missing file means defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from an explicit path. A missing file means defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        let settings = Self::from_toml(&contents)?;
        log::debug!(
            "loaded {} ({} sources)",
            path.display(),
            settings.sources.len()
        );
        Ok(settings)
    }

    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let settings: Settings =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Validation("http.timeout_secs must be > 0".into()));
        }

        for (name, source) in &self.sources {
            if source.id.trim().is_empty() {
                return Err(ConfigError::Validation(format!("source '{}': id is empty", name)));
            }
            match source.kind {
                SourceKind::Api => {
                    if source.sheet.as_deref().map_or(true, |s| s.trim().is_empty()) {
                        return Err(ConfigError::Validation(format!(
                            "source '{}': kind = \"api\" requires sheet",
                            name
                        )));
                    }
                }
                SourceKind::Export => {
                    // sheet/key/range have no meaning for an export URL
                    if source.sheet.is_some() || source.key.is_some() || source.range.is_some() {
                        return Err(ConfigError::Validation(format!(
                            "source '{}': sheet, key and range only apply to kind = \"api\"",
                            name
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    pub fn source(&self, name: &str) -> Result<&SourceConfig, ConfigError> {
        self.sources
            .get(name)
            .ok_or_else(|| ConfigError::UnknownSource(name.to_string()))
    }
}
