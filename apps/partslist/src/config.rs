//! # Application Configuration
//!
//! Where the data comes from, which page receives the table, and how it is
//! rendered.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PARTSLIST_DATA=https://example.com/data.json                       │
//! │     PARTSLIST_TAX_RATE=8.25                                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $PARTSLIST_CONFIG, or                                              │
//! │     ~/.config/partslist/partslist.toml (Linux)                         │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     data.json → index.html #computerPartsTable, 8.25%, html            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # partslist.toml
//! [data]
//! location = "data.json"        # path or http(s) URL
//!
//! [page]
//! path = "index.html"
//! region_id = "computerPartsTable"
//! output = "build/index.html"   # omit to write to stdout
//!
//! [tax]
//! rate_percent = 8.25
//!
//! [output]
//! format = "html"               # html | text | json
//! ```

use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use partslist_core::TaxRate;

use crate::error::ConfigError;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PARTSLIST_CONFIG";

// =============================================================================
// Output Format
// =============================================================================

/// How the table is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Markup injected into the host page's display region.
    #[default]
    Html,

    /// Fixed-width text table.
    Text,

    /// The table model as JSON.
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Html => write!(f, "html"),
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "html" => Ok(OutputFormat::Html),
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(ConfigError::InvalidValue {
                field: "output.format".to_string(),
                reason: format!("unknown format '{}'. Valid options: html, text, json", other),
            }),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// `[data]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    /// Path or http(s) URL of the line-item JSON file.
    #[serde(default = "default_data_location")]
    pub location: String,
}

fn default_data_location() -> String {
    "data.json".to_string()
}

impl Default for DataSettings {
    fn default() -> Self {
        DataSettings {
            location: default_data_location(),
        }
    }
}

/// `[page]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PageSettings {
    /// Host page containing the display region.
    #[serde(default = "default_page_path")]
    pub path: PathBuf,

    /// `id` of the display region element.
    #[serde(default = "default_region_id")]
    pub region_id: String,

    /// Where the result is written. `None` means stdout.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

fn default_page_path() -> PathBuf {
    PathBuf::from("index.html")
}

fn default_region_id() -> String {
    "computerPartsTable".to_string()
}

impl Default for PageSettings {
    fn default() -> Self {
        PageSettings {
            path: default_page_path(),
            region_id: default_region_id(),
            output: None,
        }
    }
}

/// `[tax]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxSettings {
    /// Percentage with at most two decimals, e.g. `"8.25"`.
    ///
    /// Accepts a TOML number or string.
    #[serde(default = "default_rate_percent", deserialize_with = "deserialize_rate")]
    pub rate_percent: String,
}

fn default_rate_percent() -> String {
    "8.25".to_string()
}

impl Default for TaxSettings {
    fn default() -> Self {
        TaxSettings {
            rate_percent: default_rate_percent(),
        }
    }
}

fn deserialize_rate<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RateValue {
        Number(f64),
        Text(String),
    }

    Ok(match RateValue::deserialize(deserializer)? {
        RateValue::Number(n) => n.to_string(),
        RateValue::Text(s) => s,
    })
}

/// `[output]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,
}

// =============================================================================
// App Config
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataSettings,

    #[serde(default)]
    pub page: PageSettings,

    #[serde(default)]
    pub tax: TaxSettings,

    #[serde(default)]
    pub output: OutputSettings,
}

impl AppConfig {
    /// Loads configuration from all sources.
    ///
    /// ## Loading Order
    /// 1. Start with defaults
    /// 2. Load from config file (if it exists)
    /// 3. Apply environment variable overrides
    /// 4. Validate
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::load`], with overrides read through `lookup`
    /// instead of the process environment.
    pub fn load_with<F>(config_path: Option<PathBuf>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(lookup);
        config.validate()?;

        Ok(config)
    }

    /// Loads using the path named by `PARTSLIST_CONFIG`, if set.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        Self::load(std::env::var_os(CONFIG_ENV).map(PathBuf::from))
    }

    /// Parses a TOML document. Missing sections keep their defaults.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.location.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "data.location".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        if self.page.region_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "page.region_id".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        self.tax_rate()?;
        Ok(())
    }

    /// The configured tax rate.
    pub fn tax_rate(&self) -> Result<TaxRate, ConfigError> {
        Ok(TaxRate::parse_percentage(&self.tax.rate_percent)?)
    }

    /// Applies overrides from a variable lookup.
    ///
    /// Unparseable values are ignored with a warning, except the tax rate,
    /// which `validate` rejects.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(location) = lookup("PARTSLIST_DATA") {
            debug!(location = %location, "Overriding data location from environment");
            self.data.location = location;
        }

        if let Some(path) = lookup("PARTSLIST_PAGE") {
            self.page.path = PathBuf::from(path);
        }

        if let Some(id) = lookup("PARTSLIST_REGION") {
            self.page.region_id = id;
        }

        if let Some(output) = lookup("PARTSLIST_OUTPUT") {
            self.page.output = if output.is_empty() || output == "-" {
                None
            } else {
                Some(PathBuf::from(output))
            };
        }

        if let Some(rate) = lookup("PARTSLIST_TAX_RATE") {
            debug!(rate = %rate, "Overriding tax rate from environment");
            self.tax.rate_percent = rate;
        }

        if let Some(format) = lookup("PARTSLIST_FORMAT") {
            match format.parse() {
                Ok(parsed) => self.output.format = parsed,
                Err(_) => warn!(format = %format, "Unknown output format in environment"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "partslist")
            .map(|dirs| dirs.config_dir().join("partslist.toml"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
