//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Landing page listing the pet-friendly city collections.
pub const DEFAULT_START_URL: &str = "https://www.ihg.com/explore/pet-friendly-hotels";

/// Application configuration with layered loading.
///
/// Fixed at process start and handed to each component at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// WebDriver endpoint (chromedriver, geckodriver, selenium grid)
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Upper bound for every DOM wait, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Pause after each page load or click, in milliseconds
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Random jitter added to the settle pause (0 to this value)
    #[serde(default = "default_settle_jitter_ms")]
    pub settle_jitter_ms: u64,

    /// Process only the first city
    #[serde(default)]
    pub run_one_only: bool,

    /// Replace stored records instead of keeping them
    #[serde(default)]
    pub overwrite: bool,

    /// Landing page for city enumeration
    #[serde(default = "default_start_url")]
    pub start_url: String,

    /// Output file locations
    #[serde(default)]
    pub output: OutputPaths,

    /// Output format for printed results
    #[serde(default)]
    pub format: OutputFormat,
}

/// Files written by the crawler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPaths {
    #[serde(default = "default_city_csv")]
    pub city_csv: PathBuf,

    #[serde(default = "default_hotel_json")]
    pub hotel_json: PathBuf,

    #[serde(default = "default_hotel_csv")]
    pub hotel_csv: PathBuf,
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_settle_ms() -> u64 {
    1500
}

fn default_settle_jitter_ms() -> u64 {
    500
}

fn default_start_url() -> String {
    DEFAULT_START_URL.to_string()
}

fn default_city_csv() -> PathBuf {
    PathBuf::from("ihg_city_urls.csv")
}

fn default_hotel_json() -> PathBuf {
    PathBuf::from("ihg_hotels_output.json")
}

fn default_hotel_csv() -> PathBuf {
    PathBuf::from("ihg_hotels_output.csv")
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            city_csv: default_city_csv(),
            hotel_json: default_hotel_json(),
            hotel_csv: default_hotel_csv(),
        }
    }
}

impl OutputPaths {
    /// Places the default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            city_csv: dir.join(default_city_csv()),
            hotel_json: dir.join(default_hotel_json()),
            hotel_csv: dir.join(default_hotel_csv()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            timeout_secs: default_timeout_secs(),
            settle_ms: default_settle_ms(),
            settle_jitter_ms: default_settle_jitter_ms(),
            run_one_only: false,
            overwrite: false,
            start_url: default_start_url(),
            output: OutputPaths::default(),
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait bound for DOM conditions.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("ihg-crawler").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides. Unparseable values are ignored.
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var("IHG_WEBDRIVER_URL") {
            if !url.trim().is_empty() {
                self.webdriver_url = url;
            }
        }

        if let Ok(headless) = std::env::var("IHG_HEADLESS") {
            if let Ok(h) = headless.parse() {
                self.headless = h;
            }
        }

        if let Ok(timeout) = std::env::var("IHG_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.timeout_secs = t;
            }
        }

        if let Ok(overwrite) = std::env::var("IHG_OVERWRITE") {
            if let Ok(o) = overwrite.parse() {
                self.overwrite = o;
            }
        }

        self
    }
}

/// Output format for printed results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
