use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use tracing::warn;

use simflow_core::flow::DEFAULT_BASE_URL;
use simflow_core::query::QueryOptions;

/// Command line arguments
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "SIM card data-usage viewer")]
pub struct Config {
    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base URL of the flow service
    #[arg(long)]
    pub base_url: Option<String>,

    /// Query this card on start instead of the remembered one
    #[arg(long)]
    pub card: Option<String>,

    /// Keep the card entry form visible after a successful query
    #[arg(long)]
    pub always_show_form: bool,

    /// Do not remember the card number between sessions
    #[arg(long)]
    pub no_persist: bool,

    /// Write logs to this file instead of the cache directory
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Log file location: explicit flag or `<cache_dir>/simflow/simflow.log`
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| dirs::cache_dir().map(|p| p.join("simflow").join("simflow.log")))
    }
}

/// Application settings (from config file)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Flow service settings
    #[serde(default)]
    pub api: ApiSettings,

    /// UI settings
    #[serde(default)]
    pub ui: UiSettings,

    /// Card number persistence settings
    #[serde(default)]
    pub store: StoreSettings,
}

/// Flow service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Scheme and host of the flow service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout for each request in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// UI-related settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    /// Hide the card entry form once a record is loaded
    #[serde(default = "default_auto_hide_form")]
    pub auto_hide_form: bool,

    /// Gauge diameter in terminal rows (width is doubled)
    #[serde(default = "default_gauge_size")]
    pub gauge_size: u16,

    /// Liquid color (name or `#rrggbb`)
    #[serde(default = "default_fill_color")]
    pub fill_color: String,

    /// Empty gauge color (name or `#rrggbb`)
    #[serde(default = "default_background_color")]
    pub background_color: String,

    /// Delay between sheen animation steps in milliseconds
    #[serde(default = "default_sheen_interval")]
    pub sheen_interval_ms: u64,
}

fn default_auto_hide_form() -> bool {
    true
}

fn default_gauge_size() -> u16 {
    12
}

fn default_fill_color() -> String {
    "#3b82f6".to_string()
}

fn default_background_color() -> String {
    "#f1f5f9".to_string()
}

fn default_sheen_interval() -> u64 {
    120
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            auto_hide_form: default_auto_hide_form(),
            gauge_size: default_gauge_size(),
            fill_color: default_fill_color(),
            background_color: default_background_color(),
            sheen_interval_ms: default_sheen_interval(),
        }
    }
}

impl UiSettings {
    /// Parsed liquid color
    pub fn fill_color(&self) -> Color {
        parse_color(&self.fill_color).unwrap_or(Color::Rgb(0x3b, 0x82, 0xf6))
    }

    /// Parsed background color
    pub fn background_color(&self) -> Color {
        parse_color(&self.background_color).unwrap_or(Color::Rgb(0xf1, 0xf5, 0xf9))
    }
}

fn parse_color(value: &str) -> Option<Color> {
    Color::from_str(value.trim()).ok()
}

/// Card number persistence settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Override for the store file (default: `<data_dir>/simflow/store.json`)
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Keep the card number in memory only
    #[serde(default)]
    pub disabled: bool,
}

impl Settings {
    /// Load settings from config file or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        // Try custom path first
        if let Some(p) = path {
            if p.exists() {
                return Self::load_file(p);
            }
            warn!("Config file {:?} not found, falling back to defaults", p);
        }

        // Try default config locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("simflow/config.toml")),
            dirs::home_dir().map(|p| p.join(".config/simflow/config.toml")),
            dirs::home_dir().map(|p| p.join(".simflow.toml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                return Self::load_file(path);
            }
        }

        // Return defaults if no config file found
        Ok(Self::default())
    }

    fn load_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Merge CLI config into settings (CLI takes precedence)
    pub fn merge_cli(&mut self, cli: &Config) {
        if let Some(base_url) = &cli.base_url {
            self.api.base_url = base_url.clone();
        }
        if cli.always_show_form {
            self.ui.auto_hide_form = false;
        }
        if cli.no_persist {
            self.store.disabled = true;
        }
    }

    /// Validate and normalize settings values
    pub fn validate(&mut self) {
        const MIN_TIMEOUT_SECS: u64 = 1;
        const MIN_SHEEN_INTERVAL_MS: u64 = 30;
        const GAUGE_SIZE_RANGE: (u16, u16) = (4, 40);

        let trimmed = self.api.base_url.trim().trim_end_matches('/');
        self.api.base_url = if trimmed.is_empty() {
            default_base_url()
        } else {
            trimmed.to_string()
        };

        if self.api.timeout_secs < MIN_TIMEOUT_SECS {
            self.api.timeout_secs = MIN_TIMEOUT_SECS;
        }
        if self.ui.sheen_interval_ms < MIN_SHEEN_INTERVAL_MS {
            self.ui.sheen_interval_ms = MIN_SHEEN_INTERVAL_MS;
        }
        self.ui.gauge_size = self
            .ui
            .gauge_size
            .clamp(GAUGE_SIZE_RANGE.0, GAUGE_SIZE_RANGE.1);

        if parse_color(&self.ui.fill_color).is_none() {
            warn!("Invalid fill_color {:?}, using default", self.ui.fill_color);
            self.ui.fill_color = default_fill_color();
        }
        if parse_color(&self.ui.background_color).is_none() {
            warn!(
                "Invalid background_color {:?}, using default",
                self.ui.background_color
            );
            self.ui.background_color = default_background_color();
        }
    }

    /// Query behavior derived from the UI settings
    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            auto_hide_form: self.ui.auto_hide_form,
        }
    }
}
