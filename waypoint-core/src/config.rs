//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/waypoint/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/waypoint/` (~/.config/waypoint/)
//! - State/Logs: `$XDG_STATE_HOME/waypoint/` (~/.local/state/waypoint/)

use crate::error::{Error, Result};
use crate::itinerary::{HotelPricing, Normalizer};
use crate::time::parse_offset;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// How timestamps are placed on the calendar
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Cost aggregation
    #[serde(default)]
    pub costs: CostConfig,

    /// Output formatting
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

/// Calendar placement of UTC timestamps
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleConfig {
    /// Viewer offset from UTC, e.g. "+02:00". Defaults to UTC.
    pub utc_offset: Option<String>,

    /// Use the host's current offset instead of `utc_offset`
    #[serde(default)]
    pub use_host_offset: bool,
}

impl ScheduleConfig {
    /// Build the normalizer these settings describe.
    pub fn normalizer(&self) -> Result<Normalizer> {
        if self.use_host_offset {
            return Ok(Normalizer::host_local());
        }
        match self.utc_offset.as_deref() {
            Some(raw) => parse_offset(raw).map(Normalizer::with_offset).ok_or_else(|| {
                Error::Config(format!(
                    "schedule.utc_offset must look like +HH:MM or -HH:MM, got {:?}",
                    raw
                ))
            }),
            None => Ok(Normalizer::utc()),
        }
    }
}

/// Cost aggregation settings
#[derive(Debug, Deserialize, Default, Clone, Copy)]
pub struct CostConfig {
    /// "per-night" (default) or "per-stay"
    #[serde(default)]
    pub hotel_pricing: HotelPricing,
}

/// Output formatting settings
#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
        }
    }
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate values serde cannot check on its own
    pub fn validate(&self) -> Result<()> {
        self.schedule.normalizer().map(|_| ())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/waypoint/config.toml` (~/.config/waypoint/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("waypoint").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/waypoint/` (~/.local/state/waypoint/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("waypoint")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.costs.hotel_pricing, HotelPricing::PerNight);
        assert_eq!(config.display.currency_symbol, "$");
        assert_eq!(config.schedule.normalizer().unwrap(), Normalizer::utc());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[logging]
level = "debug"

[schedule]
utc_offset = "+04:00"

[costs]
hotel_pricing = "per-stay"

[display]
currency_symbol = "€"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.costs.hotel_pricing, HotelPricing::PerStay);
        assert_eq!(config.display.currency_symbol, "€");
        let normalizer = config.schedule.normalizer().unwrap();
        assert_eq!(normalizer.offset().local_minus_utc(), 4 * 3600);
    }

    #[test]
    fn test_host_offset_wins_over_fixed_offset() {
        let config: Config =
            toml::from_str("[schedule]\nutc_offset = \"+04:00\"\nuse_host_offset = true\n")
                .unwrap();
        let normalizer = config.schedule.normalizer().unwrap();
        assert_eq!(normalizer.offset(), Normalizer::host_local().offset());
    }

    #[test]
    fn test_invalid_offset_rejected() {
        let config: Config = toml::from_str("[schedule]\nutc_offset = \"4 hours\"\n").unwrap();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_unknown_hotel_pricing_rejected() {
        let parsed: std::result::Result<Config, _> =
            toml::from_str("[costs]\nhotel_pricing = \"weekly\"\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[schedule]\nutc_offset = \"-05:00\"\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(
            config.schedule.normalizer().unwrap().offset().local_minus_utc(),
            -5 * 3600
        );

        std::fs::write(&path, "[schedule]\nutc_offset = \"nope\"\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
