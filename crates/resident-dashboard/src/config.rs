//! Configuration management for the resident dashboard.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::selector::MealBands;
use crate::storage::DEFAULT_MAX_VALUE_BYTES;
use crate::surface::Surface;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "resident-dashboard";

/// Default override database file name.
const DATABASE_FILE_NAME: &str = "local-storage.db";

/// Environment variable prefix.
const ENV_PREFIX: &str = "RESIDENT_DASHBOARD_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `RESIDENT_DASHBOARD_`, nested keys
///    joined with `__`, e.g. `RESIDENT_DASHBOARD_SOURCE__BASE`)
/// 2. TOML config file at `~/.config/resident-dashboard/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base document configuration.
    pub source: SourceConfig,
    /// Override store configuration.
    pub storage: StorageConfig,
    /// Surface timing configuration.
    pub display: DisplayConfig,
    /// Meal hint hour cutoffs.
    pub meal_hints: MealBands,
}

/// Where the base record comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// File path or `http(s)` URL of the base JSON document.
    pub base: String,
    /// Request timeout for remote documents, in seconds.
    pub timeout_secs: u64,
}

/// Override store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/resident-dashboard/local-storage.db`
    pub database_path: Option<PathBuf>,
    /// Largest override the store accepts, in bytes.
    pub max_override_bytes: usize,
}

/// Timers driving the display surfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Clock tick in milliseconds.
    pub clock_tick_ms: u64,
    /// Photo rotation interval of the photo-frame surface.
    pub frame_interval_ms: u64,
    /// Photo rotation interval of the hero surface.
    pub hero_interval_ms: u64,
    /// Photo rotation interval of the slideshow surface.
    pub slideshow_interval_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base: "data/dashboard.json".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Will be resolved to default at runtime
            max_override_bytes: DEFAULT_MAX_VALUE_BYTES,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            clock_tick_ms: 1_000,
            frame_interval_ms: 17_000,
            hero_interval_ms: 9_000,
            slideshow_interval_ms: 6_500,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.source.base.trim().is_empty() {
            return Err(invalid("source.base must not be empty"));
        }

        if self.source.timeout_secs == 0 {
            return Err(invalid("source.timeout_secs must be greater than 0"));
        }

        if self.storage.max_override_bytes == 0 {
            return Err(invalid("storage.max_override_bytes must be greater than 0"));
        }

        let timers = [
            ("clock_tick_ms", self.display.clock_tick_ms),
            ("frame_interval_ms", self.display.frame_interval_ms),
            ("hero_interval_ms", self.display.hero_interval_ms),
            ("slideshow_interval_ms", self.display.slideshow_interval_ms),
        ];
        for (name, value) in timers {
            if value == 0 {
                return Err(invalid(format!("display.{name} must be greater than 0")));
            }
        }

        let bands = self.meal_hints;
        if bands.dinner_from > bands.breakfast_from || bands.breakfast_from > 24 {
            return Err(invalid(format!(
                "meal_hints must satisfy dinner_from ({}) <= breakfast_from ({}) <= 24",
                bands.dinner_from, bands.breakfast_from
            )));
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_secs)
    }

    /// Get the clock tick as a Duration.
    #[must_use]
    pub fn clock_tick(&self) -> Duration {
        Duration::from_millis(self.display.clock_tick_ms)
    }

    /// Get the photo rotation interval for a surface.
    #[must_use]
    pub fn rotation_interval(&self, surface: Surface) -> Duration {
        let ms = match surface {
            Surface::Frame => self.display.frame_interval_ms,
            Surface::Hero => self.display.hero_interval_ms,
            Surface::Slideshow => self.display.slideshow_interval_ms,
        };
        Duration::from_millis(ms)
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::ConfigValidation {
        message: message.into(),
    }
}
