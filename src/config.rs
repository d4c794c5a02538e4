//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then a TOML file, then
//! environment variables, then command-line overrides.

use crate::constants::{
    APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_ATTENDANCE_SHEET, DEFAULT_DATA_RANGE,
    DEFAULT_LOG_LEVEL, env,
};
use crate::error::{AttendanceError, Result};
use crate::store::RangeSpec;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where attendance rows live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory of the file-backed row store
    pub directory: PathBuf,

    /// Sheet holding attendance rows
    pub attendance_sheet: String,

    /// Unqualified A1 range of the data rows, e.g. "A2:I"
    pub data_range: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let directory = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME);
        Self {
            directory,
            attendance_sheet: DEFAULT_ATTENDANCE_SHEET.to_string(),
            data_range: DEFAULT_DATA_RANGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for this crate's log output (error, warn, info, debug, trace)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Default config file location (`<config dir>/raid-attendance/config.toml`)
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            AttendanceError::configuration("Could not determine user config directory")
        })?;
        Ok(config_dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load settings from a TOML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AttendanceError::configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            AttendanceError::configuration(format!(
                "Invalid config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Build configuration from every layer.
    ///
    /// An explicit `config_file` must exist; the default location is only
    /// used when present.
    pub fn load_layered(config_file: Option<&Path>, store_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Ok(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env_with(|key| std::env::var(key).ok());

        if let Some(directory) = store_dir {
            config.store.directory = directory;
        }

        config.validate()?;
        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Apply environment overrides using the given lookup
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(directory) = lookup(env::STORE_DIR) {
            self.store.directory = PathBuf::from(directory);
        }
        if let Some(sheet) = lookup(env::SHEET) {
            self.store.attendance_sheet = sheet;
        }
        if let Some(level) = lookup(env::LOG_LEVEL) {
            self.logging.level = level;
        }
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        if self.store.attendance_sheet.trim().is_empty() {
            return Err(AttendanceError::configuration(
                "Attendance sheet name cannot be empty",
            ));
        }

        self.data_range().map_err(|e| {
            AttendanceError::configuration(format!("Invalid data range: {}", e))
        })?;

        const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
        if !LEVELS.contains(&self.logging.level.as_str()) {
            return Err(AttendanceError::configuration(format!(
                "Unknown log level '{}': expected one of {}",
                self.logging.level,
                LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    /// Data range qualified with the attendance sheet
    pub fn data_range(&self) -> Result<RangeSpec> {
        RangeSpec::parse_in(&self.store.attendance_sheet, &self.store.data_range)
    }
}
