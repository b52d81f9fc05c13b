//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::data::{DisplayNames, MeasurementColumns, MonthLabel, SourcePaths, TransformOptions};
use chrono::Month;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub transform: TransformConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Data source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Project data directory (CSV dataset, and the database unless overridden)
    #[serde(default = "default_data_dir")]
    pub dir: String,

    /// Shared directory holding the database, if it lives elsewhere
    #[serde(default)]
    pub database_dir: Option<String>,

    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_csv_file")]
    pub csv_file: String,

    #[serde(default = "default_measurement_table")]
    pub measurement_table: String,
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_database() -> String {
    "hawaii.sqlite".to_string()
}

fn default_csv_file() -> String {
    "playoff_teams_df.csv".to_string()
}

fn default_measurement_table() -> String {
    "measurement".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            database_dir: None,
            database: default_database(),
            csv_file: default_csv_file(),
            measurement_table: default_measurement_table(),
        }
    }
}

impl DataConfig {
    /// Resolve the pipeline's source paths
    pub fn source_paths(&self) -> SourcePaths {
        let database_dir = self.database_dir.as_deref().unwrap_or(&self.dir);
        SourcePaths {
            database: Path::new(database_dir).join(&self.database),
            csv_dir: PathBuf::from(&self.dir),
            csv_file: self.csv_file.clone(),
        }
    }
}

/// Measurement transform configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TransformConfig {
    /// Exactly two month names or abbreviations, in output order
    #[serde(default = "default_months")]
    pub months: Vec<String>,

    #[serde(default)]
    pub month_label: MonthLabel,

    #[serde(default)]
    pub columns: MeasurementColumns,

    #[serde(default)]
    pub display: DisplayNames,
}

fn default_months() -> Vec<String> {
    vec!["June".to_string(), "December".to_string()]
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            months: default_months(),
            month_label: MonthLabel::default(),
            columns: MeasurementColumns::default(),
            display: DisplayNames::default(),
        }
    }
}

impl TransformConfig {
    /// Validate and convert into transform options
    pub fn to_options(&self) -> Result<TransformOptions, ConfigError> {
        let months = self
            .months
            .iter()
            .map(|name| {
                name.trim()
                    .parse::<Month>()
                    .map_err(|_| ConfigError::Invalid(format!("unknown month `{}`", name)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let months: [Month; 2] = months.try_into().map_err(|m: Vec<Month>| {
            ConfigError::Invalid(format!(
                "transform.months needs exactly two months, got {}",
                m.len()
            ))
        })?;

        if months[0] == months[1] {
            return Err(ConfigError::Invalid(format!(
                "transform.months must be two different months, got {} twice",
                months[0].name()
            )));
        }

        Ok(TransformOptions {
            months,
            month_label: self.month_label,
            columns: self.columns.clone(),
            display: self.display.clone(),
        })
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })?;

        // Catch bad month settings at load time rather than on first transform
        config.transform.to_options()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("climate-dash").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("CLIMATE_DASH_DATA_DIR") {
            self.data.dir = dir;
        }
        if let Ok(dir) = std::env::var("CLIMATE_DASH_DATABASE_DIR") {
            self.data.database_dir = Some(dir);
        }

        if let Ok(level) = std::env::var("CLIMATE_DASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("CLIMATE_DASH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Climate Dash Configuration
#
# Environment variables override these settings:
# - CLIMATE_DASH_DATA_DIR
# - CLIMATE_DASH_DATABASE_DIR
# - CLIMATE_DASH_LOG_LEVEL
# - CLIMATE_DASH_LOG_FORMAT

[data]
# Directory holding the CSV dataset (and the database, unless database_dir is set)
dir = "./data"

# Shared directory holding the database
# database_dir = "/mnt/shared/data"

# SQLite database file name
database = "hawaii.sqlite"

# CSV dataset file name
csv_file = "playoff_teams_df.csv"

# Table holding the weather observations
measurement_table = "measurement"

[transform]
# Exactly two months (names or abbreviations), in output order
months = ["June", "December"]

# Month labels in the output: abbreviated (Jun) or full (June)
month_label = "abbreviated"

[transform.columns]
# Source column names
date = "date"
station = "station"
precipitation = "prcp"
temperature = "tobs"

[transform.display]
# Output column titles
month = "Month"
day = "Day"
precipitation = "Precipitation"
temperature = "Temperature"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = Config::from_toml(&generate_default_config()).unwrap();

        assert_eq!(config.data.database, "hawaii.sqlite");
        assert_eq!(config.data.database_dir, None);
        assert_eq!(config.transform.columns.temperature, "tobs");
        assert_eq!(config.logging.format, "pretty");

        let options = config.transform.to_options().unwrap();
        assert_eq!(options, TransformOptions::default());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.data.dir, "./data");
        assert_eq!(config.transform.months, vec!["June", "December"]);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml(
            r#"
            [transform]
            months = ["jul", "Jan"]
            month_label = "full"

            [transform.display]
            temperature = "Temp (F)"
            "#,
        )
        .unwrap();

        let options = config.transform.to_options().unwrap();
        assert_eq!(options.months, [Month::July, Month::January]);
        assert_eq!(options.month_labels(), vec!["July", "January"]);
        assert_eq!(options.display.temperature, "Temp (F)");
        assert_eq!(options.display.month, "Month");
    }

    #[test]
    fn test_invalid_months() {
        let err = Config::from_toml("[transform]\nmonths = [\"June\"]").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = Config::from_toml("[transform]\nmonths = [\"June\", \"Smarch\"]").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = Config::from_toml("[transform]\nmonths = [\"June\", \"jun\"]").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_bad_toml() {
        let err = Config::from_toml("[data\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_source_paths() {
        let mut data = DataConfig::default();
        let paths = data.source_paths();
        assert_eq!(paths.database, PathBuf::from("./data/hawaii.sqlite"));
        assert_eq!(paths.csv_dir, PathBuf::from("./data"));

        data.database_dir = Some("/mnt/shared".to_string());
        let paths = data.source_paths();
        assert_eq!(paths.database, PathBuf::from("/mnt/shared/hawaii.sqlite"));
        assert_eq!(paths.csv_dir, PathBuf::from("./data"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[data]\ncsv_file = \"teams.csv\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.data.csv_file, "teams.csv");

        let missing = Config::load(&dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
