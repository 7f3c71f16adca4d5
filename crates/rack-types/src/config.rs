//! Configuration loading for newsrack.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at ~/.config/newsrack/config.toml.

use config::{Config, Environment, File};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::RackError;

/// Search behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Minimum number of characters (after trimming) a query must have.
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,

    /// Memory budget for the index writer in MB.
    #[serde(default = "default_writer_memory_mb")]
    pub writer_memory_mb: usize,

    /// Restore the baseline view when a query has no matches.
    /// Off by default: a no-match query hides everything until the field is cleared.
    #[serde(default)]
    pub reset_on_no_results: bool,
}

fn default_min_query_chars() -> usize {
    3
}

fn default_writer_memory_mb() -> usize {
    50
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            min_query_chars: default_min_query_chars(),
            writer_memory_mb: default_writer_memory_mb(),
            reset_on_no_results: false,
        }
    }
}

impl SearchSettings {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_query_chars == 0 {
            return Err("min_query_chars must be > 0".to_string());
        }
        if self.writer_memory_mb < 15 {
            return Err(format!(
                "writer_memory_mb must be >= 15, got {}",
                self.writer_memory_mb
            ));
        }
        Ok(())
    }
}

/// Date rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSettings {
    /// Whether the locale-aware relative formatter may be used.
    /// When false the manual English fallback renders every label.
    #[serde(default = "default_locale_formatting")]
    pub locale_formatting: bool,

    /// Fixed UTC offset (minutes) for absolute dates. None uses the local zone.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

fn default_locale_formatting() -> bool {
    true
}

impl Default for TimeSettings {
    fn default() -> Self {
        Self {
            locale_formatting: default_locale_formatting(),
            utc_offset_minutes: None,
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Path to the directory JSON file
    #[serde(default = "default_directory_path")]
    pub directory_path: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Search settings
    #[serde(default)]
    pub search: SearchSettings,

    /// Date rendering settings
    #[serde(default)]
    pub time: TimeSettings,
}

fn default_directory_path() -> String {
    ProjectDirs::from("", "", "newsrack")
        .map(|p| p.data_local_dir().join("directory.json"))
        .unwrap_or_else(|| PathBuf::from("./directory.json"))
        .to_string_lossy()
        .to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            directory_path: default_directory_path(),
            log_level: default_log_level(),
            search: SearchSettings::default(),
            time: TimeSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/newsrack/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (NEWSRACK_*, nested keys joined with `__`)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, RackError> {
        let config_dir = ProjectDirs::from("", "", "newsrack")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("directory_path", default_directory_path())
            .map_err(|e| RackError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| RackError::Config(e.to_string()))?
            .set_default("search.min_query_chars", default_min_query_chars() as i64)
            .map_err(|e| RackError::Config(e.to_string()))?
            .set_default("search.writer_memory_mb", default_writer_memory_mb() as i64)
            .map_err(|e| RackError::Config(e.to_string()))?
            .set_default("search.reset_on_no_results", false)
            .map_err(|e| RackError::Config(e.to_string()))?
            .set_default("time.locale_formatting", default_locale_formatting())
            .map_err(|e| RackError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: NEWSRACK_LOG_LEVEL, NEWSRACK_SEARCH__MIN_QUERY_CHARS, etc.
        builder = builder.add_source(
            Environment::with_prefix("NEWSRACK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| RackError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| RackError::Config(e.to_string()))?;

        settings.search.validate().map_err(RackError::Config)?;
        Ok(settings)
    }

    /// Expand ~ in directory_path to the home directory
    pub fn expanded_directory_path(&self) -> PathBuf {
        if let Some(rest) = self.directory_path.strip_prefix("~/") {
            if let Some(base) = BaseDirs::new() {
                return base.home_dir().join(rest);
            }
        }
        PathBuf::from(&self.directory_path)
    }
}
