//! Configuration management for cmdcomplete
//!
//! Configuration is read from a TOML file and can be overridden from the
//! command line. Precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Configuration file
//! 3. Default values
//!
//! ```toml
//! [engine]
//! generic_options = ["-h", "--help", "-V", "--version"]
//! hide_exact_match = false
//! max_candidates = 50
//!
//! [logging]
//! level = "warn"
//! timestamps = false
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Completion engine tunables
    #[serde(default)]
    pub engine: EngineConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Completion engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Aliases still offered when the command line stops matching the grammar
    #[serde(default = "default_generic_options")]
    pub generic_options: Vec<String>,

    /// Drop a candidate that is exactly the text already typed
    #[serde(default)]
    pub hide_exact_match: bool,

    /// Upper bound on returned candidates (None for unlimited)
    #[serde(default)]
    pub max_candidates: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_generic_options() -> Vec<String> {
    ["-h", "--help", "-V", "--version"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    false
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            generic_options: default_generic_options(),
            hide_exact_match: false,
            max_candidates: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }

    /// Load the explicit file if given, otherwise the default file if it exists
    ///
    /// A missing default file is not an error; defaults are used instead.
    pub fn load_from_file(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Self::default_path();
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cmdcomplete")
            .join("config.toml")
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.max_candidates == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "engine.max_candidates".to_string(),
                value: "0".to_string(),
            });
        }

        if let Some(alias) = self
            .engine
            .generic_options
            .iter()
            .find(|alias| alias.trim().is_empty())
        {
            return Err(ConfigError::InvalidValue {
                field: "engine.generic_options".to_string(),
                value: format!("{alias:?}"),
            });
        }

        Ok(())
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
