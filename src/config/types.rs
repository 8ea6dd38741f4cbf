//! Configuration types.
//!
//! This module defines the logging enums shared with the CLI and the
//! environment-backed [`Config`] read once at startup.

use std::env;
use std::str::FromStr;

use clap::ValueEnum;

use crate::config::constants::{
    BATCH_SIZE_ENV_VAR, DEFAULT_BATCH_SIZE, LOG_FORMAT_ENV_VAR, LOG_LEVEL_ENV_VAR, MAX_BATCH_SIZE,
    TABLE_ENV_VAR,
};
use crate::error_handling::ConfigError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format, one object per line (CloudWatch friendly)
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

/// Runtime configuration for an importer.
///
/// Built once per process, either from the environment ([`Config::from_env`])
/// or programmatically.
///
/// # Examples
///
/// ```
/// use interesting_domains::Config;
///
/// let config = Config {
///     table_name: "interesting-domains".to_string(),
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Target table identifier
    pub table_name: String,

    /// Items per table write
    pub batch_size: usize,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_name: String::new(),
            batch_size: DEFAULT_BATCH_SIZE,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl Config {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingTable` if `INTERESTING_DOMAINS_TABLE` is unset
    /// or blank, and `ConfigError::Invalid` if an optional setting cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let table_name = lookup(TABLE_ENV_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingTable(TABLE_ENV_VAR))?;

        let mut config = Config {
            table_name,
            ..Default::default()
        };

        if let Some(raw) = lookup(BATCH_SIZE_ENV_VAR) {
            config.batch_size = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: BATCH_SIZE_ENV_VAR,
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = lookup(LOG_LEVEL_ENV_VAR) {
            config.log_level = raw.parse().map_err(|_| ConfigError::Invalid {
                name: LOG_LEVEL_ENV_VAR,
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = lookup(LOG_FORMAT_ENV_VAR) {
            config.log_format = raw.parse().map_err(|_| ConfigError::Invalid {
                name: LOG_FORMAT_ENV_VAR,
                value: raw.clone(),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks invariants that the type system does not enforce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table_name.trim().is_empty() {
            return Err(ConfigError::MissingTable(TABLE_ENV_VAR));
        }
        validate_batch_size(self.batch_size)
    }
}

/// Checks that `batch_size` is within `1..=MAX_BATCH_SIZE`.
pub fn validate_batch_size(batch_size: usize) -> Result<(), ConfigError> {
    if batch_size == 0 || batch_size > MAX_BATCH_SIZE {
        return Err(ConfigError::BatchSizeOutOfRange(batch_size));
    }
    Ok(())
}
