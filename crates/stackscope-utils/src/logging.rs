//! # Logging Utilities
//!
//! Logging setup for stackscope consumers, built on `tracing`.
//!
//! The core crate only emits events (`tracing::debug!` when the stack
//! heuristic is inapplicable, `tracing::trace!` for every scanned word). This
//! module installs a subscriber that decides where those events end up.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stackscope_utils::init_logging;
//!
//! // Reads RUST_LOG, STACKSCOPE_LOG_FORMAT and STACKSCOPE_LOG_FILE
//! init_logging().expect("Failed to initialize logging");
//!
//! tracing::info!("session started");
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: log level filter (e.g. `RUST_LOG=debug`, `RUST_LOG=stackscope_core=trace`)
//! - `STACKSCOPE_LOG_FORMAT`: output format (`json` or `pretty`, default: `pretty`)
//! - `STACKSCOPE_LOG_FILE`: optional path to a log file (console only when unset)

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, io};

use chrono::Utc;
use tracing::Level;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Environment variable selecting the output format.
pub const LOG_FORMAT_ENV: &str = "STACKSCOPE_LOG_FORMAT";

/// Environment variable naming an optional log file.
pub const LOG_FILE_ENV: &str = "STACKSCOPE_LOG_FILE";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat
{
    /// Pretty-printed, human-readable format (default for development)
    Pretty,
    /// JSON format (default for production)
    Json,
}

impl FromStr for LogFormat
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "dev" | "development" => Ok(LogFormat::Pretty),
            "json" | "prod" | "production" => Ok(LogFormat::Json),
            _ => Err(LoggingError::InvalidFormat(s.to_string())),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel
{
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    Info,
    /// Debug level
    Debug,
    /// Trace level (every scanned stack word)
    Trace,
}

impl From<LogLevel> for Level
{
    fn from(level: LogLevel) -> Self
    {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(LoggingError::InvalidLevel(s.to_string())),
        }
    }
}

/// Logging configuration resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig
{
    /// Output format.
    pub format: LogFormat,
    /// Level used when `RUST_LOG` holds no usable filter.
    pub default_level: LogLevel,
    /// Optional log file; console only when `None`.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig
{
    fn default() -> Self
    {
        Self {
            format: LogFormat::Pretty,
            default_level: LogLevel::Info,
            file: None,
        }
    }
}

impl LogConfig
{
    /// Read the configuration from `RUST_LOG`, `STACKSCOPE_LOG_FORMAT` and
    /// `STACKSCOPE_LOG_FILE`.
    ///
    /// Unparseable values fall back to the defaults.
    pub fn from_env() -> Self
    {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let format = lookup(LOG_FORMAT_ENV)
            .and_then(|s| LogFormat::from_str(&s).ok())
            .unwrap_or(defaults.format);
        let default_level = lookup("RUST_LOG")
            .and_then(|s| LogLevel::from_str(&s).ok())
            .unwrap_or(defaults.default_level);
        let file = lookup(LOG_FILE_ENV).filter(|s| !s.is_empty()).map(PathBuf::from);

        Self {
            format,
            default_level,
            file,
        }
    }
}

/// Initialize logging with default settings
///
/// Reads configuration from the environment (see [`LogConfig::from_env`]).
///
/// ## Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging() -> Result<(), LoggingError>
{
    init_with_config(&LogConfig::from_env())
}

/// Initialize logging with explicit level and format
///
/// ```rust,no_run
/// use stackscope_utils::{LogFormat, LogLevel, init_logging_with_level};
///
/// init_logging_with_level(LogLevel::Debug, LogFormat::Pretty)
///     .expect("Failed to initialize logging");
/// ```
///
/// ## Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging_with_level(level: LogLevel, format: LogFormat) -> Result<(), LoggingError>
{
    let config = LogConfig {
        format,
        default_level: level,
        file: None,
    };
    init_with_config(&config)
}

/// Initialize logging from an explicit configuration.
///
/// `RUST_LOG` still overrides `default_level` when it holds a valid filter
/// (module-specific filters such as `stackscope_core=trace` included).
///
/// ## Errors
///
/// Returns [`LoggingError::InitializationFailed`] if a global subscriber is
/// already installed.
pub fn init_with_config(config: &LogConfig) -> Result<(), LoggingError>
{
    let default_level: Level = config.default_level.into();
    let env_filter = level_filter(default_level);

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::with_capacity(2);
    if let Some(path) = config.file.as_deref() {
        layers.push(file_layer(path, config.format, level_filter(default_level)));
    }

    let console_layer = match config.format {
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(true)
            .with_writer(io::stderr)
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(io::stderr)
            .with_filter(env_filter)
            .boxed(),
    };
    layers.push(console_layer);

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|err| LoggingError::InitializationFailed(err.to_string()))
}

/// Path of a per-day log file inside `directory`, e.g. `2025-01-31-stackscope.log`.
pub fn dated_log_file(directory: &Path) -> PathBuf
{
    let today = Utc::now().format("%Y-%m-%d");
    directory.join(format!("{today}-stackscope.log"))
}

/// `RUST_LOG` when set and valid, `level` otherwise.
fn level_filter(level: Level) -> EnvFilter
{
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()))
}

fn file_layer(path: &Path, format: LogFormat, filter: EnvFilter) -> Box<dyn Layer<Registry> + Send + Sync>
{
    let directory = path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let file_name = path.file_name().map(ToOwned::to_owned).unwrap_or_default();
    let appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    // The writer flushes on a background thread that lives as long as the guard.
    std::mem::forget(guard);

    match format {
        LogFormat::Pretty => fmt::layer()
            .with_writer(non_blocking)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(false)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(non_blocking)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_span_list(true)
            .with_filter(filter)
            .boxed(),
    }
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// Invalid log format
    #[error("Unknown log format: {0}. Use 'pretty' or 'json'")]
    InvalidFormat(String),

    /// Invalid log level
    #[error("Unknown log level: {0}. Use 'error', 'warn', 'info', 'debug', or 'trace'")]
    InvalidLevel(String),

    /// Failed to initialize logging
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// File logging error
    #[error("File logging error: {0}")]
    FileError(#[from] io::Error),
}
