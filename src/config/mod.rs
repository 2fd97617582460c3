//! Configuration management for the buddy-diary application.
//!
//! This module loads and validates configuration settings from environment
//! variables, with sensible defaults. It decides where records live, which
//! storage backend holds them, and how log output is formatted.
//!
//! # Environment Variables
//!
//! - `BUDDY_DIARY_DIR`: Path to the data directory (defaults to ~/.local/share/buddy-diary)
//! - `BUDDY_DIARY_BACKEND`: Storage backend, `sqlite` (default) or `files`
//! - `BUDDY_DIARY_LOG_FORMAT`: Log output format, `text` (default) or `json`
//! - `HOME`: Used for expanding the default data directory path

use crate::constants::{
    DEFAULT_DATA_SUBDIR, ENV_VAR_BACKEND, ENV_VAR_DATA_DIR, ENV_VAR_HOME, ENV_VAR_LOG_FORMAT,
    LOG_FORMAT_JSON, LOG_FORMAT_TEXT,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Which storage backend persists the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// A single SQLite database file in the data directory.
    #[default]
    Sqlite,
    /// One JSON file per record kind in the data directory.
    Files,
}

impl FromStr for BackendKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(BackendKind::Sqlite),
            "files" => Ok(BackendKind::Files),
            other => Err(AppError::Config(format!(
                "Unknown storage backend '{}'. Set {} to 'sqlite' or 'files'",
                other, ENV_VAR_BACKEND
            ))),
        }
    }
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            LOG_FORMAT_TEXT => Ok(LogFormat::Text),
            LOG_FORMAT_JSON => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!(
                "Unknown log format '{}'. Set {} to '{}' or '{}'",
                other, ENV_VAR_LOG_FORMAT, LOG_FORMAT_TEXT, LOG_FORMAT_JSON
            ))),
        }
    }
}

/// Configuration for the buddy-diary application.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use buddy_diary::config::{BackendKind, Config, LogFormat};
/// use std::path::PathBuf;
///
/// let config = Config {
///     data_dir: PathBuf::from("/path/to/data"),
///     backend: BackendKind::Files,
///     log_format: LogFormat::Text,
/// };
/// assert!(config.validate().is_ok());
/// ```
///
/// Loading configuration from environment variables:
/// ```no_run
/// use buddy_diary::Config;
/// use std::env;
///
/// env::set_var("BUDDY_DIARY_DIR", "/custom/data/path");
///
/// let config = Config::load().expect("Failed to load configuration");
/// assert_eq!(config.data_dir.to_str(), Some("/custom/data/path"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the database or record files.
    ///
    /// Loaded from `BUDDY_DIARY_DIR` with a fallback to
    /// ~/.local/share/buddy-diary.
    pub data_dir: PathBuf,

    /// Storage backend selected by `BUDDY_DIARY_BACKEND`.
    pub backend: BackendKind,

    /// Log format selected by `BUDDY_DIARY_LOG_FORMAT`.
    pub log_format: LogFormat,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_dir", &"[REDACTED_PATH]")
            .field("backend", &self.backend)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from(""),
            backend: BackendKind::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// The data directory is expanded with `shellexpand`, so `~` and
    /// environment variable references are allowed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - The data directory path expansion fails or yields an empty path
    /// - The backend or log format names are not recognized
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use buddy_diary::Config;
    ///
    /// match Config::load() {
    ///     Ok(config) => println!("Using backend {:?}", config.backend),
    ///     Err(err) => eprintln!("Failed to load config: {}", err),
    /// }
    /// ```
    pub fn load() -> AppResult<Self> {
        let data_dir_str = env::var(ENV_VAR_DATA_DIR).unwrap_or_else(|_| {
            let home = env::var(ENV_VAR_HOME).unwrap_or_default();
            format!("{}/{}", home, DEFAULT_DATA_SUBDIR)
        });

        // Handles ~ and environment variables
        let expanded_path = shellexpand::full(&data_dir_str)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
        let data_dir = PathBuf::from(expanded_path.into_owned());

        if data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        let backend = match env::var(ENV_VAR_BACKEND) {
            Ok(value) if !value.trim().is_empty() => value.parse()?,
            _ => BackendKind::default(),
        };

        let log_format = match env::var(ENV_VAR_LOG_FORMAT) {
            Ok(value) if !value.trim().is_empty() => value.parse()?,
            _ => LogFormat::default(),
        };

        Ok(Config {
            data_dir,
            backend,
            log_format,
        })
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` with one of the following messages:
    /// - "Data directory path is empty" if the path is empty
    /// - "Data directory must be an absolute path" if the path is relative
    pub fn validate(&self) -> AppResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        if !self.data_dir.is_absolute() {
            return Err(AppError::Config(
                "Data directory must be an absolute path".to_string(),
            ));
        }

        Ok(())
    }
}
