//! Error handling utilities for the buddy-diary core.
//!
//! Two layers of errors live here. `StorageError` is what the record store and
//! its backends produce; it never escapes the fail-soft store API, which turns
//! it into an empty collection or a default value at a single boundary.
//! `AppError` is the application-level error used by the collaborator
//! workflows in `ops` and by the binary, together with the `AppResult` alias.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Represents failures of the durable storage layer.
///
/// Each variant carries enough context to tell which record kind was involved
/// and what the underlying cause was.
///
/// # Examples
///
/// ```
/// use buddy_diary::errors::StorageError;
///
/// let error = StorageError::Poisoned { namespace: "diaries" };
/// assert!(format!("{}", error).contains("diaries"));
/// ```
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem error while reading or writing a record.
    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// SQLite error from the database backend.
    #[error("Database error: {0}\n\nIf you're seeing 'file is not a database', the data directory may contain a corrupted or foreign file.")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("Failed to get connection from pool: {0}\n\nThis may indicate database connection issues. Try closing other buddy-diary instances.")]
    Pool(#[from] r2d2::Error),

    /// Stored bytes do not match the expected shape of the record kind.
    #[error("Stored '{namespace}' record could not be decoded: {source}")]
    Decode {
        /// The namespace whose value failed to decode
        namespace: &'static str,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be serialized.
    #[error("Failed to encode '{namespace}' record: {source}")]
    Encode {
        /// The namespace being written
        namespace: &'static str,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// The exclusive lock guarding a record file could not be taken.
    #[error("Failed to acquire lock for {path}: {source}. Please check file permissions and ensure the data directory is accessible.")]
    Lock {
        /// The lock file path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A writer panicked while holding the in-process lock for a namespace.
    #[error("Writer lock for '{namespace}' was poisoned by a panicking writer")]
    Poisoned {
        /// The namespace whose lock was poisoned
        namespace: &'static str,
    },
}

/// Represents all errors surfaced by the collaborator workflows and the CLI.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use buddy_diary::errors::AppError;
///
/// let error = AppError::Config("Data directory path is empty".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Data directory path is empty");
/// ```
///
/// Converting from an IO error:
/// ```
/// use buddy_diary::errors::AppError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "file not found");
/// let app_error: AppError = io_error.into();
///
/// match app_error {
///     AppError::Io(inner) => assert_eq!(inner.kind(), ErrorKind::NotFound),
///     _ => panic!("Expected Io variant"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors from the record store, surfaced through the typed `try_*` API.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A draft or patch was rejected before reaching the store.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The requested diary entry does not exist.
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// A conversation had no user message to summarize.
    #[error("The conversation is too short to become a diary entry. Say a little more first.")]
    ConversationTooShort,

    /// A date argument could not be parsed.
    #[error("Invalid date '{0}'. Use YYYY-MM-DD, YYYY-MM or an RFC 3339 timestamp.")]
    InvalidDate(String),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use buddy_diary::errors::{AppResult, AppError};
///
/// fn might_fail(title: &str) -> AppResult<String> {
///     if title.trim().is_empty() {
///         return Err(AppError::Validation("Title is required".to_string()));
///     }
///     Ok(title.to_string())
/// }
///
/// assert!(might_fail("").is_err());
/// ```
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_app_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");

        let app_error: AppError = io_error.into();

        match app_error {
            AppError::Io(inner) => {
                assert_eq!(inner.kind(), io::ErrorKind::NotFound);
            }
            _ => panic!("Expected AppError::Io variant"),
        }
    }

    #[test]
    fn test_app_error_display() {
        let config_error = AppError::Config("Invalid configuration".to_string());
        assert_eq!(
            format!("{}", config_error),
            "Configuration error: Invalid configuration"
        );

        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
        let app_io_error = AppError::Io(io_error);
        assert_eq!(format!("{}", app_io_error), "I/O error: permission denied");

        let not_found = AppError::NotFound("1700000000000".to_string());
        assert_eq!(format!("{}", not_found), "Entry not found: 1700000000000");

        let invalid = AppError::InvalidDate("tomorrow-ish".to_string());
        assert!(format!("{}", invalid).contains("tomorrow-ish"));
        assert!(format!("{}", invalid).contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_decode_error_names_namespace() {
        let json_error = serde_json::from_str::<Vec<u32>>("{not json").unwrap_err();
        let error = StorageError::Decode {
            namespace: "diaries",
            source: json_error,
        };

        let message = format!("{}", error);
        assert!(message.contains("'diaries'"));
        assert!(message.contains("could not be decoded"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_storage_error_conversion_to_app_error() {
        let lock_error = StorageError::Lock {
            path: PathBuf::from("/data/diaries.lock"),
            source: io::Error::new(io::ErrorKind::WouldBlock, "busy"),
        };

        let app_error: AppError = lock_error.into();
        let message = format!("{}", app_error);
        assert!(message.starts_with("Storage error: "));
        assert!(message.contains("/data/diaries.lock"));

        // The storage error stays reachable through the source chain
        let source = app_error.source().expect("storage error source");
        assert!(source.to_string().contains("Failed to acquire lock"));
    }

    #[test]
    fn test_result_combinators() {
        let io_result: Result<(), io::Error> = Err(io::Error::other("test error"));
        let app_result: AppResult<()> = io_result.map_err(AppError::Io);

        match app_result {
            Err(AppError::Io(inner)) => {
                assert_eq!(inner.kind(), io::ErrorKind::Other);
            }
            _ => panic!("Expected AppError::Io variant"),
        }
    }
}
