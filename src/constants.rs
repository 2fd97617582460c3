//! Constants used throughout the application.
//!
//! Grouped by concern so record keys, defaults and environment variables can
//! be found and referenced consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "buddy-diary";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A personal diary with streaks, tags and a conversational buddy";

// Record namespaces
/// Namespace holding the JSON array of diary entries.
pub const NAMESPACE_DIARIES: &str = "diaries";
/// Namespace holding the user settings object.
pub const NAMESPACE_SETTINGS: &str = "settings";
/// Namespace holding the session marker.
pub const NAMESPACE_SESSION: &str = "session";

// Settings defaults
/// Nickname used until the user picks one.
pub const DEFAULT_NICKNAME: &str = "User";
/// Name of the buddy character until the user renames it.
pub const DEFAULT_CHARACTER_NAME: &str = "Buddy";
/// Default theme color (hex).
pub const DEFAULT_THEME_COLOR: &str = "#7C3AED";

// Configuration Keys & Environment Variables
/// Environment variable for the data directory.
pub const ENV_VAR_DATA_DIR: &str = "BUDDY_DIARY_DIR";
/// Environment variable selecting the storage backend.
pub const ENV_VAR_BACKEND: &str = "BUDDY_DIARY_BACKEND";
/// Environment variable selecting the log output format.
pub const ENV_VAR_LOG_FORMAT: &str = "BUDDY_DIARY_LOG_FORMAT";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default data directory, relative to the user's home directory.
pub const DEFAULT_DATA_SUBDIR: &str = ".local/share/buddy-diary";

// Storage
/// File name of the SQLite database inside the data directory.
pub const DATABASE_FILE_NAME: &str = "buddy-diary.db";
/// Extension of per-namespace record files used by the file backend.
pub const RECORD_FILE_EXTENSION: &str = "json";
/// Extension of the advisory lock files used by the file backend.
pub const LOCK_FILE_EXTENSION: &str = "lock";
/// Maximum pooled SQLite connections.
pub const DB_POOL_MAX_SIZE: u32 = 4;
/// How long SQLite waits on a locked database before giving up, in milliseconds.
pub const DB_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Default POSIX permissions for the data directory (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;
/// Default POSIX permissions for record files (owner read/write).
#[cfg(unix)]
pub const DEFAULT_FILE_PERMISSIONS: u32 = 0o600;

// Entries and analytics
/// Character stripped from tags before storage and counting.
pub const TAG_MARKER: char = '#';
/// Number of tags shown in the "top tags" section of a report.
pub const TOP_TAGS_LIMIT: usize = 5;
/// Number of days shown in a calendar month grid (six weeks).
pub const MONTH_GRID_DAYS: usize = 42;
/// Date format string for ISO date format (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Naive local date-time format accepted for entry dates.
pub const DATETIME_FORMAT_NAIVE: &str = "%Y-%m-%dT%H:%M:%S%.f";

// Conversations
/// Tags attached to entries summarized from a conversation, before the character name.
pub const CONVERSATION_TAGS: &[&str] = &["daily", "conversation"];
/// Content used when a summarized conversation has only blank user messages.
pub const EMPTY_CONVERSATION_CONTENT: &str = "Today was a colorful day...";

// Logging Configuration
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "buddy-diary";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";
