/*!
# Buddy Diary

Buddy Diary is the persistence and analytics core of a personal journal. It
durably stores diary entries, user settings and a local session marker, and
derives statistics such as the current writing streak, tag frequency, emotion
distribution and weekday activity from the stored entries.

## Architecture

- `diary`: record types and their JSON wire format
- `store`: the record store and its storage backends (SQLite, files, memory)
- `db`: the SQLite backend
- `query`: pure filters over an entry snapshot
- `analytics`: pure statistics over an entry snapshot
- `ops`: validated workflows (compose, conversation, settings, account, report)
- `cli`: command-line interface using clap
- `config`: configuration loading and validation
- `errors`: error handling infrastructure

## Usage Example

```rust,no_run
use buddy_diary::{analytics, Config, RecordStore};
use chrono::Local;

fn main() -> buddy_diary::AppResult<()> {
    let config = Config::load()?;
    config.validate()?;

    let store = RecordStore::open(&config)?;
    let entries = store.list_entries();

    let today = Local::now().date_naive();
    println!("Current streak: {} days", analytics::streak(&entries, today));
    Ok(())
}
```
*/

/// Statistics over entry snapshots
pub mod analytics;
/// Command-line interface for parsing and running user commands
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// SQLite storage backend
pub mod db;
/// Record types
pub mod diary;
/// Error types and utilities for error handling
pub mod errors;
/// Tracing subscriber setup
pub mod logging;
/// Collaborator workflows
pub mod ops;
/// Filters over entry snapshots
pub mod query;
/// The record store
pub mod store;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use diary::{DiaryEntry, Message, Role, Session, UserSettings};
pub use errors::{AppError, AppResult, StorageError};
pub use store::RecordStore;
