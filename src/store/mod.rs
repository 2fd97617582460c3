//! The record store: single source of truth for entries, settings and the
//! session marker.
//!
//! Every operation comes in two forms. The `try_*` methods return
//! `Result<_, StorageError>` and are what the fail-soft methods are built on.
//! The fail-soft methods (`list_entries`, `get_settings`, `create_entry`, ...)
//! never fail: a missing or undecodable record reads as empty or default, a
//! storage failure is logged and swallowed, and updating or deleting an
//! unknown id does nothing.
//!
//! Mutations rewrite the whole value of their record kind inside the
//! backend's critical section, so concurrent writers never lose each other's
//! changes. A mutation never overwrites an entry collection it could not
//! decode.
//!
//! # Example
//!
//! ```
//! use buddy_diary::diary::DiaryEntry;
//! use buddy_diary::store::RecordStore;
//!
//! let store = RecordStore::in_memory();
//! store.create_entry(&DiaryEntry::new("1", "First", "Hello", "2024-01-15"));
//!
//! assert_eq!(store.list_entries().len(), 1);
//! assert_eq!(store.get_entry("1").unwrap().title, "First");
//! ```

pub mod backend;
pub mod files;
pub mod memory;

use crate::config::{BackendKind, Config};
use crate::constants::DATABASE_FILE_NAME;
use crate::db::Database;
use crate::diary::{DiaryEntry, Session, UserSettings};
use crate::errors::{AppError, AppResult, StorageError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tracing::{debug, error, info, warn};

pub use backend::{Namespace, StorageBackend};
pub use files::FileBackend;
pub use memory::MemoryBackend;

/// Explicit store handle; construct once and pass by reference.
pub struct RecordStore {
    backend: Box<dyn StorageBackend>,
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore").finish_non_exhaustive()
    }
}

impl RecordStore {
    /// Wraps an arbitrary backend.
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        RecordStore {
            backend: Box::new(backend),
        }
    }

    /// A store that lives only as long as this value.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Opens the durable store described by `config`, creating the data
    /// directory (and database schema) on first use.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the data directory cannot be created and
    /// `AppError::Storage` if the database cannot be opened.
    pub fn open(config: &Config) -> AppResult<Self> {
        ensure_data_directory_exists(&config.data_dir)?;

        match config.backend {
            BackendKind::Sqlite => {
                let db = Database::open(&config.data_dir.join(DATABASE_FILE_NAME))?;
                db.initialize_schema()?;
                Ok(Self::new(db))
            }
            BackendKind::Files => Ok(Self::new(FileBackend::new(&config.data_dir))),
        }
    }

    /// Direct access to the backend, bypassing record decoding.
    pub fn backend(&self) -> &dyn StorageBackend {
        self.backend.as_ref()
    }

    // ----- typed API -------------------------------------------------------

    /// All entries in persisted order.
    pub fn try_list_entries(&self) -> Result<Vec<DiaryEntry>, StorageError> {
        let raw = self.backend.read(Namespace::Diaries)?;
        decode_entries(raw.as_deref())
    }

    /// The first entry whose id equals `id`.
    pub fn try_get_entry(&self, id: &str) -> Result<Option<DiaryEntry>, StorageError> {
        Ok(self
            .try_list_entries()?
            .into_iter()
            .find(|entry| entry.id == id))
    }

    /// Prepends `entry` to the collection. Ids are not checked for uniqueness.
    pub fn try_create_entry(&self, entry: &DiaryEntry) -> Result<(), StorageError> {
        self.modify_entries(|entries| {
            entries.insert(0, entry.clone());
            true
        })?;
        info!("Created entry {}", entry.id);
        Ok(())
    }

    /// Replaces every entry whose id matches; returns whether one matched.
    pub fn try_update_entry(&self, entry: &DiaryEntry) -> Result<bool, StorageError> {
        let matched = self.modify_entries(|entries| {
            let mut matched = false;
            for existing in entries.iter_mut().filter(|e| e.id == entry.id) {
                *existing = entry.clone();
                matched = true;
            }
            matched
        })?;

        if matched {
            info!("Updated entry {}", entry.id);
        } else {
            debug!("Update ignored, no entry with id {}", entry.id);
        }
        Ok(matched)
    }

    /// Removes every entry whose id matches; returns whether one matched.
    pub fn try_delete_entry(&self, id: &str) -> Result<bool, StorageError> {
        let matched = self.modify_entries(|entries| {
            let before = entries.len();
            entries.retain(|e| e.id != id);
            entries.len() != before
        })?;

        if matched {
            info!("Deleted entry {}", id);
        } else {
            debug!("Delete ignored, no entry with id {}", id);
        }
        Ok(matched)
    }

    /// Persisted settings, or `None` if never saved.
    pub fn try_get_settings(&self) -> Result<Option<UserSettings>, StorageError> {
        self.read_record(Namespace::Settings)
    }

    /// Overwrites the settings record.
    pub fn try_save_settings(&self, settings: &UserSettings) -> Result<(), StorageError> {
        self.write_record(Namespace::Settings, settings)
    }

    /// The session marker, or `None` if absent.
    pub fn try_get_session(&self) -> Result<Option<Session>, StorageError> {
        self.read_record(Namespace::Session)
    }

    /// Overwrites the session marker.
    pub fn try_set_session(&self, session: &Session) -> Result<(), StorageError> {
        self.write_record(Namespace::Session, session)
    }

    /// Erases every record kind.
    pub fn try_clear_all(&self) -> Result<(), StorageError> {
        self.backend.clear()?;
        info!("Cleared all records");
        Ok(())
    }

    // ----- fail-soft API ---------------------------------------------------

    /// All entries in persisted order; empty if the collection is missing,
    /// undecodable or unreadable.
    pub fn list_entries(&self) -> Vec<DiaryEntry> {
        self.try_list_entries().unwrap_or_else(|e| {
            warn!("Falling back to an empty entry list: {}", e);
            Vec::new()
        })
    }

    /// Linear lookup by id over [`RecordStore::list_entries`].
    pub fn get_entry(&self, id: &str) -> Option<DiaryEntry> {
        self.list_entries().into_iter().find(|entry| entry.id == id)
    }

    /// Prepends `entry`; failures are logged and dropped.
    pub fn create_entry(&self, entry: &DiaryEntry) {
        if let Err(e) = self.try_create_entry(entry) {
            error!("Failed to create entry {}: {}", entry.id, e);
        }
    }

    /// Silent no-op if no entry has `entry.id`.
    pub fn update_entry(&self, entry: &DiaryEntry) {
        if let Err(e) = self.try_update_entry(entry) {
            error!("Failed to update entry {}: {}", entry.id, e);
        }
    }

    /// Silent no-op if no entry has `id`.
    pub fn delete_entry(&self, id: &str) {
        if let Err(e) = self.try_delete_entry(id) {
            error!("Failed to delete entry {}: {}", id, e);
        }
    }

    /// Persisted settings, or the defaults if absent or unreadable.
    pub fn get_settings(&self) -> UserSettings {
        match self.try_get_settings() {
            Ok(Some(settings)) => settings,
            Ok(None) => UserSettings::default(),
            Err(e) => {
                warn!("Falling back to default settings: {}", e);
                UserSettings::default()
            }
        }
    }

    /// Replaces the stored settings wholesale.
    pub fn save_settings(&self, settings: &UserSettings) {
        if let Err(e) = self.try_save_settings(settings) {
            error!("Failed to save settings: {}", e);
        }
    }

    /// The session marker; `None` if absent or unreadable.
    pub fn get_session(&self) -> Option<Session> {
        self.try_get_session().unwrap_or_else(|e| {
            warn!("Treating session as absent: {}", e);
            None
        })
    }

    /// Replaces the session marker.
    pub fn set_session(&self, session: &Session) {
        if let Err(e) = self.try_set_session(session) {
            error!("Failed to save session: {}", e);
        }
    }

    /// Removes entries, settings and session together.
    pub fn clear_all(&self) {
        if let Err(e) = self.try_clear_all() {
            error!("Failed to clear records: {}", e);
        }
    }

    // ----- helpers ---------------------------------------------------------

    /// Runs `change` over the decoded collection inside the backend's critical
    /// section and writes the result back if `change` reports a change.
    fn modify_entries<F>(&self, mut change: F) -> Result<bool, StorageError>
    where
        F: FnMut(&mut Vec<DiaryEntry>) -> bool,
    {
        let mut changed = false;
        self.backend.modify(Namespace::Diaries, &mut |current: Option<&str>| {
            let mut entries = decode_entries(current)?;
            changed = change(&mut entries);
            if !changed {
                return Ok(None);
            }
            encode(Namespace::Diaries, &entries).map(Some)
        })?;
        Ok(changed)
    }

    fn read_record<T: DeserializeOwned>(&self, namespace: Namespace) -> Result<Option<T>, StorageError> {
        match self.backend.read(namespace)? {
            Some(raw) if !raw.trim().is_empty() => decode(namespace, &raw).map(Some),
            _ => Ok(None),
        }
    }

    fn write_record<T: Serialize>(&self, namespace: Namespace, value: &T) -> Result<(), StorageError> {
        let raw = encode(namespace, value)?;
        self.backend.write(namespace, &raw)?;
        debug!("Saved {}", namespace);
        Ok(())
    }
}

fn decode_entries(raw: Option<&str>) -> Result<Vec<DiaryEntry>, StorageError> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => decode(Namespace::Diaries, raw),
        _ => Ok(Vec::new()),
    }
}

fn decode<T: DeserializeOwned>(namespace: Namespace, raw: &str) -> Result<T, StorageError> {
    serde_json::from_str(raw).map_err(|source| StorageError::Decode {
        namespace: namespace.key(),
        source,
    })
}

fn encode<T: Serialize + ?Sized>(namespace: Namespace, value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|source| StorageError::Encode {
        namespace: namespace.key(),
        source,
    })
}

/// Ensures the data directory exists, creating it with owner-only
/// permissions if necessary.
///
/// # Errors
///
/// Returns `AppError::Config` for a relative path and `AppError::Io` if the
/// directory cannot be created.
pub fn ensure_data_directory_exists(data_dir: &Path) -> AppResult<()> {
    if !data_dir.is_absolute() {
        return Err(AppError::Config(format!(
            "Data directory path must be absolute: {}",
            data_dir.display()
        )));
    }

    if !data_dir.exists() {
        fs::create_dir_all(data_dir).map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create data directory: {}", e),
            ))
        })?;

        #[cfg(unix)]
        {
            let permissions = fs::Permissions::from_mode(crate::constants::DEFAULT_DIR_PERMISSIONS);
            fs::set_permissions(data_dir, permissions)?;
            debug!("Set 0o700 permissions on data directory");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(id: &str, title: &str) -> DiaryEntry {
        DiaryEntry::new(id, title, format!("{} content", title), "2024-01-15T09:00:00")
    }

    #[test]
    fn test_create_prepends() {
        let store = RecordStore::in_memory();
        store.create_entry(&entry("1", "first"));
        store.create_entry(&entry("2", "second"));

        let ids: Vec<String> = store.list_entries().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn test_try_update_reports_match() {
        let store = RecordStore::in_memory();
        store.create_entry(&entry("1", "first"));

        assert!(store.try_update_entry(&entry("1", "renamed")).unwrap());
        assert!(!store.try_update_entry(&entry("404", "ghost")).unwrap());
        assert_eq!(store.get_entry("1").unwrap().title, "renamed");
        assert!(store.get_entry("404").is_none());
    }

    #[test]
    fn test_try_delete_reports_match() {
        let store = RecordStore::in_memory();
        store.create_entry(&entry("1", "first"));

        assert!(!store.try_delete_entry("2").unwrap());
        assert!(store.try_delete_entry("1").unwrap());
        assert!(store.list_entries().is_empty());
    }

    #[test]
    fn test_empty_blob_reads_as_empty_collection() {
        let store = RecordStore::in_memory();
        store.backend().write(Namespace::Diaries, "  ").unwrap();

        assert!(store.try_list_entries().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_collection_is_not_overwritten() {
        let store = RecordStore::in_memory();
        store.backend().write(Namespace::Diaries, "[{oops").unwrap();

        assert!(store.list_entries().is_empty());
        assert!(matches!(
            store.try_create_entry(&entry("1", "first")),
            Err(StorageError::Decode { namespace: "diaries", .. })
        ));
        store.delete_entry("1");

        assert_eq!(
            store.backend().read(Namespace::Diaries).unwrap().as_deref(),
            Some("[{oops")
        );
    }

    #[test]
    fn test_corrupt_settings_fall_back_to_defaults() {
        let store = RecordStore::in_memory();
        store.backend().write(Namespace::Settings, "nope").unwrap();

        assert!(store.try_get_settings().is_err());
        assert_eq!(store.get_settings(), UserSettings::default());
    }

    #[test]
    fn test_session_round_trip_and_clear() {
        let store = RecordStore::in_memory();
        assert_eq!(store.get_session(), None);

        store.set_session(&Session::signed_in("Mina"));
        assert_eq!(store.get_session(), Some(Session::signed_in("Mina")));

        store.clear_all();
        assert_eq!(store.get_session(), None);
    }

    #[test]
    fn test_ensure_data_directory_rejects_relative_path() {
        let result = ensure_data_directory_exists(Path::new("relative/data"));

        match result {
            Err(AppError::Config(msg)) => {
                assert!(msg.contains("must be absolute"));
                assert!(msg.contains("relative/data"));
            }
            _ => panic!("Expected AppError::Config variant"),
        }
    }

    #[test]
    fn test_ensure_data_directory_creates_with_permissions() {
        let temp_dir = tempdir().expect("Failed to create temporary directory");
        let data_dir = temp_dir.path().join("nested").join("data");

        ensure_data_directory_exists(&data_dir).expect("Failed to create directory");

        assert!(data_dir.is_dir());
        #[cfg(unix)]
        {
            let metadata = fs::metadata(&data_dir).expect("Failed to get directory metadata");
            assert_eq!(metadata.permissions().mode() & 0o777, 0o700);
        }
    }
}
