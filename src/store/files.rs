//! File backend: one JSON file per namespace inside the data directory.
//!
//! Writes go to a temporary file in the same directory which is synced and
//! then renamed over the record file, so readers only ever observe a complete
//! old or new value. Writers of one namespace are serialized by an in-process
//! mutex and, across processes, by an exclusive advisory lock on a sibling
//! `.lock` file.

use super::backend::{Modifier, Namespace, StorageBackend};
use crate::constants::{LOCK_FILE_EXTENSION, RECORD_FILE_EXTENSION};
use crate::errors::StorageError;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::NamedTempFile;
use tracing::debug;

/// Stores each namespace as `<dir>/<namespace>.json`.
#[derive(Debug)]
pub struct FileBackend {
    dir: PathBuf,
    writers: [Mutex<()>; 3],
}

/// Holds both writer locks of a namespace until dropped.
struct WriterGuard<'a> {
    // Closing the file releases the advisory lock.
    _lock_file: File,
    _local: MutexGuard<'a, ()>,
}

impl FileBackend {
    /// Creates a backend rooted at `dir`. The directory must already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileBackend {
            dir: dir.into(),
            writers: [Mutex::new(()), Mutex::new(()), Mutex::new(())],
        }
    }

    /// The record file of a namespace.
    pub fn record_path(&self, namespace: Namespace) -> PathBuf {
        self.dir
            .join(format!("{}.{}", namespace.key(), RECORD_FILE_EXTENSION))
    }

    fn lock_path(&self, namespace: Namespace) -> PathBuf {
        self.dir
            .join(format!("{}.{}", namespace.key(), LOCK_FILE_EXTENSION))
    }

    fn lock(&self, namespace: Namespace) -> Result<WriterGuard<'_>, StorageError> {
        let local = self.writers[namespace.index()]
            .lock()
            .map_err(|_| StorageError::Poisoned {
                namespace: namespace.key(),
            })?;

        let lock_path = self.lock_path(namespace);
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|source| StorageError::Lock {
                path: lock_path.clone(),
                source,
            })?;
        lock_file
            .lock_exclusive()
            .map_err(|source| StorageError::Lock {
                path: lock_path,
                source,
            })?;

        Ok(WriterGuard {
            _lock_file: lock_file,
            _local: local,
        })
    }

    fn read_record(&self, namespace: Namespace) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.record_path(namespace)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn replace_record(&self, namespace: Namespace, value: &str) -> Result<(), StorageError> {
        let path = self.record_path(namespace);
        atomic_write(&self.dir, &path, value)?;
        debug!("Replaced {} ({} bytes)", namespace, value.len());
        Ok(())
    }
}

/// Writes `value` to a temp file in `dir`, syncs it, and renames it to `path`.
fn atomic_write(dir: &Path, path: &Path, value: &str) -> Result<(), StorageError> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(value.as_bytes())?;
    tmp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        let permissions = fs::Permissions::from_mode(crate::constants::DEFAULT_FILE_PERMISSIONS);
        fs::set_permissions(tmp.path(), permissions)?;
    }

    tmp.persist(path).map_err(|e| StorageError::Io(e.error))?;
    Ok(())
}

impl StorageBackend for FileBackend {
    fn read(&self, namespace: Namespace) -> Result<Option<String>, StorageError> {
        self.read_record(namespace)
    }

    fn write(&self, namespace: Namespace, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock(namespace)?;
        self.replace_record(namespace, value)
    }

    fn modify(&self, namespace: Namespace, apply: &mut Modifier<'_>) -> Result<(), StorageError> {
        let _guard = self.lock(namespace)?;
        let current = self.read_record(namespace)?;
        if let Some(updated) = apply(current.as_deref())? {
            self.replace_record(namespace, &updated)?;
        }
        Ok(())
    }

    fn remove(&self, namespace: Namespace) -> Result<(), StorageError> {
        let _guard = self.lock(namespace)?;
        match fs::remove_file(self.record_path(namespace)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
