//! The storage seam behind the record store.
//!
//! A backend holds one serialized value per [`Namespace`] and knows how to
//! run a read-modify-write of a single namespace as one critical section.
//! The store never sees connections, files or locks.

use crate::constants::{NAMESPACE_DIARIES, NAMESPACE_SESSION, NAMESPACE_SETTINGS};
use crate::errors::StorageError;
use std::fmt;

/// One durable record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// JSON array of diary entries, newest first by construction.
    Diaries,
    /// JSON object with the user settings.
    Settings,
    /// JSON object with the session marker.
    Session,
}

impl Namespace {
    /// Every namespace, in a fixed order.
    pub const ALL: [Namespace; 3] = [Namespace::Diaries, Namespace::Settings, Namespace::Session];

    /// The storage key of this namespace.
    pub fn key(self) -> &'static str {
        match self {
            Namespace::Diaries => NAMESPACE_DIARIES,
            Namespace::Settings => NAMESPACE_SETTINGS,
            Namespace::Session => NAMESPACE_SESSION,
        }
    }

    /// Position of this namespace in [`Namespace::ALL`].
    pub fn index(self) -> usize {
        match self {
            Namespace::Diaries => 0,
            Namespace::Settings => 1,
            Namespace::Session => 2,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Callback used by [`StorageBackend::modify`].
///
/// Receives the current value (`None` when absent) and returns the value to
/// write, or `None` to leave the namespace untouched.
pub type Modifier<'a> = dyn FnMut(Option<&str>) -> Result<Option<String>, StorageError> + 'a;

/// Durable key-value storage with one value per namespace.
///
/// Implementations must make `modify` a single critical section per
/// namespace: no other `write`, `modify` or `remove` of the same namespace
/// may interleave between the read and the write.
pub trait StorageBackend: Send + Sync {
    /// Reads the raw value of a namespace.
    fn read(&self, namespace: Namespace) -> Result<Option<String>, StorageError>;

    /// Overwrites the value of a namespace.
    fn write(&self, namespace: Namespace, value: &str) -> Result<(), StorageError>;

    /// Runs a read-modify-write of one namespace atomically.
    ///
    /// If `apply` returns an error nothing is written and the error is
    /// returned unchanged.
    fn modify(&self, namespace: Namespace, apply: &mut Modifier<'_>) -> Result<(), StorageError>;

    /// Erases a namespace. Erasing an absent namespace is not an error.
    fn remove(&self, namespace: Namespace) -> Result<(), StorageError>;

    /// Erases every namespace.
    fn clear(&self) -> Result<(), StorageError> {
        for namespace in Namespace::ALL {
            self.remove(namespace)?;
        }
        Ok(())
    }
}
