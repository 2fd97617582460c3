//! Process-local backend, used as a test double and for throwaway stores.

use super::backend::{Modifier, Namespace, StorageBackend};
use crate::errors::StorageError;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Keeps every namespace in a map behind one mutex.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: Mutex<HashMap<Namespace, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self, namespace: Namespace) -> Result<MutexGuard<'_, HashMap<Namespace, String>>, StorageError> {
        self.values.lock().map_err(|_| StorageError::Poisoned {
            namespace: namespace.key(),
        })
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, namespace: Namespace) -> Result<Option<String>, StorageError> {
        Ok(self.values(namespace)?.get(&namespace).cloned())
    }

    fn write(&self, namespace: Namespace, value: &str) -> Result<(), StorageError> {
        self.values(namespace)?.insert(namespace, value.to_string());
        Ok(())
    }

    fn modify(&self, namespace: Namespace, apply: &mut Modifier<'_>) -> Result<(), StorageError> {
        let mut values = self.values(namespace)?;
        if let Some(updated) = apply(values.get(&namespace).map(String::as_str))? {
            values.insert(namespace, updated);
        }
        Ok(())
    }

    fn remove(&self, namespace: Namespace) -> Result<(), StorageError> {
        self.values(namespace)?.remove(&namespace);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_absent_namespace() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.read(Namespace::Settings).unwrap(), None);
    }

    #[test]
    fn test_modify_returning_none_leaves_value() {
        let backend = MemoryBackend::new();
        backend.write(Namespace::Session, "before").unwrap();

        backend
            .modify(Namespace::Session, &mut |current: Option<&str>| {
                assert_eq!(current, Some("before"));
                Ok(None)
            })
            .unwrap();

        assert_eq!(backend.read(Namespace::Session).unwrap().as_deref(), Some("before"));
    }

    #[test]
    fn test_failed_modify_writes_nothing() {
        let backend = MemoryBackend::new();
        backend.write(Namespace::Diaries, "[]").unwrap();

        let result = backend.modify(Namespace::Diaries, &mut |_| {
            Err(StorageError::Poisoned { namespace: "diaries" })
        });

        assert!(result.is_err());
        assert_eq!(backend.read(Namespace::Diaries).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_clear_removes_every_namespace() {
        let backend = MemoryBackend::new();
        for namespace in Namespace::ALL {
            backend.write(namespace, "{}").unwrap();
        }

        backend.clear().unwrap();

        for namespace in Namespace::ALL {
            assert_eq!(backend.read(namespace).unwrap(), None);
        }
    }
}
