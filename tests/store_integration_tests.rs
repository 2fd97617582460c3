//! Integration tests for the record store over its durable backends.
//!
//! Every scenario runs against both the SQLite and the file backend through
//! `RecordStore::open`, the same way the binary opens the store.

use buddy_diary::config::{BackendKind, Config, LogFormat};
use buddy_diary::diary::{DiaryEntry, IdGenerator, Session, UserSettings};
use buddy_diary::store::{Namespace, RecordStore};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

const BACKENDS: [BackendKind; 2] = [BackendKind::Sqlite, BackendKind::Files];

fn config(dir: &Path, backend: BackendKind) -> Config {
    Config {
        data_dir: dir.to_path_buf(),
        backend,
        log_format: LogFormat::Text,
    }
}

fn open(dir: &Path, backend: BackendKind) -> RecordStore {
    RecordStore::open(&config(dir, backend)).expect("open store")
}

fn sample_entry(id: &str) -> DiaryEntry {
    let mut entry = DiaryEntry::new(id, format!("Title {}", id), "Some content", "2024-01-15T09:30:00.000Z");
    entry.tags = vec!["work".to_string(), "Focus".to_string()];
    entry.emotion = Some("calm".to_string());
    entry.images = vec!["file:///photos/1.jpg".to_string()];
    entry
}

#[test]
fn test_entries_survive_reopen() {
    for backend in BACKENDS {
        let temp_dir = TempDir::new().expect("create temp dir");
        let entry = sample_entry("1");

        {
            let store = open(temp_dir.path(), backend);
            store.create_entry(&entry);
        }

        let store = open(temp_dir.path(), backend);
        assert_eq!(store.get_entry("1"), Some(entry), "{:?}", backend);
    }
}

#[test]
fn test_settings_and_session_survive_reopen() {
    for backend in BACKENDS {
        let temp_dir = TempDir::new().expect("create temp dir");
        let settings = UserSettings {
            nickname: "Mina".to_string(),
            character_name: "Mochi".to_string(),
            theme_color: "#10B981".to_string(),
        };

        {
            let store = open(temp_dir.path(), backend);
            store.save_settings(&settings);
            store.set_session(&Session::signed_in("Mina"));
        }

        let store = open(temp_dir.path(), backend);
        assert_eq!(store.get_settings(), settings);
        assert_eq!(store.get_session(), Some(Session::signed_in("Mina")));
    }
}

#[test]
fn test_fresh_store_reads_defaults() {
    for backend in BACKENDS {
        let temp_dir = TempDir::new().expect("create temp dir");
        let store = open(&temp_dir.path().join("nested"), backend);

        assert!(store.list_entries().is_empty());
        assert_eq!(store.get_settings(), UserSettings::default());
        assert_eq!(store.get_session(), None);
    }
}

#[test]
fn test_update_isolation_and_idempotent_delete() {
    for backend in BACKENDS {
        let temp_dir = TempDir::new().expect("create temp dir");
        let store = open(temp_dir.path(), backend);
        store.create_entry(&sample_entry("a"));
        store.create_entry(&sample_entry("b"));

        let mut changed = sample_entry("a");
        changed.title = "Changed".to_string();
        store.update_entry(&changed);
        store.delete_entry("missing");
        store.delete_entry("missing");

        let entries = store.list_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], sample_entry("b"));
        assert_eq!(entries[1].title, "Changed");
    }
}

#[test]
fn test_duplicate_ids_are_both_stored() {
    for backend in BACKENDS {
        let temp_dir = TempDir::new().expect("create temp dir");
        let store = open(temp_dir.path(), backend);
        let mut first = sample_entry("dup");
        first.title = "first".to_string();
        let mut second = sample_entry("dup");
        second.title = "second".to_string();

        store.create_entry(&first);
        store.create_entry(&second);

        let titles: Vec<String> = store.list_entries().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["second", "first"]);
        assert_eq!(store.get_entry("dup").map(|e| e.title).as_deref(), Some("second"));
    }
}

#[test]
fn test_corrupt_entries_file_is_preserved() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let store = open(temp_dir.path(), BackendKind::Files);
    let path = temp_dir.path().join("diaries.json");
    fs::write(&path, "{ this is not a list").expect("write corrupt file");

    assert!(store.list_entries().is_empty());
    store.create_entry(&sample_entry("1"));
    store.delete_entry("1");

    assert_eq!(fs::read_to_string(&path).unwrap(), "{ this is not a list");
}

#[test]
fn test_partial_settings_use_field_defaults() {
    for backend in BACKENDS {
        let temp_dir = TempDir::new().expect("create temp dir");
        let store = open(temp_dir.path(), backend);
        store
            .backend()
            .write(Namespace::Settings, r#"{"characterName":"Mochi"}"#)
            .unwrap();

        let settings = store.get_settings();
        assert_eq!(settings.character_name, "Mochi");
        assert_eq!(settings.nickname, "User");
        assert_eq!(settings.theme_color, "#7C3AED");
    }
}

#[test]
fn test_wire_format_is_camel_case() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let store = open(temp_dir.path(), BackendKind::Files);
    store.set_session(&Session::signed_in("Mina"));

    let raw = fs::read_to_string(temp_dir.path().join("session.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["name"], "Mina");
    assert_eq!(value["isLoggedIn"], true);
}

#[test]
fn test_concurrent_creates_lose_nothing() {
    const THREADS: usize = 4;
    const PER_THREAD: usize = 25;

    for backend in BACKENDS {
        let temp_dir = TempDir::new().expect("create temp dir");
        let store = Arc::new(open(temp_dir.path(), backend));
        let ids = Arc::new(IdGenerator::new());

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let store = Arc::clone(&store);
                let ids = Arc::clone(&ids);
                thread::spawn(move || {
                    for _ in 0..PER_THREAD {
                        let entry = sample_entry(&ids.next_id());
                        store.try_create_entry(&entry).expect("create entry");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("writer thread panicked");
        }

        let entries = store.list_entries();
        let unique: HashSet<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(entries.len(), THREADS * PER_THREAD, "{:?}", backend);
        assert_eq!(unique.len(), THREADS * PER_THREAD);
    }
}

#[test]
fn test_clear_all_then_reopen() {
    for backend in BACKENDS {
        let temp_dir = TempDir::new().expect("create temp dir");
        {
            let store = open(temp_dir.path(), backend);
            store.create_entry(&sample_entry("1"));
            store.set_session(&Session::signed_in("Mina"));
            store.clear_all();
        }

        let store = open(temp_dir.path(), backend);
        assert!(store.list_entries().is_empty());
        assert_eq!(store.get_session(), None);
    }
}
