//! SQLite backend for the record store.
//!
//! All namespaces live in a single `records` table, one row per namespace.
//! Connections come from an r2d2 pool; a read-modify-write runs inside an
//! `IMMEDIATE` transaction, which takes SQLite's write lock up front and so
//! serializes writers across threads and processes alike.
//!
//! # Example
//!
//! ```no_run
//! use buddy_diary::db::Database;
//! use std::path::Path;
//!
//! let db = Database::open(Path::new("/tmp/buddy-diary.db"))?;
//! db.initialize_schema()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod schema;

use crate::constants::{DB_BUSY_TIMEOUT_MS, DB_POOL_MAX_SIZE};
use crate::errors::StorageError;
use crate::store::backend::{Modifier, Namespace, StorageBackend};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, TransactionBehavior};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Type alias for a pooled SQLite connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Database handle with connection pooling.
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("connections", &self.pool.state().connections)
            .finish()
    }
}

impl Database {
    /// Opens or creates the database file at `db_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened as a SQLite database or
    /// the connection pool cannot be initialized.
    pub fn open(db_path: &Path) -> Result<Self, StorageError> {
        debug!("Opening database at: {:?}", db_path);

        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder()
            .max_size(DB_POOL_MAX_SIZE)
            .connection_customizer(Box::new(BusyTimeout {
                timeout: Duration::from_millis(DB_BUSY_TIMEOUT_MS),
            }))
            .build(manager)?;

        // Fail early on files that are not SQLite databases
        let conn = pool.get()?;
        conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))?;
        drop(conn);

        info!("Database opened successfully");
        Ok(Database { pool })
    }

    /// Gets a connection from the pool.
    pub fn get_conn(&self) -> Result<PooledConnection, StorageError> {
        Ok(self.pool.get()?)
    }

    /// Creates the schema if it does not exist yet. Safe to call repeatedly.
    pub fn initialize_schema(&self) -> Result<(), StorageError> {
        let conn = self.get_conn()?;
        schema::create_tables(&conn)?;
        info!("Database schema initialized");
        Ok(())
    }
}

/// Connection customizer that makes writers wait for the lock instead of
/// failing with `SQLITE_BUSY` straight away.
#[derive(Debug)]
struct BusyTimeout {
    timeout: Duration,
}

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for BusyTimeout {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        conn.busy_timeout(self.timeout)
    }
}

fn read_value(conn: &Connection, namespace: Namespace) -> Result<Option<String>, StorageError> {
    let result = conn.query_row(
        "SELECT value FROM records WHERE namespace = ?1",
        params![namespace.key()],
        |row| row.get(0),
    );

    match result {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn upsert_value(conn: &Connection, namespace: Namespace, value: &str) -> Result<(), StorageError> {
    conn.execute(
        r#"
        INSERT INTO records (namespace, value, updated_at)
        VALUES (?1, ?2, CURRENT_TIMESTAMP)
        ON CONFLICT(namespace) DO UPDATE SET
            value = excluded.value,
            updated_at = CURRENT_TIMESTAMP
        "#,
        params![namespace.key(), value],
    )?;
    debug!("Upserted {} ({} bytes)", namespace, value.len());
    Ok(())
}

impl StorageBackend for Database {
    fn read(&self, namespace: Namespace) -> Result<Option<String>, StorageError> {
        let conn = self.get_conn()?;
        read_value(&conn, namespace)
    }

    fn write(&self, namespace: Namespace, value: &str) -> Result<(), StorageError> {
        let conn = self.get_conn()?;
        upsert_value(&conn, namespace, value)
    }

    fn modify(&self, namespace: Namespace, apply: &mut Modifier<'_>) -> Result<(), StorageError> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current = read_value(&tx, namespace)?;
        // Dropping an uncommitted transaction rolls it back
        if let Some(updated) = apply(current.as_deref())? {
            upsert_value(&tx, namespace, &updated)?;
        }

        tx.commit()?;
        Ok(())
    }

    fn remove(&self, namespace: Namespace) -> Result<(), StorageError> {
        let conn = self.get_conn()?;
        conn.execute(
            "DELETE FROM records WHERE namespace = ?1",
            params![namespace.key()],
        )?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let conn = self.get_conn()?;
        let removed = conn.execute("DELETE FROM records", [])?;
        info!("Cleared {} records", removed);
        Ok(())
    }
}
