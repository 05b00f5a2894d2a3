//! SQLite-backed transient store.

use super::traits::TransientStore;
use crate::error::{DirectoryError, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

/// Persistent transient store.
///
/// Entries survive restarts; expired rows are skipped on read and removed by
/// [`cleanup_expired`](SqliteTransientStore::cleanup_expired). Thread-safe via
/// an internal mutex on the connection.
pub struct SqliteTransientStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTransientStore {
    /// Open (or create) a store at the specified database path.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DirectoryError::Io {
                message: format!("Failed to create cache directory: {}", e),
                path: Some(parent.to_path_buf()),
                source: Some(e),
            })?;
        }

        let conn = Connection::open(db_path).map_err(|e| DirectoryError::Database {
            message: format!("Failed to open cache database: {}", e),
            source: Some(e),
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(|e| DirectoryError::Database {
                message: format!("Failed to set pragmas: {}", e),
                source: Some(e),
            })?;

        Self::from_connection(conn)
    }

    /// Open a private in-memory database.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS transients (
                key TEXT PRIMARY KEY,
                value BLOB NOT NULL,
                stored_at INTEGER NOT NULL,
                expires_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_transients_expires
                ON transients(expires_at);
            "#,
        )
        .map_err(|e| DirectoryError::Database {
            message: format!("Failed to initialize cache schema: {}", e),
            source: Some(e),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| DirectoryError::Database {
            message: format!("Failed to lock database: {}", e),
            source: None,
        })
    }

    /// Delete expired rows. Returns the number removed.
    pub fn cleanup_expired(&self) -> Result<usize> {
        let conn = self.lock()?;
        let removed = conn.execute(
            "DELETE FROM transients WHERE expires_at <= ?1",
            params![Utc::now().timestamp_millis()],
        )?;
        if removed > 0 {
            debug!("Removed {} expired transients", removed);
        }
        Ok(removed)
    }

    /// Number of rows, expired or not.
    pub fn len(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM transients", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl TransientStore for SqliteTransientStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT value FROM transients WHERE key = ?1 AND expires_at > ?2",
            params![key, Utc::now().timestamp_millis()],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| DirectoryError::Database {
            message: format!("Failed to query transient: {}", e),
            source: Some(e),
        })
    }

    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let now = Utc::now().timestamp_millis();
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let expires_at = now.saturating_add(ttl_ms);

        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO transients (key, value, stored_at, expires_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![key, value, now, expires_at],
        )
        .map_err(|e| DirectoryError::Database {
            message: format!("Failed to store transient: {}", e),
            source: Some(e),
        })?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM transients WHERE key = ?1", params![key])?;
        Ok(deleted > 0)
    }

    fn clear(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM transients", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, SqliteTransientStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteTransientStore::new(temp_dir.path().join("transients.sqlite")).unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_set_and_get() {
        let (_temp, store) = create_test_store();
        store
            .set("key1", b"hello world", Duration::from_secs(3600))
            .unwrap();

        assert_eq!(store.get("key1").unwrap(), Some(b"hello world".to_vec()));
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_expiration_and_cleanup() {
        let (_temp, store) = create_test_store();
        store.set("expired", b"old", Duration::ZERO).unwrap();
        store.set("fresh", b"new", Duration::from_secs(3600)).unwrap();

        assert_eq!(store.get("expired").unwrap(), None);
        assert_eq!(store.len().unwrap(), 2);

        assert_eq!(store.cleanup_expired().unwrap(), 1);
        assert_eq!(store.len().unwrap(), 1);
        assert!(store.get("fresh").unwrap().is_some());
    }

    #[test]
    fn test_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("transients.sqlite");

        {
            let store = SqliteTransientStore::new(&path).unwrap();
            store.set("key1", b"persisted", Duration::from_secs(3600)).unwrap();
        }

        let reopened = SqliteTransientStore::new(&path).unwrap();
        assert_eq!(reopened.get("key1").unwrap(), Some(b"persisted".to_vec()));
    }

    #[test]
    fn test_delete_and_clear() {
        let store = SqliteTransientStore::in_memory().unwrap();
        store.set("key1", b"a", Duration::from_secs(60)).unwrap();
        store.set("key2", b"b", Duration::from_secs(60)).unwrap();

        assert!(store.delete("key1").unwrap());
        assert!(!store.delete("key1").unwrap());

        store.clear().unwrap();
        assert!(store.is_empty().unwrap());
    }
}
