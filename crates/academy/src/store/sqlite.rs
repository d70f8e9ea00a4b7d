//! `SQLite`-backed key-value medium.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::backend::Backend;
use super::migrations;

/// Durable backend storing one row per collection key.
#[derive(Debug)]
pub struct SqliteBackend {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl SqliteBackend {
    /// Open or create a database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn upsert(conn: &Connection, key: &str, value: &str) -> Result<()> {
        conn.execute(
            r"
            INSERT INTO collections (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value],
        )?;
        Ok(())
    }
}

impl Backend for SqliteBackend {
    fn size_bytes(&self) -> u64 {
        if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map_or(0, |m| m.len())
        }
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM collections WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        Self::upsert(&self.conn, key, value)?;
        debug!("Wrote {} ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM collections WHERE key = ?1", [key])?;
        Ok(())
    }

    fn write_batch(&self, entries: &[(&str, String)]) -> Result<()> {
        // Rolled back on drop if any upsert fails
        let tx = self.conn.unchecked_transaction()?;
        for (key, value) in entries {
            Self::upsert(&tx, key, value)?;
        }
        tx.commit()?;
        debug!("Committed batch of {} keys", entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_backend() -> SqliteBackend {
        SqliteBackend::open_in_memory().expect("failed to create test backend")
    }

    #[test]
    fn test_read_missing_key() {
        let backend = create_test_backend();
        assert!(backend.read("nope").unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let backend = create_test_backend();
        backend.write("distinctive_students", "[]").unwrap();
        assert_eq!(
            backend.read("distinctive_students").unwrap(),
            Some("[]".to_string())
        );
    }

    #[test]
    fn test_write_replaces_value() {
        let backend = create_test_backend();
        backend.write("k", "first").unwrap();
        backend.write("k", "second").unwrap();
        assert_eq!(backend.read("k").unwrap(), Some("second".to_string()));

        let rows: i64 = backend
            .conn
            .query_row("SELECT COUNT(*) FROM collections", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_remove() {
        let backend = create_test_backend();
        backend.write("k", "v").unwrap();
        backend.remove("k").unwrap();
        assert!(backend.read("k").unwrap().is_none());
    }

    #[test]
    fn test_write_batch_commits_all() {
        let backend = create_test_backend();
        backend
            .write_batch(&[("a", "1".to_string()), ("b", "2".to_string())])
            .unwrap();
        assert_eq!(backend.read("a").unwrap(), Some("1".to_string()));
        assert_eq!(backend.read("b").unwrap(), Some("2".to_string()));
    }

    #[test]
    fn test_write_batch_rolls_back_on_failure() {
        let backend = create_test_backend();
        backend.write("a", "original").unwrap();

        // A trigger that rejects key "b" makes the second upsert fail
        backend
            .conn
            .execute_batch(
                r"
                CREATE TRIGGER reject_b BEFORE INSERT ON collections
                WHEN NEW.key = 'b'
                BEGIN SELECT RAISE(ABORT, 'rejected'); END;
                ",
            )
            .unwrap();

        let result = backend.write_batch(&[("a", "changed".to_string()), ("b", "2".to_string())]);
        assert!(result.is_err());
        assert_eq!(backend.read("a").unwrap(), Some("original".to_string()));
        assert!(backend.read("b").unwrap().is_none());
    }

    #[test]
    fn test_path_in_memory() {
        let backend = create_test_backend();
        assert_eq!(backend.path().to_string_lossy(), ":memory:");
        assert_eq!(backend.size_bytes(), 0);
    }

    #[test]
    fn test_open_file_based_persists() {
        let db_path =
            std::env::temp_dir().join(format!("academy_sqlite_test_{}.db", std::process::id()));

        {
            let backend = SqliteBackend::open(&db_path).unwrap();
            backend.write("k", "kept").unwrap();
            assert_eq!(backend.path(), db_path);
            assert!(backend.size_bytes() > 0);
        }

        let reopened = SqliteBackend::open(&db_path).unwrap();
        assert_eq!(reopened.read("k").unwrap(), Some("kept".to_string()));

        let boxed: Box<dyn Backend> = Box::new(reopened);
        assert!(boxed.size_bytes() > 0);

        drop(boxed);
        let _ = std::fs::remove_file(&db_path);
        let _ = std::fs::remove_file(db_path.with_extension("db-wal"));
        let _ = std::fs::remove_file(db_path.with_extension("db-shm"));
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let root = std::env::temp_dir().join(format!("academy_test_{}", std::process::id()));
        let nested_path = root.join("nested/academy.db");
        let _ = std::fs::remove_dir_all(&root);

        let backend = SqliteBackend::open(&nested_path).unwrap();
        assert!(nested_path.exists());

        drop(backend);
        let _ = std::fs::remove_dir_all(&root);
    }
}
