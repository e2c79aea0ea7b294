use super::backend::StorageBackend;
use super::BackendKind;
use crate::error::{RecipeError, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);";

const RECORDS_KEY: &str = "recipes";

/// Embedded key-value store on SQLite. The whole interchange text is one row;
/// replacing it happens inside a single transaction.
///
/// A store made with [`EmbeddedBackend::deferred`] touches the filesystem only
/// on first use, so an unselected driver leaves no database behind.
pub struct EmbeddedBackend {
    conn: Mutex<Option<Connection>>,
    path: Option<PathBuf>,
}

impl EmbeddedBackend {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = connect(path)?;
        Ok(Self {
            conn: Mutex::new(Some(conn)),
            path: Some(path.to_path_buf()),
        })
    }

    /// Remember `path`; the database is created when the driver is first probed.
    pub fn deferred(path: &Path) -> Self {
        Self {
            conn: Mutex::new(None),
            path: Some(path.to_path_buf()),
        }
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(Some(conn)),
            path: None,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.guard().is_some()
    }

    fn guard(&self) -> MutexGuard<'_, Option<Connection>> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn with_conn<T>(&self, f: impl FnOnce(&mut Connection) -> Result<T>) -> Result<T> {
        let mut guard = self.guard();
        if guard.is_none() {
            let path = self
                .path
                .as_deref()
                .ok_or_else(|| RecipeError::Store("Embedded store has no path".to_string()))?;
            *guard = Some(connect(path)?);
        }
        match guard.as_mut() {
            Some(conn) => f(conn),
            None => Err(RecipeError::Store("Embedded store is not connected".to_string())),
        }
    }
}

fn connect(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(RecipeError::Io)?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA busy_timeout = 5000;",
    )?;
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(conn)
}

impl StorageBackend for EmbeddedBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::EmbeddedStore
    }

    fn probe(&self) -> bool {
        self.with_conn(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM kv", [], |row| row.get::<_, i64>(0))?)
        })
        .is_ok()
    }

    fn read_all(&self) -> Result<Option<String>> {
        self.with_conn(|conn| {
            let text = conn
                .query_row(
                    "SELECT value FROM kv WHERE key = ?1",
                    params![RECORDS_KEY],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;
            Ok(text)
        })
    }

    fn write_all(&self, text: &str) -> Result<()> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![RECORDS_KEY, text, Utc::now().to_rfc3339()],
            )?;
            tx.commit()?;
            Ok(())
        })
    }

    fn location(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => ":memory:".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_reads_none() {
        let backend = EmbeddedBackend::open_in_memory().unwrap();
        assert!(backend.probe());
        assert!(backend.read_all().unwrap().is_none());
    }

    #[test]
    fn test_write_replaces_previous_text() {
        let backend = EmbeddedBackend::open_in_memory().unwrap();
        backend.write_all("first").unwrap();
        backend.write_all("second").unwrap();
        assert_eq!(backend.read_all().unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_no_sub_areas() {
        let backend = EmbeddedBackend::open_in_memory().unwrap();
        assert!(matches!(
            backend.ensure_sub_area("images"),
            Err(RecipeError::AssetAreaUnavailable(BackendKind::EmbeddedStore))
        ));
    }

    #[test]
    fn test_deferred_connects_on_first_use() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("recipes.db");
        let backend = EmbeddedBackend::deferred(&path);
        assert!(!backend.is_connected());
        assert!(!path.exists());

        assert!(backend.probe());
        assert!(backend.is_connected());
        assert!(path.exists());
        backend.write_all("id,title").unwrap();
        assert_eq!(backend.read_all().unwrap().as_deref(), Some("id,title"));
    }
}
