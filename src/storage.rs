//! Snapshot persistence for the task list.
//!
//! A snapshot is the whole list serialized as one JSON array and stored under
//! a single key. Every save overwrites the previous snapshot.

use crate::error::{Result, TodoError};
use crate::models::Task;
use rusqlite::{Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

/// Key the list snapshot is stored under unless configured otherwise
pub const DEFAULT_KEY: &str = "todoListData";

/// Synchronous key-value persistence used by `TaskList`
pub trait Storage {
    /// True if a non-empty snapshot is stored under the key
    fn exists(&self) -> Result<bool>;

    /// Serialize and store the full list, replacing any prior snapshot
    fn save(&self, tasks: &[Task]) -> Result<()>;

    /// Read the snapshot back. Callers are expected to check `exists` first.
    fn load(&self) -> Result<Vec<Task>>;
}

fn encode(tasks: &[Task]) -> Result<String> {
    Ok(serde_json::to_string(tasks)?)
}

fn decode(key: &str, raw: Option<String>) -> Result<Vec<Task>> {
    let raw = raw.ok_or_else(|| TodoError::SnapshotMissing(key.to_string()))?;
    serde_json::from_str(&raw).map_err(|source| TodoError::Deserialization {
        key: key.to_string(),
        source,
    })
}

// ==================== In-memory ====================

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, String>,
    saves: usize,
}

/// In-memory storage. Clones share the same backing map, so a test can keep
/// one handle while the list owns another.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    key: String,
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::with_key(DEFAULT_KEY)
    }

    pub fn with_key(key: impl Into<String>) -> Self {
        MemoryStorage {
            key: key.into(),
            inner: Rc::new(RefCell::new(MemoryInner::default())),
        }
    }

    /// Number of `save` calls made through any handle
    pub fn save_count(&self) -> usize {
        self.inner.borrow().saves
    }

    /// Raw snapshot text, if any
    pub fn raw(&self) -> Option<String> {
        self.inner.borrow().entries.get(&self.key).cloned()
    }

    /// Plant raw snapshot text without counting it as a save
    pub fn put_raw(&self, value: impl Into<String>) {
        self.inner
            .borrow_mut()
            .entries
            .insert(self.key.clone(), value.into());
    }

    pub fn remove(&self) {
        self.inner.borrow_mut().entries.remove(&self.key);
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemoryStorage {
    fn exists(&self) -> Result<bool> {
        Ok(self
            .inner
            .borrow()
            .entries
            .get(&self.key)
            .is_some_and(|v| !v.is_empty()))
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        let raw = encode(tasks)?;
        let mut inner = self.inner.borrow_mut();
        inner.entries.insert(self.key.clone(), raw);
        inner.saves += 1;
        Ok(())
    }

    fn load(&self) -> Result<Vec<Task>> {
        decode(&self.key, self.raw())
    }
}

// ==================== SQLite ====================

/// SQLite-backed storage: a single `kv` table holding the snapshot text
pub struct SqliteStorage {
    conn: Connection,
    key: String,
}

impl SqliteStorage {
    /// Open (or create) the database file and ensure the table exists
    pub fn open<P: AsRef<Path>>(path: P, key: impl Into<String>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::init(conn, key.into())
    }

    pub fn open_in_memory(key: impl Into<String>) -> Result<Self> {
        Self::init(Connection::open_in_memory()?, key.into())
    }

    fn init(conn: Connection, key: String) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(SqliteStorage { conn, key })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw snapshot text, if any
    pub fn raw(&self) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [&self.key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|e| e.into())
    }

    /// Delete the snapshot
    pub fn remove(&self) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", [&self.key])?;
        tracing::debug!(key = %self.key, "snapshot removed");
        Ok(())
    }
}

impl Storage for SqliteStorage {
    fn exists(&self) -> Result<bool> {
        Ok(self.raw()?.is_some_and(|v| !v.is_empty()))
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        let raw = encode(tasks)?;
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            (&self.key, &raw),
        )?;
        tracing::trace!(key = %self.key, tasks = tasks.len(), "snapshot saved");
        Ok(())
    }

    fn load(&self) -> Result<Vec<Task>> {
        decode(&self.key, self.raw()?)
    }
}
