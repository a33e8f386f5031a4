//! Durable key-value storage behind the state engine
//!
//! The engine only ever calls `read` once at construction and `write` on
//! state changes; failures on either side degrade to in-memory operation
//! for the session, they are never surfaced to the user.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

/// Storage boundary for persisted tree state.
///
/// Keys are caller-derived (`{namespace}-expand`, `{namespace}-checked`);
/// values are plain JSON. A store that cannot produce a value returns
/// `None` and the caller falls back to its defaults.
pub trait StateStore {
    fn read(&self, key: &str) -> Option<Value>;
    fn write(&self, key: &str, value: &Value) -> Result<()>;
}

/// In-memory store; the substitution point for tests and for running
/// without persistence. Clones share their contents, so several engines
/// (or a test and its engine) can observe the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn read(&self, key: &str) -> Option<Value> {
        self.entries.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, value: &Value) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        Ok(())
    }
}

/// One JSON object per file, key -> value, rewritten on every write.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default location under the platform data directory.
    pub fn default_path() -> PathBuf {
        use directories::ProjectDirs;

        if let Some(proj_dirs) = ProjectDirs::from("", "", "task-tracker") {
            proj_dirs.data_dir().join("state.json")
        } else {
            PathBuf::from(".task-tracker-state.json")
        }
    }

    fn load_map(&self) -> serde_json::Map<String, Value> {
        if let Ok(content) = std::fs::read_to_string(&self.path) {
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            serde_json::Map::default()
        }
    }
}

impl StateStore for JsonFileStore {
    fn read(&self, key: &str) -> Option<Value> {
        self.load_map().get(key).cloned()
    }

    fn write(&self, key: &str, value: &Value) -> Result<()> {
        let mut map = self.load_map();
        map.insert(key.to_string(), value.clone());
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&map)?;
        std::fs::write(&self.path, content)?;
        tracing::debug!(key, path = %self.path.display(), "state written");
        Ok(())
    }
}

/// SQLite-backed store: a single `kv` table keyed by namespace-derived key.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at the given path and make sure the
    /// schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// In-memory database, for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )
    }
}

impl StateStore for SqliteStore {
    fn read(&self, key: &str) -> Option<Value> {
        let text: Option<String> = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .ok()
            .flatten();
        // Corrupt stored values behave as absent
        text.and_then(|t| serde_json::from_str(&t).ok())
    }

    fn write(&self, key: &str, value: &Value) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value.to_string()],
        )?;
        Ok(())
    }
}
