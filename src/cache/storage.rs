//! SQLite cache adapter.

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::traits::{Cache, CacheError};

/// SQLite-based cache storage.
///
/// Every row belongs to a namespace, so several logical caches can share one
/// database file and `clear` only touches its own partition.
pub struct SqliteStorage {
  conn: Mutex<Connection>,
  namespace: String,
}

impl SqliteStorage {
  /// Open (or create) the cache database at the default location.
  pub fn open(namespace: &str) -> Result<Self, CacheError> {
    let path = Self::default_path()?;
    Self::open_at(&path, namespace)
  }

  /// Open (or create) the cache database at `path`.
  pub fn open_at(path: &Path, namespace: &str) -> Result<Self, CacheError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;
    Self::with_connection(conn, namespace)
  }

  /// Cache backed by a private in-memory database.
  pub fn in_memory(namespace: &str) -> Result<Self, CacheError> {
    Self::with_connection(Connection::open_in_memory()?, namespace)
  }

  fn with_connection(conn: Connection, namespace: &str) -> Result<Self, CacheError> {
    let storage = Self {
      conn: Mutex::new(conn),
      namespace: namespace.to_string(),
    };
    storage.run_migrations()?;

    Ok(storage)
  }

  /// Get the default database path.
  pub fn default_path() -> Result<PathBuf, CacheError> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or(CacheError::NoDataDir)?;

    Ok(data_dir.join("workable").join("cache.db"))
  }

  pub fn namespace(&self) -> &str {
    &self.namespace
  }

  /// Run database migrations for cache tables.
  fn run_migrations(&self) -> Result<(), CacheError> {
    self.lock()?.execute_batch(CACHE_SCHEMA)?;
    Ok(())
  }

  fn lock(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
    self
      .conn
      .lock()
      .map_err(|e| CacheError::LockPoisoned(e.to_string()))
  }
}

/// Schema for cache tables.
const CACHE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS cache_entries (
    namespace TEXT NOT NULL,
    key_hash TEXT NOT NULL,
    cache_key TEXT NOT NULL,
    data BLOB NOT NULL,
    cached_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (namespace, key_hash)
);
"#;

/// SHA256 hash for stable, fixed-length keys.
fn hash_key(key: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(key.as_bytes());
  hex::encode(hasher.finalize())
}

impl Cache for SqliteStorage {
  fn has(&self, key: &str) -> Result<bool, CacheError> {
    let conn = self.lock()?;
    let found: Option<i64> = conn
      .query_row(
        "SELECT 1 FROM cache_entries WHERE namespace = ? AND key_hash = ?",
        params![self.namespace, hash_key(key)],
        |row| row.get(0),
      )
      .optional()?;

    Ok(found.is_some())
  }

  fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
    let conn = self.lock()?;
    let data: Option<Vec<u8>> = conn
      .query_row(
        "SELECT data FROM cache_entries WHERE namespace = ? AND key_hash = ?",
        params![self.namespace, hash_key(key)],
        |row| row.get(0),
      )
      .optional()?;

    match data {
      Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
      None => Ok(None),
    }
  }

  fn set(&self, key: &str, value: Value) -> Result<(), CacheError> {
    let data = serde_json::to_vec(&value)?;
    let conn = self.lock()?;

    conn.execute(
      "INSERT OR REPLACE INTO cache_entries (namespace, key_hash, cache_key, data, cached_at)
       VALUES (?, ?, ?, ?, datetime('now'))",
      params![self.namespace, hash_key(key), key, data],
    )?;

    Ok(())
  }

  fn clear(&self) -> Result<(), CacheError> {
    let conn = self.lock()?;
    conn.execute(
      "DELETE FROM cache_entries WHERE namespace = ?",
      params![self.namespace],
    )?;
    Ok(())
  }
}
