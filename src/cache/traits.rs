//! Core trait and error type for the caching system.

use serde_json::Value;

/// Errors raised by cache adapters.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
  #[error("cache database error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("failed to (de)serialize cached value: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("cache io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("lock poisoned: {0}")]
  LockPoisoned(String),

  #[error("could not determine data directory")]
  NoDataDir,
}

/// Key-value store capability.
///
/// Implementors own their eviction policy; callers never assume a TTL.
/// All methods take `&self` so a single adapter can be shared behind an `Arc`.
pub trait Cache: Send + Sync {
  /// Whether a value is stored under `key`.
  fn has(&self, key: &str) -> Result<bool, CacheError>;

  /// Get the value stored under `key`, if any.
  fn get(&self, key: &str) -> Result<Option<Value>, CacheError>;

  /// Store `value` under `key`, replacing any previous value.
  fn set(&self, key: &str, value: Value) -> Result<(), CacheError>;

  /// Remove every entry.
  fn clear(&self) -> Result<(), CacheError>;
}
