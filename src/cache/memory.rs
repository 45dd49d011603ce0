//! In-process cache adapter.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use super::traits::{Cache, CacheError};

/// Cache that keeps values in a process-local map.
/// Contents are lost when the adapter is dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
  entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of stored entries.
  pub fn len(&self) -> usize {
    self.entries.lock().map(|e| e.len()).unwrap_or(0)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl Cache for MemoryStorage {
  fn has(&self, key: &str) -> Result<bool, CacheError> {
    let entries = self
      .entries
      .lock()
      .map_err(|e| CacheError::LockPoisoned(e.to_string()))?;
    Ok(entries.contains_key(key))
  }

  fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
    let entries = self
      .entries
      .lock()
      .map_err(|e| CacheError::LockPoisoned(e.to_string()))?;
    Ok(entries.get(key).cloned())
  }

  fn set(&self, key: &str, value: Value) -> Result<(), CacheError> {
    let mut entries = self
      .entries
      .lock()
      .map_err(|e| CacheError::LockPoisoned(e.to_string()))?;
    entries.insert(key.to_string(), value);
    Ok(())
  }

  fn clear(&self) -> Result<(), CacheError> {
    let mut entries = self
      .entries
      .lock()
      .map_err(|e| CacheError::LockPoisoned(e.to_string()))?;
    entries.clear();
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_set_then_get() {
    let cache = MemoryStorage::new();
    assert!(!cache.has("Jobs").unwrap());

    cache.set("Jobs", json!([{"title": "Job 1"}])).unwrap();

    assert!(cache.has("Jobs").unwrap());
    assert_eq!(cache.get("Jobs").unwrap(), Some(json!([{"title": "Job 1"}])));
    assert_eq!(cache.get("missing").unwrap(), None);
  }

  #[test]
  fn test_set_replaces_value() {
    let cache = MemoryStorage::new();
    cache.set("Job-G1", json!({"id": 1})).unwrap();
    cache.set("Job-G1", json!({"id": 2})).unwrap();

    assert_eq!(cache.get("Job-G1").unwrap(), Some(json!({"id": 2})));
    assert_eq!(cache.len(), 1);
  }

  #[test]
  fn test_clear_removes_everything() {
    let cache = MemoryStorage::new();
    cache.set("a", json!(1)).unwrap();
    cache.set("b", json!(2)).unwrap();

    cache.clear().unwrap();

    assert!(cache.is_empty());
    assert!(!cache.has("a").unwrap());
  }
}
