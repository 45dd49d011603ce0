//! Shared handle over one logical cache partition.

use std::sync::Arc;

use super::memory::MemoryStorage;
use super::storage::SqliteStorage;
use super::traits::{Cache, CacheError};

/// A named cache partition shared by every client that holds a clone.
///
/// Flushing goes through this handle rather than through whichever cache a
/// particular client had injected.
#[derive(Clone)]
pub struct CacheNamespace {
  name: String,
  cache: Arc<dyn Cache>,
}

impl CacheNamespace {
  pub fn new(name: impl Into<String>, cache: Arc<dyn Cache>) -> Self {
    Self {
      name: name.into(),
      cache,
    }
  }

  /// Namespace backed by a fresh in-memory store.
  pub fn memory(name: impl Into<String>) -> Self {
    Self::new(name, Arc::new(MemoryStorage::new()))
  }

  /// Namespace backed by the SQLite database at the default location.
  pub fn sqlite(name: impl Into<String>) -> Result<Self, CacheError> {
    let name = name.into();
    let storage = SqliteStorage::open(&name)?;
    Ok(Self::new(name, Arc::new(storage)))
  }

  /// Namespace backed by the SQLite database at `path`.
  pub fn sqlite_at(name: impl Into<String>, path: &std::path::Path) -> Result<Self, CacheError> {
    let name = name.into();
    let storage = SqliteStorage::open_at(path, &name)?;
    Ok(Self::new(name, Arc::new(storage)))
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// The shared cache for this namespace.
  pub fn cache(&self) -> Arc<dyn Cache> {
    Arc::clone(&self.cache)
  }

  /// Clear every entry in the namespace.
  pub fn flush(&self) -> Result<(), CacheError> {
    tracing::debug!(namespace = %self.name, "Flushing cache namespace");
    self.cache.clear()
  }
}

impl std::fmt::Debug for CacheNamespace {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CacheNamespace")
      .field("name", &self.name)
      .finish_non_exhaustive()
  }
}
