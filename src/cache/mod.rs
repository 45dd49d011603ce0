//! Generic key-value caching for API results.
//!
//! This module knows nothing about Workable. It provides:
//! - The [`Cache`] capability (`has`/`get`/`set`/`clear`) the client depends on
//! - An in-memory adapter and a persistent SQLite adapter
//! - [`CacheNamespace`], a shared handle over one logical partition that can be flushed in bulk
//!
//! Adapters store `serde_json::Value`s and enforce no expiry of their own.

mod memory;
mod namespace;
mod storage;
mod traits;

pub use memory::MemoryStorage;
pub use namespace::CacheNamespace;
pub use storage::SqliteStorage;
pub use traits::{Cache, CacheError};
