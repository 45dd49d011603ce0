//! Cached client for the Workable jobs API.
//!
//! ```ignore
//! let config = Config::load(None)?;
//! let client = WorkableClient::new(Arc::new(config.transport()?), config.cache_namespace()?);
//!
//! let params = QueryParams::new().with("state", "published");
//! for job in client.list_jobs(&params).await? {
//!     println!("{:?}", job.get_str("FullTitle"));
//! }
//! ```

pub mod cache;
pub mod config;
pub mod workable;

pub use cache::{Cache, CacheError, CacheNamespace, MemoryStorage, SqliteStorage};
pub use config::Config;
pub use workable::{
  Field, HttpTransport, JobDetail, JobSummary, QueryParams, ReqwestTransport, WorkableClient,
  WorkableError, WorkableResult,
};
