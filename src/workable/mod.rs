//! Workable API client.
//!
//! - [`WorkableClient`]: cached queries over the jobs endpoints
//! - [`WorkableResult`]: read-only view over one API record
//! - [`HttpTransport`]: the request capability the client depends on, with
//!   [`ReqwestTransport`] as the real implementation

pub mod cache;
pub mod client;
pub mod error;
pub mod result;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{WorkableClient, CACHE_NAME};
pub use error::{Result, WorkableError};
pub use result::{to_snake_case, Field, WorkableResult};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportError};
pub use types::{JobDetail, JobSummary, QueryParams};
