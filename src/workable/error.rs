use reqwest::StatusCode;

use super::transport::TransportError;
use crate::cache::CacheError;

/// Errors surfaced by the Workable client.
///
/// Rate limiting (HTTP 429) never appears here: it is retried internally.
/// Transport failures that carry no response are absorbed as "no data".
#[derive(Debug, thiserror::Error)]
pub enum WorkableError {
  /// Missing subdomain or API key. Raised before any request is sent.
  #[error("configuration error: {0}")]
  Configuration(String),

  /// The API answered with a non-success, non-429 status.
  #[error("Workable API returned {status}: {source}")]
  RemoteService {
    status: StatusCode,
    body: String,
    #[source]
    source: TransportError,
  },

  /// A successful response whose body is not a JSON object.
  #[error("failed to parse Workable response: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("invalid request URL: {0}")]
  InvalidUrl(#[from] url::ParseError),

  #[error(transparent)]
  Cache(#[from] CacheError),
}

pub type Result<T, E = WorkableError> = std::result::Result<T, E>;
