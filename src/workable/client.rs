use chrono::{DateTime, Utc};
use reqwest::header::HeaderValue;
use reqwest::{Method, StatusCode};
use serde_json::{Map, Value};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::cache::WorkableQueryKey;
use super::error::{Result, WorkableError};
use super::result::WorkableResult;
use super::transport::{HttpResponse, HttpTransport};
use super::types::{JobDetail, JobSummary, QueryParams};
use crate::cache::{Cache, CacheNamespace};

/// Name of the shared cache partition used by the client.
pub const CACHE_NAME: &str = "workable";

/// Header carrying the time at which rate-limited requests may resume.
pub const RATE_LIMIT_RESET_HEADER: &str = "x-rate-limit-reset";

/// Sleep used when a 429 response does not say when to retry.
pub const DEFAULT_RATE_LIMIT_SLEEP: Duration = Duration::from_secs(10);

/// Longest sleep a reset header can ask for.
pub const MAX_RATE_LIMIT_SLEEP: Duration = Duration::from_secs(60 * 60);

/// Workable API client with transparent caching.
///
/// Cached entries never expire here; expiry is up to the cache adapter.
/// Requests that hit the rate limit are retried after sleeping until the
/// server's reset time, with no upper bound on attempts.
#[derive(Clone)]
pub struct WorkableClient {
  transport: Arc<dyn HttpTransport>,
  namespace: CacheNamespace,
  cache: OnceLock<Arc<dyn Cache>>,
}

impl WorkableClient {
  /// Create a client that caches in the namespace's shared cache.
  pub fn new(transport: Arc<dyn HttpTransport>, namespace: CacheNamespace) -> Self {
    Self {
      transport,
      namespace,
      cache: OnceLock::new(),
    }
  }

  /// Create a client with its own cache. Flushing still clears `namespace`.
  pub fn with_cache(
    transport: Arc<dyn HttpTransport>,
    namespace: CacheNamespace,
    cache: Arc<dyn Cache>,
  ) -> Self {
    let mut client = Self::new(transport, namespace);
    client.set_cache(cache);
    client
  }

  /// The cache in use, falling back to the namespace's shared cache.
  pub fn cache(&self) -> Arc<dyn Cache> {
    Arc::clone(self.cache.get_or_init(|| self.namespace.cache()))
  }

  pub fn set_cache(&mut self, cache: Arc<dyn Cache>) -> &mut Self {
    self.cache = OnceLock::from(cache);
    self
  }

  /// Clear every entry in the shared namespace, whichever cache this client uses.
  pub fn flush_cache(&self) -> Result<()> {
    Ok(self.namespace.flush()?)
  }

  /// Get all jobs matching `params`.
  ///
  /// Returns an empty list, uncached, when no response could be obtained.
  pub async fn list_jobs(&self, params: &QueryParams) -> Result<Vec<JobSummary>> {
    Ok(self.fetch_listing(params).await?.unwrap_or_default())
  }

  /// Get a single job by shortcode (e.g. `GROOV005`).
  ///
  /// Returns `None`, uncached, if the response has no `id`.
  pub async fn get_job(&self, shortcode: &str, params: &QueryParams) -> Result<Option<JobDetail>> {
    let key = WorkableQueryKey::Job { shortcode, params };
    if let Some(cached) = self.cached::<JobDetail>(&key)? {
      return Ok(Some(cached));
    }

    let response = self
      .call_api(&format!("jobs/{}", shortcode), params, Method::GET)
      .await?;

    if response.get("id").map_or(true, Value::is_null) {
      debug!(shortcode, "Job response has no id, not caching");
      return Ok(None);
    }

    let job = WorkableResult::new(response);
    self.store(&key, &job)?;
    Ok(Some(job))
  }

  /// Get all jobs matching `params`, each populated with its full details.
  ///
  /// This makes one listing call plus one call per job, so use it sparingly.
  /// Jobs whose details could not be fetched are `None`, in listing order.
  pub async fn list_full_jobs(&self, params: &QueryParams) -> Result<Vec<Option<JobDetail>>> {
    let key = WorkableQueryKey::FullJobs { params };
    if let Some(cached) = self.cached::<Vec<Option<JobDetail>>>(&key)? {
      return Ok(cached);
    }

    let Some(summaries) = self.fetch_listing(params).await? else {
      return Ok(Vec::new());
    };

    let mut jobs = Vec::with_capacity(summaries.len());
    for summary in &summaries {
      let job = match summary.get_str("shortcode") {
        Some(shortcode) => self.get_job(shortcode, params).await?,
        None => {
          warn!("Listed job has no shortcode, skipping details");
          None
        }
      };
      jobs.push(job);
    }

    self.store(&key, &jobs)?;
    Ok(jobs)
  }

  /// Send a request to the Workable API and return the JSON object body.
  ///
  /// Rate-limited requests sleep until the reset time from the
  /// `X-Rate-Limit-Reset` header (10s if absent) and are sent again, until
  /// the API answers with something other than 429. Other error statuses are
  /// returned as [`WorkableError::RemoteService`]. If no response arrives at
  /// all, an empty object is returned.
  pub async fn call_api(
    &self,
    path: &str,
    params: &QueryParams,
    method: Method,
  ) -> Result<Map<String, Value>> {
    let mut attempt: u32 = 1;

    loop {
      match self.transport.request(&method, path, params).await {
        Ok(response) => return parse_body(&response),
        Err(err) => {
          let Some(response) = &err.response else {
            debug!(path, error = %err.message, "No response from workable, treating as empty");
            return Ok(Map::new());
          };

          if response.status != StatusCode::TOO_MANY_REQUESTS {
            warn!(
              path,
              status = %response.status,
              error = %err,
              body = %response.body,
              "Failed to retrieve valid response from workable"
            );
            let status = response.status;
            let body = response.body.clone();
            return Err(WorkableError::RemoteService {
              status,
              body,
              source: err,
            });
          }

          let delay = reset_delay(response.header(RATE_LIMIT_RESET_HEADER), Utc::now());
          info!(
            path,
            attempt,
            delay_ms = delay.as_millis() as u64,
            "Rate limit exceeded - sleeping until next interval"
          );
          tokio::time::sleep(delay).await;
          attempt += 1;
        }
      }
    }
  }

  /// Listing shared by `list_jobs` and `list_full_jobs`. `None` means no
  /// usable response was obtained, and nothing was cached.
  async fn fetch_listing(&self, params: &QueryParams) -> Result<Option<Vec<JobSummary>>> {
    let key = WorkableQueryKey::Jobs { params };
    if let Some(cached) = self.cached::<Vec<JobSummary>>(&key)? {
      return Ok(Some(cached));
    }

    let mut response = self.call_api("jobs", params, Method::GET).await?;
    if response.is_empty() {
      return Ok(None);
    }

    let jobs: Vec<JobSummary> = match response.remove("jobs") {
      Some(Value::Array(records)) => records
        .into_iter()
        .enumerate()
        .filter_map(|(position, record)| match record {
          Value::Object(map) => Some(WorkableResult::new(map)),
          other => {
            warn!(
              position,
              record = %other,
              "Listed job is not an object, dropping it"
            );
            None
          }
        })
        .collect(),
      _ => Vec::new(),
    };

    self.store(&key, &jobs)?;
    Ok(Some(jobs))
  }

  fn cached<T: serde::de::DeserializeOwned>(&self, key: &WorkableQueryKey<'_>) -> Result<Option<T>> {
    let cache = self.cache();
    let cache_key = key.cache_key();

    if !cache.has(&cache_key)? {
      debug!(query = %key.description(), "Cache miss");
      return Ok(None);
    }

    match cache.get(&cache_key)? {
      Some(value) => {
        debug!(query = %key.description(), "Cache hit");
        let data = serde_json::from_value(value).map_err(crate::cache::CacheError::from)?;
        Ok(Some(data))
      }
      // Evicted between `has` and `get`
      None => Ok(None),
    }
  }

  fn store<T: serde::Serialize>(&self, key: &WorkableQueryKey<'_>, data: &T) -> Result<()> {
    let value = serde_json::to_value(data).map_err(crate::cache::CacheError::from)?;
    self.cache().set(&key.cache_key(), value)?;
    Ok(())
  }
}

/// Parse a successful response body as a JSON object.
fn parse_body(response: &HttpResponse) -> Result<Map<String, Value>> {
  Ok(serde_json::from_str(&response.body)?)
}

/// How long to sleep for a 429 response, given its first reset header value.
///
/// The value is a unix timestamp (seconds, possibly fractional). A reset time
/// already in the past means no sleep; one further away than
/// [`MAX_RATE_LIMIT_SLEEP`] is capped.
pub fn reset_delay(header: Option<&HeaderValue>, now: DateTime<Utc>) -> Duration {
  let Some(header) = header else {
    return DEFAULT_RATE_LIMIT_SLEEP;
  };

  let Ok(value) = header.to_str() else {
    warn!(value = ?header, "Undecodable rate limit reset header, using default interval");
    return DEFAULT_RATE_LIMIT_SLEEP;
  };
  if value.trim().is_empty() {
    return DEFAULT_RATE_LIMIT_SLEEP;
  }

  let Ok(reset) = value.trim().parse::<f64>() else {
    warn!(value, "Unparsable rate limit reset header, using default interval");
    return DEFAULT_RATE_LIMIT_SLEEP;
  };

  let now_secs = now.timestamp_millis() as f64 / 1000.0;
  let remaining = reset - now_secs;
  if remaining.is_nan() || remaining <= 0.0 {
    return Duration::ZERO;
  }

  match Duration::try_from_secs_f64(remaining) {
    Ok(delay) if delay <= MAX_RATE_LIMIT_SLEEP => delay,
    _ => {
      warn!(value, "Rate limit reset too far ahead, capping sleep");
      MAX_RATE_LIMIT_SLEEP
    }
  }
}
