//! HTTP transport capability and its reqwest implementation.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Method, StatusCode};
use std::time::Duration;
use url::Url;

use super::error::{Result, WorkableError};
use super::types::QueryParams;

/// Default request timeout for [`ReqwestTransport`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A response as seen by the client.
#[derive(Debug, Clone)]
pub struct HttpResponse {
  pub status: StatusCode,
  pub headers: HeaderMap,
  pub body: String,
}

impl HttpResponse {
  pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
    Self {
      status,
      headers: HeaderMap::new(),
      body: body.into(),
    }
  }

  pub fn ok(body: impl Into<String>) -> Self {
    Self::new(StatusCode::OK, body)
  }

  /// First value of header `name`, undecoded.
  pub fn header(&self, name: &str) -> Option<&HeaderValue> {
    self.headers.get(name)
  }
}

/// A failed request. `response` is set when the server answered with a
/// non-success status and empty when no response arrived at all.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
  pub message: String,
  pub response: Option<HttpResponse>,
}

impl TransportError {
  pub fn with_response(message: impl Into<String>, response: HttpResponse) -> Self {
    Self {
      message: message.into(),
      response: Some(response),
    }
  }

  pub fn without_response(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
      response: None,
    }
  }
}

/// Capability to issue a request against the API.
///
/// Implementations must return non-2xx statuses as `Err` carrying the response.
#[async_trait]
pub trait HttpTransport: Send + Sync {
  async fn request(
    &self,
    method: &Method,
    path: &str,
    query: &QueryParams,
  ) -> std::result::Result<HttpResponse, TransportError>;
}

/// Transport talking to `https://{subdomain}.workable.com/spi/v3/`.
#[derive(Clone)]
pub struct ReqwestTransport {
  client: reqwest::Client,
  base_url: Url,
  api_key: String,
}

impl ReqwestTransport {
  /// Build a transport. Fails if the subdomain or API key is empty.
  pub fn new(subdomain: &str, api_key: &str) -> Result<Self> {
    Self::with_timeout(subdomain, api_key, DEFAULT_TIMEOUT)
  }

  pub fn with_timeout(subdomain: &str, api_key: &str, timeout: Duration) -> Result<Self> {
    let subdomain = subdomain.trim();
    if subdomain.is_empty() {
      return Err(WorkableError::Configuration(
        "Workable subdomain is not set".to_string(),
      ));
    }
    if api_key.trim().is_empty() {
      return Err(WorkableError::Configuration(
        "Workable API key is not set".to_string(),
      ));
    }

    let base_url = Url::parse(&format!("https://{}.workable.com/spi/v3/", subdomain))?;

    let client = reqwest::Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| WorkableError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self {
      client,
      base_url,
      api_key: api_key.to_string(),
    })
  }

  pub fn base_url(&self) -> &Url {
    &self.base_url
  }

  /// Absolute URL for an API path such as `jobs/GROOV001`.
  pub fn url_for(&self, path: &str) -> Result<Url> {
    Ok(self.base_url.join(path.trim_start_matches('/'))?)
  }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
  async fn request(
    &self,
    method: &Method,
    path: &str,
    query: &QueryParams,
  ) -> std::result::Result<HttpResponse, TransportError> {
    let url = self
      .url_for(path)
      .map_err(|e| TransportError::without_response(e.to_string()))?;

    let response = self
      .client
      .request(method.clone(), url)
      .bearer_auth(&self.api_key)
      .header(ACCEPT, "application/json")
      .query(query.pairs())
      .send()
      .await
      .map_err(|e| TransportError::without_response(format!("Request to {} failed: {}", path, e)))?;

    let status = response.status();
    let headers = response.headers().clone();
    let body = response
      .text()
      .await
      .map_err(|e| TransportError::without_response(format!("Failed to read body of {}: {}", path, e)))?;

    let response = HttpResponse {
      status,
      headers,
      body,
    };

    if status.is_success() {
      Ok(response)
    } else {
      Err(TransportError::with_response(
        format!("{} {} returned {}", method, path, status),
        response,
      ))
    }
  }
}
