//! Stand-in transports for tests.

use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

use super::client::RATE_LIMIT_RESET_HEADER;
use super::transport::{HttpResponse, HttpTransport, TransportError};
use super::types::QueryParams;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
  pub method: Method,
  pub path: String,
  pub query: QueryParams,
}

pub fn json_response(body: Value) -> HttpResponse {
  HttpResponse::ok(body.to_string())
}

/// A 429 error, optionally carrying a reset header value.
pub fn rate_limited(reset: Option<&str>) -> TransportError {
  let mut response = HttpResponse::new(StatusCode::TOO_MANY_REQUESTS, "");
  if let Some(reset) = reset {
    response.headers.append(
      RATE_LIMIT_RESET_HEADER,
      HeaderValue::from_str(reset).expect("valid header value"),
    );
  }
  TransportError::with_response("Too Many Requests", response)
}

/// Returns queued results in order, one per request.
pub struct ScriptedTransport {
  responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
  requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
  pub fn new(responses: Vec<Result<HttpResponse, TransportError>>) -> Self {
    Self {
      responses: Mutex::new(responses.into()),
      requests: Mutex::new(Vec::new()),
    }
  }

  pub fn requests(&self) -> Vec<RecordedRequest> {
    self.requests.lock().unwrap().clone()
  }

  pub fn request_count(&self) -> usize {
    self.requests.lock().unwrap().len()
  }

  pub fn paths(&self) -> Vec<String> {
    self.requests().into_iter().map(|r| r.path).collect()
  }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
  async fn request(
    &self,
    method: &Method,
    path: &str,
    query: &QueryParams,
  ) -> Result<HttpResponse, TransportError> {
    self.requests.lock().unwrap().push(RecordedRequest {
      method: method.clone(),
      path: path.to_string(),
      query: query.clone(),
    });

    self
      .responses
      .lock()
      .unwrap()
      .pop_front()
      .unwrap_or_else(|| Err(TransportError::without_response("no scripted response left")))
  }
}

/// Canned Workable API with two published jobs and one draft job.
#[derive(Default)]
pub struct MockWorkable {
  requests: Mutex<Vec<RecordedRequest>>,
}

impl MockWorkable {
  pub fn request_count(&self) -> usize {
    self.requests.lock().unwrap().len()
  }

  fn jobs(state: Option<&str>) -> Value {
    match state {
      Some("draft") => json!({"jobs": [
        {"title": "draft job", "shortcode": "GROOV001"},
      ]}),
      _ => json!({"jobs": [
        {"title": "Job 1", "shortcode": "GROOV001"},
        {"title": "Job 2", "shortcode": "GROOV002"},
      ]}),
    }
  }

  fn job(shortcode: &str, state: Option<&str>) -> Value {
    match state {
      Some("draft") => json!({
        "title": "Draft Job x",
        "test": "full draft data",
        "id": 1,
        "shortcode": shortcode,
      }),
      _ => json!({
        "title": "Job x",
        "test": "full data",
        "id": 1,
        "shortcode": shortcode,
      }),
    }
  }
}

#[async_trait]
impl HttpTransport for MockWorkable {
  async fn request(
    &self,
    method: &Method,
    path: &str,
    query: &QueryParams,
  ) -> Result<HttpResponse, TransportError> {
    self.requests.lock().unwrap().push(RecordedRequest {
      method: method.clone(),
      path: path.to_string(),
      query: query.clone(),
    });

    let state = query.get("state");
    match path {
      "jobs" => Ok(json_response(Self::jobs(state))),
      "jobs/GROOV001" | "jobs/GROOV002" => Ok(json_response(Self::job(&path[5..], state))),
      _ => Err(TransportError::with_response(
        format!("GET {} returned 404", path),
        HttpResponse::new(StatusCode::NOT_FOUND, r#"{"error":"Not found"}"#),
      )),
    }
  }
}
