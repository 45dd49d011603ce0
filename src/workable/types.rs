use super::result::WorkableResult;

/// A job as returned by the `jobs` listing endpoint
pub type JobSummary = WorkableResult;

/// A job as returned by the `jobs/{shortcode}` endpoint
pub type JobDetail = WorkableResult;

/// Ordered query-string parameters, e.g. `state=published`.
///
/// Order is preserved and matters: it decides both the query string and the
/// cache key. See <https://workable.readme.io/docs/jobs> for accepted names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append a parameter, keeping insertion order.
  pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
    self.push(key, value);
    self
  }

  pub fn push(&mut self, key: impl Into<String>, value: impl ToString) {
    self.0.push((key.into(), value.to_string()));
  }

  /// Look up the first value for `key`.
  pub fn get(&self, key: &str) -> Option<&str> {
    self
      .0
      .iter()
      .find(|(k, _)| k == key)
      .map(|(_, v)| v.as_str())
  }

  /// Values in insertion order.
  pub fn values(&self) -> impl Iterator<Item = &str> {
    self.0.iter().map(|(_, v)| v.as_str())
  }

  pub fn pairs(&self) -> &[(String, String)] {
    &self.0
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Parse a `key=value` pair, as accepted on the command line.
  pub fn parse_pair(input: &str) -> Result<(String, String), String> {
    input
      .split_once('=')
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .filter(|(k, _)| !k.is_empty())
      .ok_or_else(|| format!("expected key=value, got '{}'", input))
  }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for QueryParams {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self(
      iter
        .into_iter()
        .map(|(k, v)| (k.into(), v.to_string()))
        .collect(),
    )
  }
}
