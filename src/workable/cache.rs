//! Cache keys for Workable queries.

use super::types::QueryParams;

/// Query key types for Workable API calls.
#[derive(Clone, Debug)]
pub enum WorkableQueryKey<'a> {
  /// Job listing
  Jobs { params: &'a QueryParams },
  /// Single job by shortcode
  Job {
    shortcode: &'a str,
    params: &'a QueryParams,
  },
  /// Job listing with every job's full details
  FullJobs { params: &'a QueryParams },
}

impl WorkableQueryKey<'_> {
  /// Key used in the cache.
  ///
  /// Only parameter values take part, joined with `-` in caller order, so
  /// `{state: draft}` and `{status: draft}` share an entry.
  pub fn cache_key(&self) -> String {
    match self {
      Self::Jobs { params } => format!("Jobs{}", join_values(params)),
      Self::Job { shortcode, params } => format!("Job-{}{}", shortcode, join_values(params)),
      Self::FullJobs { params } => format!("FullJobs{}", join_values(params)),
    }
  }

  pub fn description(&self) -> String {
    match self {
      Self::Jobs { params } if params.is_empty() => "all jobs".to_string(),
      Self::Jobs { params } => format!("jobs ({})", describe(params)),
      Self::Job { shortcode, params } if params.is_empty() => format!("job {}", shortcode),
      Self::Job { shortcode, params } => format!("job {} ({})", shortcode, describe(params)),
      Self::FullJobs { params } if params.is_empty() => "all jobs with details".to_string(),
      Self::FullJobs { params } => format!("jobs with details ({})", describe(params)),
    }
  }
}

fn join_values(params: &QueryParams) -> String {
  params.values().collect::<Vec<_>>().join("-")
}

fn describe(params: &QueryParams) -> String {
  params
    .pairs()
    .iter()
    .map(|(k, v)| format!("{}={}", k, v))
    .collect::<Vec<_>>()
    .join(", ")
}
