//! Read-only view over a Workable API record.
//!
//! The API names fields in snake_case (`full_title`); callers may ask for them
//! in UpperCamelCase (`FullTitle`) and nested objects can be walked with a
//! dotted path (`Location.City`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Convert a display-style field name to the API's snake_case name.
///
/// Inserts `_` before every ASCII uppercase letter, strips leading `_` and
/// lowercases the result: `FullTitle` -> `full_title`.
pub fn to_snake_case(name: &str) -> String {
  let mut out = String::with_capacity(name.len() + 4);
  for c in name.chars() {
    if c.is_ascii_uppercase() {
      out.push('_');
    }
    out.push(c);
  }
  out.trim_start_matches('_').to_ascii_lowercase()
}

/// A field read from a [`WorkableResult`].
#[derive(Debug, Clone, PartialEq)]
pub enum Field<'a> {
  /// Nested object, re-wrapped for further access
  Record(WorkableResult),
  /// Scalar or array, as stored
  Value(&'a Value),
}

impl<'a> Field<'a> {
  fn from_value(value: &'a Value) -> Option<Self> {
    match value {
      Value::Null => None,
      Value::Object(map) => Some(Field::Record(WorkableResult::new(map.clone()))),
      other => Some(Field::Value(other)),
    }
  }

  pub fn as_str(&self) -> Option<&'a str> {
    match self {
      Field::Value(v) => v.as_str(),
      Field::Record(_) => None,
    }
  }

  pub fn as_i64(&self) -> Option<i64> {
    match self {
      Field::Value(v) => v.as_i64(),
      Field::Record(_) => None,
    }
  }

  pub fn as_record(&self) -> Option<&WorkableResult> {
    match self {
      Field::Record(r) => Some(r),
      Field::Value(_) => None,
    }
  }

  pub fn into_record(self) -> Option<WorkableResult> {
    match self {
      Field::Record(r) => Some(r),
      Field::Value(_) => None,
    }
  }
}

/// Immutable wrapper around one JSON object from the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkableResult {
  data: Map<String, Value>,
}

impl WorkableResult {
  pub fn new(data: Map<String, Value>) -> Self {
    Self { data }
  }

  /// Read a field by display name (`FullTitle`) or API name (`full_title`).
  /// Missing and `null` fields both return `None`.
  pub fn get(&self, name: &str) -> Option<Field<'_>> {
    self
      .data
      .get(&to_snake_case(name))
      .and_then(Field::from_value)
  }

  /// Read a nested field with a dotted path, e.g. `Location.City`.
  pub fn path(&self, path: &str) -> Option<Field<'_>> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = self.data.get(&to_snake_case(first))?;

    for segment in segments {
      current = current.as_object()?.get(&to_snake_case(segment))?;
    }

    Field::from_value(current)
  }

  /// Shorthand for string fields.
  pub fn get_str(&self, name: &str) -> Option<&str> {
    self.get(name).and_then(|f| f.as_str())
  }

  pub fn contains(&self, name: &str) -> bool {
    self.get(name).is_some()
  }

  /// The underlying API data.
  pub fn raw(&self) -> &Map<String, Value> {
    &self.data
  }

  pub fn into_inner(self) -> Map<String, Value> {
    self.data
  }
}

impl From<Map<String, Value>> for WorkableResult {
  fn from(data: Map<String, Value>) -> Self {
    Self::new(data)
  }
}
