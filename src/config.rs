use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheNamespace, SqliteStorage};
use crate::workable::{ReqwestTransport, WorkableError, CACHE_NAME};

/// Environment variable holding the Workable API key.
pub const API_KEY_ENV: &str = "WORKABLE_API_KEY";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub workable: WorkableConfig,
  #[serde(default)]
  pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkableConfig {
  /// Account subdomain, as in `{subdomain}.workable.com`
  pub subdomain: String,
  /// Request timeout in seconds
  pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
  /// Persistent SQLite database
  #[default]
  Sqlite,
  /// Process-local, lost on exit
  Memory,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
  #[serde(default)]
  pub backend: CacheBackend,
  /// Database path for the sqlite backend (defaults to the user data dir)
  pub path: Option<PathBuf>,
}

impl Config {
  /// Config with only a subdomain set, used when no file is present.
  pub fn for_subdomain(subdomain: impl Into<String>) -> Self {
    Self {
      workable: WorkableConfig {
        subdomain: subdomain.into(),
        timeout_secs: None,
      },
      cache: CacheConfig::default(),
    }
  }

  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./workable.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/workable/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    Self::load_if_present(explicit_path)?.ok_or_else(no_config_file)
  }

  /// Like [`Config::load`], but `Ok(None)` when no file was found. A file
  /// that exists but cannot be read or parsed is still an error.
  pub fn load_if_present(explicit_path: Option<&Path>) -> Result<Option<Self>> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    path.map(|p| Self::load_from_path(&p)).transpose()
  }

  /// Load configuration, letting `subdomain` override the file. With a
  /// subdomain, a missing file falls back to defaults.
  pub fn resolve(explicit_path: Option<&Path>, subdomain: Option<String>) -> Result<Self> {
    match (Self::load_if_present(explicit_path)?, subdomain) {
      (Some(config), Some(subdomain)) => Ok(config.with_subdomain(subdomain)),
      (Some(config), None) => Ok(config),
      (None, Some(subdomain)) => Ok(Self::for_subdomain(subdomain)),
      (None, None) => Err(no_config_file()),
    }
  }

  pub fn with_subdomain(self, subdomain: impl Into<String>) -> Self {
    Self {
      workable: WorkableConfig {
        subdomain: subdomain.into(),
        ..self.workable
      },
      ..self
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("workable.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("workable").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
    serde_yaml::from_str(contents)
  }

  /// Get the Workable API key from the environment.
  ///
  /// An empty value counts as missing.
  pub fn get_api_key() -> Result<String, WorkableError> {
    api_key_from(std::env::var(API_KEY_ENV).ok())
  }

  /// Build the HTTP transport. Fails before any request if the subdomain or
  /// API key is missing.
  pub fn transport(&self) -> Result<ReqwestTransport, WorkableError> {
    let api_key = Self::get_api_key()?;
    match self.workable.timeout_secs {
      Some(secs) => ReqwestTransport::with_timeout(
        &self.workable.subdomain,
        &api_key,
        Duration::from_secs(secs),
      ),
      None => ReqwestTransport::new(&self.workable.subdomain, &api_key),
    }
  }

  /// Open the shared cache namespace for the configured backend.
  pub fn cache_namespace(&self) -> Result<CacheNamespace, WorkableError> {
    let namespace = match (self.cache.backend, &self.cache.path) {
      (CacheBackend::Memory, _) => CacheNamespace::memory(CACHE_NAME),
      (CacheBackend::Sqlite, Some(path)) => CacheNamespace::new(
        CACHE_NAME,
        Arc::new(SqliteStorage::open_at(path, CACHE_NAME)?),
      ),
      (CacheBackend::Sqlite, None) => CacheNamespace::sqlite(CACHE_NAME)?,
    };
    Ok(namespace)
  }
}

fn no_config_file() -> color_eyre::Report {
  eyre!(
    "No configuration file found. Create one at ~/.config/workable/config.yaml\n\
             or pass --subdomain."
  )
}

fn api_key_from(value: Option<String>) -> Result<String, WorkableError> {
  value.filter(|key| !key.trim().is_empty()).ok_or_else(|| {
    WorkableError::Configuration(format!(
      "Workable API key not found. Set the {} environment variable.",
      API_KEY_ENV
    ))
  })
}
