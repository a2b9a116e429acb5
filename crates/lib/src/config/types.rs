//! Types for the build matrix configuration.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

/// Outcome of reading the JSON document, independent of its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
  Ok,
  FileNotFound,
  InvalidJson,
}

impl LoadStatus {
  /// Status of a [`load`](super::load) call, `Ok` included.
  pub fn of<T>(result: &Result<T, LoadError>) -> Self {
    match result {
      Ok(_) => LoadStatus::Ok,
      Err(e) => e.status(),
    }
  }
}

/// Errors reading the configuration file itself.
#[derive(Debug, Error)]
pub enum LoadError {
  #[error("config file not found: {0}")]
  NotFound(PathBuf),

  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("{path} is an invalid json file: {source}")]
  InvalidJson {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

impl LoadError {
  pub fn status(&self) -> LoadStatus {
    match self {
      LoadError::NotFound(_) => LoadStatus::FileNotFound,
      LoadError::Read { .. } | LoadError::InvalidJson { .. } => LoadStatus::InvalidJson,
    }
  }
}

/// Errors turning a loaded document into a build matrix.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error(transparent)]
  Load(#[from] LoadError),

  #[error("config document is not a JSON object")]
  NotAnObject,

  #[error("no \"target\" mapping found in config")]
  MissingTargets,

  #[error("\"global\" options must be a mapping of option name to value")]
  InvalidGlobal,

  #[error("invalid options for target {target}: {reason}")]
  InvalidTarget { target: String, reason: String },
}

/// Build-system definitions for one target, in document order.
///
/// Each entry is passed to the configure tool as `-D<key>=<value>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BuildConfig(IndexMap<String, String>);

impl BuildConfig {
  pub fn new() -> Self {
    Self::default()
  }

  /// `self` with every entry of `overrides` applied on top.
  ///
  /// Keys already present keep their position and take the override's value.
  pub fn merged(&self, overrides: &BuildConfig) -> BuildConfig {
    let mut merged = self.clone();
    for (key, value) in &overrides.0 {
      merged.0.insert(key.clone(), value.clone());
    }
    merged
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.0.get(key).map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// The `-D<key>=<value>` arguments for the configure tool.
  pub fn definitions(&self) -> Vec<String> {
    self.iter().map(|(k, v)| format!("-D{}={}", k, v)).collect()
  }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for BuildConfig {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
  }
}

/// Target name to merged configuration, in document order.
pub type TargetConfigs = IndexMap<String, BuildConfig>;

/// Target name to the alias names its library is also installed under.
pub type AliasConfigs = IndexMap<String, Vec<String>>;
