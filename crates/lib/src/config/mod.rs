//! Build matrix configuration.
//!
//! The configuration is a JSON document:
//!
//! ```json
//! {
//!   "global": { "NUCLEI_CORE": "n300", "OPTIMIZE": "O3" },
//!   "target": {
//!     "rv32imac": { "RISCV_ARCH": "rv32imac", "RISCV_ABI": "ilp32" },
//!     "rv32imafc": { "RISCV_ARCH": "rv32imafc", "RISCV_ABI": "ilp32f" }
//!   },
//!   "alias_target": { "rv32imac": ["rv32imac_zba"] }
//! }
//! ```
//!
//! Every target's options are merged over `global`. `alias_target` lists
//! additional library names a target's artifact is installed under.

mod types;

pub use types::{AliasConfigs, BuildConfig, ConfigError, LoadError, LoadStatus, TargetConfigs};

use std::io;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Read and parse the JSON document at `path`.
pub fn load(path: &Path) -> Result<Value, LoadError> {
  if !path.is_file() {
    return Err(LoadError::NotFound(path.to_path_buf()));
  }

  let content = std::fs::read_to_string(path).map_err(|source| match source.kind() {
    io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
    _ => LoadError::Read {
      path: path.to_path_buf(),
      source,
    },
  })?;

  serde_json::from_str(&content).map_err(|source| LoadError::InvalidJson {
    path: path.to_path_buf(),
    source,
  })
}

/// Per-target configurations with `global` merged in, or `None` if the
/// document has no usable `target` mapping.
pub fn derive_build_configs(document: &Value) -> Option<TargetConfigs> {
  match try_build_configs(document) {
    Ok(configs) => Some(configs),
    Err(e) => {
      debug!(error = %e, "no build configuration derived");
      None
    }
  }
}

/// Like [`derive_build_configs`], but says what is wrong with the document.
pub fn try_build_configs(document: &Value) -> Result<TargetConfigs, ConfigError> {
  let root = document.as_object().ok_or(ConfigError::NotAnObject)?;

  let global = match root.get("global") {
    None => BuildConfig::new(),
    Some(Value::Object(options)) => options_to_config(options).map_err(|_| ConfigError::InvalidGlobal)?,
    Some(_) => return Err(ConfigError::InvalidGlobal),
  };

  let targets = match root.get("target") {
    Some(Value::Object(targets)) => targets,
    _ => return Err(ConfigError::MissingTargets),
  };

  let mut configs = TargetConfigs::new();
  for (name, options) in targets {
    let options = options.as_object().ok_or_else(|| ConfigError::InvalidTarget {
      target: name.clone(),
      reason: "options must be a mapping".to_string(),
    })?;
    let overrides = options_to_config(options).map_err(|reason| ConfigError::InvalidTarget {
      target: name.clone(),
      reason,
    })?;
    configs.insert(name.clone(), global.merged(&overrides));
  }

  Ok(configs)
}

/// Alias names per target, from `alias_target`.
///
/// A missing or malformed `alias_target` yields no aliases. Entries that are
/// not lists of strings are skipped with a warning.
pub fn derive_alias_configs(document: &Value) -> AliasConfigs {
  let mut aliases = AliasConfigs::new();

  let entries = match document.get("alias_target") {
    None => return aliases,
    Some(Value::Object(entries)) => entries,
    Some(_) => {
      warn!("\"alias_target\" is not a mapping, ignoring aliases");
      return aliases;
    }
  };

  for (target, names) in entries {
    let Some(names) = names.as_array() else {
      warn!(target_name = %target, "alias list is not an array, ignoring");
      continue;
    };
    let mut list = Vec::with_capacity(names.len());
    for name in names {
      match name.as_str() {
        Some(name) => list.push(name.to_string()),
        None => warn!(target_name = %target, alias = %name, "alias name is not a string, ignoring"),
      }
    }
    aliases.insert(target.clone(), list);
  }

  aliases
}

fn options_to_config(options: &Map<String, Value>) -> Result<BuildConfig, String> {
  options
    .iter()
    .map(|(key, value)| {
      option_value(value)
        .map(|v| (key.clone(), v))
        .ok_or_else(|| format!("option {} has unsupported value {}", key, value))
    })
    .collect()
}

/// Render a JSON scalar the way it should appear after `-D<key>=`.
fn option_value(value: &Value) -> Option<String> {
  match value {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    Value::Bool(true) => Some("ON".to_string()),
    Value::Bool(false) => Some("OFF".to_string()),
    Value::Null | Value::Array(_) | Value::Object(_) => None,
  }
}

/// The loaded build matrix: merged per-target options plus aliases.
#[derive(Debug, Clone, Default)]
pub struct BuildMatrix {
  pub targets: TargetConfigs,
  pub aliases: AliasConfigs,
}

impl BuildMatrix {
  /// Load the matrix from a JSON file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let document = load(path)?;
    Self::from_document(&document)
  }

  pub fn from_document(document: &Value) -> Result<Self, ConfigError> {
    let targets = try_build_configs(document)?;
    let aliases = derive_alias_configs(document);

    for target in aliases.keys() {
      if !targets.contains_key(target) {
        warn!(target_name = %target, "aliases declared for unknown target");
      }
    }

    Ok(Self { targets, aliases })
  }

  /// Alias names declared for `target`; empty when none.
  pub fn aliases_for(&self, target: &str) -> &[String] {
    self.aliases.get(target).map(Vec::as_slice).unwrap_or(&[])
  }
}
