use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::consts::{ARCHIVE_EXT, BUILD_DESCRIPTION, BUILD_LOG, CONFIGURE_LOG};
use crate::execute::RunError;

/// Paths belonging to one target's build, all under `<build_root>/<prefix>/<target>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifacts {
  pub build_dir: PathBuf,
  pub configure_log: PathBuf,
  pub build_log: PathBuf,
}

impl BuildArtifacts {
  pub fn new(build_root: &Path, lib_prefix: &str, target: &str) -> Self {
    let build_dir = build_root.join(lib_prefix).join(target);
    Self {
      configure_log: build_dir.join(CONFIGURE_LOG),
      build_log: build_dir.join(BUILD_LOG),
      build_dir,
    }
  }

  /// The build description the configure step must leave behind.
  pub fn makefile(&self) -> PathBuf {
    self.build_dir.join(BUILD_DESCRIPTION)
  }
}

/// File name of the static library for `name` (a target or an alias).
pub fn library_name(lib_prefix: &str, name: &str) -> String {
  format!("lib{}_{}.{}", lib_prefix, name, ARCHIVE_EXT)
}

/// Progress of a single target through the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
  NotConfigured,
  Configured,
  Built,
  Archived,
  Installed,
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Stage::NotConfigured => "not configured",
      Stage::Configured => "configured",
      Stage::Built => "built",
      Stage::Archived => "archived",
      Stage::Installed => "installed",
    };
    f.write_str(name)
  }
}

/// Failures that stop a target before its library is archived.
#[derive(Debug, Error)]
pub enum TargetError {
  #[error("{source_dir} is not a cmake project")]
  NotCMakeProject { source_dir: PathBuf },

  #[error("failed to prepare build directory {dir}: {source}")]
  PrepareBuildDir {
    dir: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Makefile for target {target} was not generated, see {log}")]
  ConfigureFailed { target: String, log: PathBuf },

  #[error("failed to build target {target}, see {log}: {source}")]
  BuildFailed {
    target: String,
    log: PathBuf,
    #[source]
    source: RunError,
  },

  #[error("build log {log} of target {target} reports an error")]
  BuildLogError { target: String, log: PathBuf },
}

impl TargetError {
  /// The last stage the target reached before failing.
  pub fn stage(&self) -> Stage {
    match self {
      TargetError::NotCMakeProject { .. }
      | TargetError::PrepareBuildDir { .. }
      | TargetError::ConfigureFailed { .. } => Stage::NotConfigured,
      TargetError::BuildFailed { .. } | TargetError::BuildLogError { .. } => Stage::Configured,
    }
  }
}

/// What a successful target build left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetOutcome {
  /// The configure step was skipped because a Makefile could be reused.
  pub reused_configuration: bool,
  /// Libraries copied into the install directory (target first, then aliases).
  pub installed: Vec<PathBuf>,
  /// Archive or install steps that failed without failing the target.
  pub warnings: Vec<String>,
}
