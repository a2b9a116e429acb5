//! Build matrix orchestration.
//!
//! Runs the [`TargetBuilder`] over the targets of a [`BuildMatrix`], one at a
//! time and in document order, timing each and collecting a [`Report`].
//!
//! By default the run stops at the first failing target (fail-fast). With
//! `ignore_fail` every target is attempted and the report shows all outcomes.
//! After the loop, libraries in the install directory can be stripped of debug
//! symbols in a single invocation of the strip tool.

mod report;

pub use report::{BuildResult, Report};

use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use tracing::{error, info, warn};

use crate::build::{BuilderOptions, TargetBuilder, TargetRequest};
use crate::config::{BuildConfig, BuildMatrix};
use crate::consts::{ARCHIVE_EXT, SELECT_ALL};
use crate::execute::{self, CommandSpec, OutputStream};
use crate::toolchain::Toolchain;
use crate::util::fs::find_files_shallow;

/// Which targets of the matrix to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSelector {
  All,
  Named(String),
}

impl From<&str> for TargetSelector {
  fn from(value: &str) -> Self {
    if value.eq_ignore_ascii_case(SELECT_ALL) {
      TargetSelector::All
    } else {
      TargetSelector::Named(value.to_string())
    }
  }
}

impl FromStr for TargetSelector {
  type Err = std::convert::Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(Self::from(s))
  }
}

/// Everything one orchestrated run needs besides the matrix and toolchain.
#[derive(Debug, Clone)]
pub struct InstallOptions {
  pub builder: BuilderOptions,
  pub selector: TargetSelector,
  /// Strip debug symbols from every library in the install directory afterwards.
  pub strip: bool,
  /// Keep going after a target fails.
  pub ignore_fail: bool,
}

/// Build, archive and install the selected targets of `matrix`.
///
/// Never returns early with an error: every failure is recorded in the report
/// and narrated with an `ERROR` log record.
pub fn install_library(matrix: &BuildMatrix, options: &InstallOptions, toolchain: &Toolchain) -> Report {
  let builder = TargetBuilder::new(options.builder.clone(), toolchain.clone());
  let source = options.builder.source_dir.display();
  let mut report = Report::new();

  match &options.selector {
    TargetSelector::All => {
      info!("Build all the configurations, count {}", matrix.targets.len());
      for (name, config) in &matrix.targets {
        let result = build_target(&builder, matrix, name, config);
        let failed = !result.success;
        report.push(result);

        if failed {
          error!(target_name = %name, ">>> ERROR failed to build {} library for config {}", source, name);
          if !options.ignore_fail {
            break;
          }
        }
      }
    }
    TargetSelector::Named(name) => {
      info!("Build selected configuration {}", name);
      match matrix.targets.get(name) {
        Some(config) => {
          let result = build_target(&builder, matrix, name, config);
          if !result.success {
            error!(target_name = %name, ">>> ERROR failed to build {} library for config {}", source, name);
          }
          report.push(result);
        }
        None => {
          error!(target_name = %name, ">>> ERROR: config {} not found", name);
          report.mark_missing(name);
        }
      }
    }
  }

  let install_dir = &options.builder.install_dir;
  if options.strip {
    info!("Strip libraries located in {}", install_dir.display());
    strip_libraries(install_dir, toolchain, options.builder.echo);
  }
  info!("All generated library could be found in {}", install_dir.display());

  report
}

fn build_target(builder: &TargetBuilder, matrix: &BuildMatrix, name: &str, config: &BuildConfig) -> BuildResult {
  info!(
    target_name = %name,
    ">>> Build and install {} library for config {}",
    builder.options().source_dir.display(),
    name
  );
  let build_log = builder.artifacts(name).build_log;

  let start = Instant::now();
  let outcome = builder.build(TargetRequest {
    name,
    config,
    aliases: matrix.aliases_for(name),
  });
  let elapsed_secs = (start.elapsed().as_secs_f64() * 100.0).round() / 100.0;

  let mut result = BuildResult {
    target: name.to_string(),
    success: outcome.is_ok(),
    elapsed_secs,
    build_log,
    error: None,
    installed: Vec::new(),
    warnings: Vec::new(),
  };
  match outcome {
    Ok(outcome) => {
      for warning in &outcome.warnings {
        warn!(target_name = %name, "{}", warning);
      }
      result.installed = outcome.installed;
      result.warnings = outcome.warnings;
    }
    Err(e) => result.error = Some(e.to_string()),
  }
  result
}

/// Strip debug symbols from every `.a` file directly inside `dir`, in one invocation.
///
/// This covers whatever archives are present, including ones from earlier runs.
/// Returns `false` only if the strip tool was run and failed.
pub fn strip_libraries(dir: &Path, toolchain: &Toolchain, echo: OutputStream) -> bool {
  if !dir.is_dir() {
    info!(dir = %dir.display(), "install directory does not exist, nothing to strip");
    return true;
  }

  let archives = match find_files_shallow(dir, ARCHIVE_EXT) {
    Ok(archives) => archives,
    Err(e) => {
      error!(dir = %dir.display(), error = %e, "failed to list libraries to strip");
      return false;
    }
  };
  if archives.is_empty() {
    info!(dir = %dir.display(), "no libraries to strip");
    return true;
  }

  let spec = CommandSpec::new(&toolchain.strip)
    .arg("-g")
    .args(&archives)
    .echo_to(echo);
  let stripped = execute::succeeded(&spec);
  if !stripped {
    error!(dir = %dir.display(), "failed to strip libraries");
  }
  stripped
}
