//! Single target build.
//!
//! A target moves through configure, build, archive and install. Configure and
//! build gate progress: if either fails the target fails and nothing after it
//! runs. Archive and install are best effort; their failures are reported as
//! warnings on the outcome and the target still counts as built.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use super::types::{BuildArtifacts, Stage, TargetError, TargetOutcome, library_name};
use crate::config::BuildConfig;
use crate::consts::{OBJECT_EXT, PROJECT_FILE};
use crate::execute::{self, CommandSpec, OutputStream};
use crate::inspect::LogInspector;
use crate::toolchain::Toolchain;
use crate::util::fs::{find_files_recursive, recreate_dir};

/// Settings shared by every target of one run.
#[derive(Debug, Clone)]
pub struct BuilderOptions {
  /// Directory holding the project's `CMakeLists.txt`.
  pub source_dir: PathBuf,
  /// Library name prefix: target `t` produces `lib<prefix>_t.a`.
  pub lib_prefix: String,
  /// Root of the per-target build directories.
  pub build_root: PathBuf,
  /// Where finished libraries are copied.
  pub install_dir: PathBuf,
  /// Parallelism flag for the build tool, e.g. `-j4`. Ignored unless it starts with `-j`.
  pub parallel: String,
  /// Reuse an existing Makefile instead of reconfiguring.
  pub reuse: bool,
  /// Where tool output is echoed while it is tee'd into the logs.
  pub echo: OutputStream,
}

/// One target to build.
#[derive(Debug, Clone, Copy)]
pub struct TargetRequest<'a> {
  pub name: &'a str,
  pub config: &'a BuildConfig,
  pub aliases: &'a [String],
}

/// Builds targets one at a time with a fixed toolchain and options.
#[derive(Debug, Clone)]
pub struct TargetBuilder {
  options: BuilderOptions,
  toolchain: Toolchain,
  inspector: LogInspector,
}

impl TargetBuilder {
  pub fn new(options: BuilderOptions, toolchain: Toolchain) -> Self {
    let inspector = LogInspector::new(toolchain.build_tool_name());
    Self {
      options,
      toolchain,
      inspector,
    }
  }

  pub fn options(&self) -> &BuilderOptions {
    &self.options
  }

  pub fn toolchain(&self) -> &Toolchain {
    &self.toolchain
  }

  pub fn artifacts(&self, target: &str) -> BuildArtifacts {
    BuildArtifacts::new(&self.options.build_root, &self.options.lib_prefix, target)
  }

  /// Configure, build, archive and install one target.
  pub fn build(&self, request: TargetRequest<'_>) -> Result<TargetOutcome, TargetError> {
    let artifacts = self.artifacts(request.name);
    let reused_configuration = self.configure(&request, &artifacts)?;
    let mut outcome = TargetOutcome {
      reused_configuration,
      ..TargetOutcome::default()
    };
    self.advance(request.name, Stage::Configured);

    self.compile(&request, &artifacts)?;
    self.advance(request.name, Stage::Built);

    let libname = library_name(&self.options.lib_prefix, request.name);
    self.archive(&artifacts, &libname, &mut outcome);
    self.advance(request.name, Stage::Archived);

    self.install(&request, &artifacts, &libname, &mut outcome);
    self.advance(request.name, Stage::Installed);

    Ok(outcome)
  }

  fn advance(&self, target: &str, stage: Stage) {
    debug!(target_name = %target, stage = %stage, "target stage reached");
  }

  /// Returns whether an existing Makefile was reused.
  fn configure(&self, request: &TargetRequest<'_>, artifacts: &BuildArtifacts) -> Result<bool, TargetError> {
    let source_dir = &self.options.source_dir;
    if !source_dir.join(PROJECT_FILE).is_file() {
      error!(source = %source_dir.display(), "{} is not a cmake project, please check", source_dir.display());
      return Err(TargetError::NotCMakeProject {
        source_dir: source_dir.clone(),
      });
    }

    let makefile = artifacts.makefile();
    let reuse = self.options.reuse && makefile.is_file();

    if reuse {
      info!(target_name = %request.name, "Reuse previous generated Makefile configured by cmake!");
    } else {
      recreate_dir(&artifacts.build_dir, true).map_err(|source| TargetError::PrepareBuildDir {
        dir: artifacts.build_dir.clone(),
        source,
      })?;

      let abs_source = dunce::canonicalize(source_dir).unwrap_or_else(|_| source_dir.clone());
      info!(
        target_name = %request.name,
        log = %artifacts.configure_log.display(),
        "Configure project {} for target {}",
        source_dir.display(),
        request.name
      );

      let spec = CommandSpec::new(&self.toolchain.configure)
        .args(request.config.definitions())
        .arg("-S")
        .arg(&abs_source)
        .arg("-B")
        .arg(&artifacts.build_dir)
        .tee(&artifacts.configure_log)
        .echo_to(self.options.echo);

      // The Makefile check below decides success, not the exit status.
      if let Err(e) = execute::run(&spec) {
        warn!(target_name = %request.name, error = %e, "configure command reported a failure");
      }
    }

    if !makefile.is_file() {
      error!(
        target_name = %request.name,
        log = %artifacts.configure_log.display(),
        "Makefile for project {} is not generated",
        source_dir.display()
      );
      return Err(TargetError::ConfigureFailed {
        target: request.name.to_string(),
        log: artifacts.configure_log.clone(),
      });
    }

    Ok(reuse)
  }

  fn compile(&self, request: &TargetRequest<'_>, artifacts: &BuildArtifacts) -> Result<(), TargetError> {
    let mut spec = CommandSpec::new(&self.toolchain.build);
    if let Some(flag) = parallel_flag(&self.options.parallel) {
      spec = spec.arg(flag);
    }
    let spec = spec
      .arg("-C")
      .arg(&artifacts.build_dir)
      .tee(&artifacts.build_log)
      .echo_to(self.options.echo);

    info!(
      target_name = %request.name,
      log = %artifacts.build_log.display(),
      "Build project {} for target {}",
      self.options.source_dir.display(),
      request.name
    );

    if let Err(source) = execute::run(&spec) {
      error!(
        target_name = %request.name,
        log = %artifacts.build_log.display(),
        ">>> ERROR: Failed to build project {} for target {}",
        self.options.source_dir.display(),
        request.name
      );
      return Err(TargetError::BuildFailed {
        target: request.name.to_string(),
        log: artifacts.build_log.clone(),
        source,
      });
    }

    if !self.inspector.log_is_clean(&artifacts.build_log) {
      error!(
        target_name = %request.name,
        log = %artifacts.build_log.display(),
        ">>> ERROR: Failed to build project {} for target {}, build log reports an error",
        self.options.source_dir.display(),
        request.name
      );
      return Err(TargetError::BuildLogError {
        target: request.name.to_string(),
        log: artifacts.build_log.clone(),
      });
    }

    Ok(())
  }

  fn archive(&self, artifacts: &BuildArtifacts, libname: &str, outcome: &mut TargetOutcome) {
    let objects = match find_files_recursive(&artifacts.build_dir, OBJECT_EXT) {
      Ok(objects) => objects,
      Err(e) => {
        warn!(dir = %artifacts.build_dir.display(), error = %e, "failed to collect object files");
        Vec::new()
      }
    };
    if objects.is_empty() {
      warn!(dir = %artifacts.build_dir.display(), "no object files found to archive");
    }
    debug!(library = %libname, objects = objects.len(), "archiving objects");

    let spec = CommandSpec::new(&self.toolchain.archiver)
      .arg("rcs")
      .arg(libname)
      .args(&objects)
      .current_dir(&artifacts.build_dir)
      .echo_to(self.options.echo);

    if !execute::succeeded(&spec) {
      let message = format!("failed to archive {}", libname);
      error!(library = %libname, "{}", message);
      outcome.warnings.push(message);
    }
  }

  fn install(&self, request: &TargetRequest<'_>, artifacts: &BuildArtifacts, libname: &str, outcome: &mut TargetOutcome) {
    let install_dir = &self.options.install_dir;
    if let Err(e) = recreate_dir(install_dir, false) {
      let message = format!("failed to create install directory {}: {}", install_dir.display(), e);
      error!("{}", message);
      outcome.warnings.push(message);
      return;
    }

    let built = artifacts.build_dir.join(libname);
    info!(
      target_name = %request.name,
      "Install library {} for target {}",
      self.options.source_dir.display(),
      request.name
    );
    self.copy_library(&built, &install_dir.join(libname), outcome);

    for alias in request.aliases {
      info!(
        target_name = %request.name,
        alias = %alias,
        "Install {} library alias {} for target {}",
        self.options.source_dir.display(),
        alias,
        request.name
      );
      let alias_name = library_name(&self.options.lib_prefix, alias);
      self.copy_library(&built, &install_dir.join(alias_name), outcome);
    }
  }

  fn copy_library(&self, from: &Path, to: &Path, outcome: &mut TargetOutcome) {
    match std::fs::copy(from, to) {
      Ok(_) => outcome.installed.push(to.to_path_buf()),
      Err(e) => {
        let message = format!("failed to install {} to {}: {}", from.display(), to.display(), e);
        error!("{}", message);
        outcome.warnings.push(message);
      }
    }
  }
}

/// The parallelism flag to pass to the build tool, if `parallel` looks like one.
pub fn parallel_flag(parallel: &str) -> Option<&str> {
  let flag = parallel.trim();
  flag.starts_with("-j").then_some(flag)
}
