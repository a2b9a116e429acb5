//! Build command implementation.
//!
//! Loads the build matrix, runs every selected target and prints the report.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use nlbuild_lib::build::BuilderOptions;
use nlbuild_lib::config::{self, BuildMatrix, LoadStatus};
use nlbuild_lib::execute::OutputStream;
use nlbuild_lib::orchestrate::{InstallOptions, Report, TargetSelector, install_library};
use nlbuild_lib::toolchain::Toolchain;

use crate::output::{
  OutputFormat, format_duration, print_error, print_info, print_json, print_stat, print_success, print_warning,
};

/// Everything the build command needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct BuildArgs {
  pub config: PathBuf,
  pub lib_src: PathBuf,
  pub lib_prefix: String,
  pub lib_root: PathBuf,
  pub build_root: PathBuf,
  pub norebuild: bool,
  pub strip: bool,
  pub target: String,
  pub parallel: String,
  pub ignore_fail: bool,
  pub toolchain: Toolchain,
  pub output: OutputFormat,
}

#[derive(Serialize)]
struct BuildSummary<'a> {
  library_source: &'a Path,
  config: &'a Path,
  install_dir: &'a Path,
  rebuilt: bool,
  #[serde(flatten)]
  report: &'a Report,
}

/// Returns whether the whole run succeeded.
pub fn cmd_build(args: &BuildArgs) -> Result<bool> {
  let start = Instant::now();

  let loaded = config::load(&args.config);
  debug!(config = %args.config.display(), status = ?LoadStatus::of(&loaded), "configuration loaded");
  let document = match loaded {
    Ok(document) => document,
    Err(e) => {
      debug!(error = %e, "configuration not loaded");
      print_error(&format!("Invalid json file {}, please check!", args.config.display()));
      return Ok(false);
    }
  };

  let matrix = match BuildMatrix::from_document(&document) {
    Ok(matrix) => matrix,
    Err(e) => {
      print_error(&format!(
        "Invalid build configuration in {}: {}",
        args.config.display(),
        e
      ));
      return Ok(false);
    }
  };

  let options = InstallOptions {
    builder: BuilderOptions {
      source_dir: args.lib_src.clone(),
      lib_prefix: args.lib_prefix.clone(),
      build_root: args.build_root.clone(),
      install_dir: args.lib_root.clone(),
      parallel: args.parallel.clone(),
      reuse: args.norebuild,
      // Keep stdout for the JSON document alone.
      echo: if args.output.is_json() {
        OutputStream::Stderr
      } else {
        OutputStream::Stdout
      },
    },
    selector: TargetSelector::from(args.target.as_str()),
    strip: args.strip,
    ignore_fail: args.ignore_fail,
  };

  let report = install_library(&matrix, &options, &args.toolchain);

  if args.output.is_json() {
    print_json(&BuildSummary {
      library_source: &args.lib_src,
      config: &args.config,
      install_dir: &args.lib_root,
      rebuilt: !args.norebuild,
      report: &report,
    })?;
    return Ok(report.is_success());
  }

  println!();
  println!("{}", report);
  println!();

  let status = format!(
    "Build Library {} with config {}, generated into {} status: {}",
    args.lib_src.display(),
    args.config.display(),
    args.lib_root.display(),
    report.is_success()
  );
  if report.is_success() {
    print_success(&status);
  } else {
    print_error(&status);
    if report.missing_target.is_some() {
      print_info(&format!("Available targets: {}", available_targets(&matrix)));
    }
  }
  print_stat("Targets", &report.len().to_string());
  print_stat("Failed", &report.failed().count().to_string());
  print_stat("Warnings", &report.warning_count().to_string());
  print_stat("Duration", &format_duration(start.elapsed()));

  for result in &report.results {
    for warning in &result.warnings {
      print_warning(&format!("{}: {}", result.target, warning));
    }
  }

  if args.norebuild {
    print_warning("CAUTION: Libraries were built with --norebuild, previous cmake configuration was reused!");
  }

  Ok(report.is_success())
}

fn available_targets(matrix: &BuildMatrix) -> String {
  if matrix.targets.is_empty() {
    return "none".to_string();
  }
  matrix.targets.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
}
