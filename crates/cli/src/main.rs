mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use nlbuild_lib::consts::DEFAULT_BUILD_ROOT;
use nlbuild_lib::toolchain::Toolchain;

use crate::cmd::{BuildArgs, cmd_build};
use crate::output::OutputFormat;

/// nlbuild - build a static library once per target of a JSON build matrix
#[derive(Parser)]
#[command(name = "nlbuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// JSON file describing the global options, targets and aliases
  #[arg(long)]
  config: PathBuf,

  /// Library source directory containing CMakeLists.txt
  #[arg(long = "lib_src", default_value = "DSP/Source")]
  lib_src: PathBuf,

  /// Library name prefix: target T is installed as lib<prefix>_T.a
  #[arg(long = "lib_prefix", default_value = "nmsis_dsp")]
  lib_prefix: String,

  /// Directory the built libraries are installed into
  #[arg(long = "lib_root", default_value = "Library/DSP/GCC")]
  lib_root: PathBuf,

  /// Root of the per-target build directories
  #[arg(long = "build_root", default_value = DEFAULT_BUILD_ROOT)]
  build_root: PathBuf,

  /// Reuse previously generated Makefiles instead of reconfiguring
  #[arg(long)]
  norebuild: bool,

  /// Strip debug symbols from the installed libraries
  #[arg(long)]
  strip: bool,

  /// Target to build, or "all"
  #[arg(long, default_value = "all")]
  target: String,

  /// Parallel flag passed to make
  #[arg(long, default_value = "-j4", allow_hyphen_values = true)]
  parallel: String,

  /// Keep building remaining targets after a failure
  #[arg(long = "ignore_fail")]
  ignore_fail: bool,

  /// Configure tool (overrides NLBUILD_CMAKE)
  #[arg(long)]
  cmake: Option<String>,

  /// Build tool (overrides NLBUILD_MAKE)
  #[arg(long)]
  make: Option<String>,

  /// Archiver (overrides NLBUILD_AR)
  #[arg(long)]
  ar: Option<String>,

  /// Symbol stripper (overrides NLBUILD_STRIP)
  #[arg(long = "strip_tool")]
  strip_tool: Option<String>,

  /// Report format
  #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
  format: OutputFormat,

  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,
}

impl Cli {
  fn toolchain(&self) -> Toolchain {
    let mut toolchain = Toolchain::from_env();
    if let Some(cmake) = &self.cmake {
      toolchain.configure = cmake.clone();
    }
    if let Some(make) = &self.make {
      toolchain.build = make.clone();
    }
    if let Some(ar) = &self.ar {
      toolchain.archiver = ar.clone();
    }
    if let Some(strip) = &self.strip_tool {
      toolchain.strip = strip.clone();
    }
    toolchain
  }
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .without_time()
    .init();

  let args = BuildArgs {
    toolchain: cli.toolchain(),
    config: cli.config,
    lib_src: cli.lib_src,
    lib_prefix: cli.lib_prefix,
    lib_root: cli.lib_root,
    build_root: cli.build_root,
    norebuild: cli.norebuild,
    strip: cli.strip,
    target: cli.target,
    parallel: cli.parallel,
    ignore_fail: cli.ignore_fail,
    output: cli.format,
  };

  if !cmd_build(&args)? {
    std::process::exit(1);
  }
  Ok(())
}
