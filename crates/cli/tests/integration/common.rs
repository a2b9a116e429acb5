//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Stands in for cmake: records its arguments and writes them into `<build>/Makefile`.
const FAKE_CMAKE: &str = r#"#!/bin/sh
echo "$*" >> "$(dirname "$0")/cmake.calls"
build=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "-B" ]; then build="$arg"; fi
  prev="$arg"
done
mkdir -p "$build"
printf '%s\n' "$@" > "$build/Makefile"
"#;

/// Stands in for make: fails when the Makefile carries `-DBUILD_FAIL=`.
const FAKE_MAKE: &str = r#"#!/bin/sh
echo "$*" >> "$(dirname "$0")/make.calls"
dir=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "-C" ]; then dir="$arg"; fi
  prev="$arg"
done
if grep -q -- '-DBUILD_FAIL=' "$dir/Makefile"; then
  echo "make: *** [all] Error 2"
  exit 2
fi
: > "$dir/lib.o"
echo "[100%] Built target lib"
"#;

const FAKE_AR: &str = r#"#!/bin/sh
echo "$*" >> "$(dirname "$0")/ar.calls"
echo "$3" > "$2"
"#;

const FAKE_STRIP: &str = r#"#!/bin/sh
echo "$*" >> "$(dirname "$0")/strip.calls"
"#;

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding the fake toolchain, a
/// source tree with a `CMakeLists.txt`, and the build and install roots.
pub struct TestEnv {
  pub temp: TempDir,
  pub config_path: PathBuf,
}

impl TestEnv {
  pub fn with_config(content: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let bin = temp.path().join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    for (name, script) in [
      ("cmake", FAKE_CMAKE),
      ("make", FAKE_MAKE),
      ("ar", FAKE_AR),
      ("strip", FAKE_STRIP),
    ] {
      write_script(&bin.join(name), script);
    }

    let src = temp.path().join("src");
    std::fs::create_dir_all(&src).unwrap();
    std::fs::write(src.join("CMakeLists.txt"), "project(fake C)\n").unwrap();

    let config_path = temp.path().join("config.json");
    std::fs::write(&config_path, content).unwrap();

    Self { temp, config_path }
  }

  pub fn bin_path(&self) -> PathBuf {
    self.temp.path().join("bin")
  }

  pub fn install_path(&self) -> PathBuf {
    self.temp.path().join("lib")
  }

  pub fn build_path(&self) -> PathBuf {
    self.temp.path().join("build")
  }

  /// Argument lines recorded by one of the fake tools, one per invocation.
  pub fn calls(&self, tool: &str) -> Vec<String> {
    std::fs::read_to_string(self.bin_path().join(format!("{}.calls", tool)))
      .map(|content| content.lines().map(str::to_string).collect())
      .unwrap_or_default()
  }

  /// Get a pre-configured Command for the nlbuild binary.
  ///
  /// Sets the `NLBUILD_*` variables so the fake toolchain is used, and points
  /// every path argument into the temp directory.
  pub fn nlbuild_cmd(&self) -> Command {
    let bin = self.bin_path();
    let mut cmd: Command = cargo_bin_cmd!("nlbuild");
    cmd.env("NLBUILD_CMAKE", bin.join("cmake"));
    cmd.env("NLBUILD_MAKE", bin.join("make"));
    cmd.env("NLBUILD_AR", bin.join("ar"));
    cmd.env("NLBUILD_STRIP", bin.join("strip"));
    cmd.env_remove("RUST_LOG");
    cmd
      .arg("--config")
      .arg(&self.config_path)
      .arg("--lib_src")
      .arg(self.temp.path().join("src"))
      .arg("--lib_root")
      .arg(self.install_path())
      .arg("--build_root")
      .arg(self.build_path());
    cmd
  }
}

fn write_script(path: &Path, content: &str) {
  use std::os::unix::fs::PermissionsExt;

  std::fs::write(path, content).unwrap();
  std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}
