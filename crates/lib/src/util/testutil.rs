//! Test utilities for nlbuild-lib.
//!
//! Provides cross-platform shell helpers and, on Unix, a fake toolchain: small
//! shell scripts that stand in for cmake, make, ar and strip so the builder can
//! be exercised end to end without a cross compiler.

#[cfg(unix)]
use std::path::{Path, PathBuf};

#[cfg(unix)]
use tempfile::TempDir;

#[cfg(unix)]
use crate::toolchain::Toolchain;

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

/// Returns the command and args to create a marker file in the current directory.
#[cfg(unix)]
pub fn touch_file(filename: &str) -> (&'static str, Vec<String>) {
  ("/usr/bin/touch", vec![filename.to_string()])
}

#[cfg(windows)]
pub fn touch_file(filename: &str) -> (&'static str, Vec<String>) {
  (
    "powershell.exe",
    vec![
      "-NoProfile".to_string(),
      "-Command".to_string(),
      format!("New-Item -ItemType File -Path '{}' -Force | Out-Null", filename),
    ],
  )
}

/// Fake cmake: writes its arguments, one per line, into `<build>/Makefile`.
///
/// `-DCONFIGURE_FAIL=...` makes it exit 1 without writing a Makefile.
#[cfg(unix)]
const FAKE_CMAKE: &str = r#"#!/bin/sh
echo "$*" >> "$(dirname "$0")/cmake.calls"
build=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "-B" ]; then build="$arg"; fi
  prev="$arg"
done
case "$*" in
  *-DCONFIGURE_FAIL=*) echo "CMake Error: forced configure failure"; exit 1 ;;
esac
mkdir -p "$build"
printf '%s\n' "$@" > "$build/Makefile"
echo "-- Build files have been written to: $build"
"#;

/// Fake make: drops two object files into the build directory.
///
/// A configuration containing `-DBUILD_FAIL=...` exits 2 with an error line;
/// `-DLOG_FAIL=...` prints an error line but still exits 0.
#[cfg(unix)]
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
if grep -q -- '-DLOG_FAIL=' "$dir/Makefile"; then
  echo "make[1]: *** [CMakeFiles/lib.dir/src/x.c.o] Error 1"
  exit 0
fi
mkdir -p "$dir/obj/sub"
: > "$dir/obj/a.o"
: > "$dir/obj/sub/b.o"
echo "[100%] Built target lib"
"#;

/// Fake ar: `ar rcs <lib> <objs...>` writes the member list into `<lib>`.
#[cfg(unix)]
const FAKE_AR: &str = r#"#!/bin/sh
echo "$*" >> "$(dirname "$0")/ar.calls"
lib="$2"
shift 2
: > "$lib"
for obj in "$@"; do echo "$obj" >> "$lib"; done
"#;

/// Fake strip: only records its arguments.
#[cfg(unix)]
const FAKE_STRIP: &str = r#"#!/bin/sh
echo "$*" >> "$(dirname "$0")/strip.calls"
"#;

/// A temporary directory holding fake toolchain scripts and a source tree.
#[cfg(unix)]
pub struct FakeToolchain {
  pub temp: TempDir,
  bin: PathBuf,
}

#[cfg(unix)]
impl FakeToolchain {
  pub fn new() -> Self {
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

    Self { temp, bin }
  }

  pub fn toolchain(&self) -> Toolchain {
    Toolchain {
      configure: self.bin.join("cmake").to_string_lossy().into_owned(),
      build: self.bin.join("make").to_string_lossy().into_owned(),
      archiver: self.bin.join("ar").to_string_lossy().into_owned(),
      strip: self.bin.join("strip").to_string_lossy().into_owned(),
    }
  }

  /// Source directory containing a `CMakeLists.txt`.
  pub fn source_dir(&self) -> PathBuf {
    self.temp.path().join("src")
  }

  pub fn build_root(&self) -> PathBuf {
    self.temp.path().join("build")
  }

  pub fn install_dir(&self) -> PathBuf {
    self.temp.path().join("lib")
  }

  /// Argument lines recorded by one of the fake tools, one per invocation.
  pub fn calls(&self, tool: &str) -> Vec<String> {
    std::fs::read_to_string(self.bin.join(format!("{}.calls", tool)))
      .map(|content| content.lines().map(str::to_string).collect())
      .unwrap_or_default()
  }
}

#[cfg(unix)]
fn write_script(path: &Path, content: &str) {
  use std::os::unix::fs::PermissionsExt;

  std::fs::write(path, content).unwrap();
  std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}
