//! External tools driven during a build.
//!
//! None of these are reimplemented: the configure tool turns a source tree into
//! a Makefile, the build tool runs it, the archiver packs object files into a
//! static library and the stripper removes debug symbols from the result.
//!
//! Defaults target the Nuclei RISC-V GCC toolchain. Each tool can be replaced
//! through an environment variable:
//!
//! | Tool      | Default                  | Variable        |
//! |-----------|--------------------------|-----------------|
//! | configure | `cmake`                  | `NLBUILD_CMAKE` |
//! | build     | `make`                   | `NLBUILD_MAKE`  |
//! | archiver  | `riscv-nuclei-elf-ar`    | `NLBUILD_AR`    |
//! | stripper  | `riscv-nuclei-elf-strip` | `NLBUILD_STRIP` |

use std::path::Path;

pub const CMAKE_ENV: &str = "NLBUILD_CMAKE";
pub const MAKE_ENV: &str = "NLBUILD_MAKE";
pub const AR_ENV: &str = "NLBUILD_AR";
pub const STRIP_ENV: &str = "NLBUILD_STRIP";

const DEFAULT_CMAKE: &str = "cmake";
const DEFAULT_MAKE: &str = "make";
const DEFAULT_AR: &str = "riscv-nuclei-elf-ar";
const DEFAULT_STRIP: &str = "riscv-nuclei-elf-strip";

/// Program names (or paths) of the external tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
  pub configure: String,
  pub build: String,
  pub archiver: String,
  pub strip: String,
}

impl Default for Toolchain {
  fn default() -> Self {
    Self {
      configure: DEFAULT_CMAKE.to_string(),
      build: DEFAULT_MAKE.to_string(),
      archiver: DEFAULT_AR.to_string(),
      strip: DEFAULT_STRIP.to_string(),
    }
  }
}

impl Toolchain {
  /// Defaults, overridden by any `NLBUILD_*` variable that is set and non-empty.
  pub fn from_env() -> Self {
    let defaults = Self::default();
    Self {
      configure: env_or(CMAKE_ENV, defaults.configure),
      build: env_or(MAKE_ENV, defaults.build),
      archiver: env_or(AR_ENV, defaults.archiver),
      strip: env_or(STRIP_ENV, defaults.strip),
    }
  }

  /// Name the build tool prints at the start of its own diagnostics.
  ///
  /// `make` reports errors as `make: *** ...` or `make[1]: *** ...` using the
  /// file name it was invoked as, so a full path is reduced to its last component.
  pub fn build_tool_name(&self) -> &str {
    Path::new(&self.build)
      .file_name()
      .and_then(|name| name.to_str())
      .unwrap_or(&self.build)
  }
}

fn env_or(var: &str, default: String) -> String {
  match std::env::var(var) {
    Ok(value) if !value.trim().is_empty() => value,
    _ => default,
  }
}
