//! Build log inspection.
//!
//! A build tool can exit 0 even though one of its sub-invocations failed, so
//! every build log is scanned for the tool's own error lines as a second check.
//! A line is an error line when it starts with the tool name and later contains
//! the word `Error` followed by more text, e.g. `make: *** [all] Error 2` or
//! `make[2]: *** [src/foo.o] Error 1`.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use regex::Regex;
use tracing::{debug, error};

/// Scans logs for error lines printed by one build tool.
#[derive(Debug, Clone)]
pub struct LogInspector {
  pattern: Regex,
}

impl LogInspector {
  pub fn new(tool_name: &str) -> Self {
    let pattern = format!("^{}.+Error.+", regex::escape(tool_name));
    Self {
      pattern: Regex::new(&pattern).expect("escaped tool name is a valid regex"),
    }
  }

  /// Whether `line` is an error line of the build tool.
  pub fn is_error_line(&self, line: &str) -> bool {
    self.pattern.is_match(line)
  }

  /// Returns `true` when the log at `path` shows no error line.
  ///
  /// A missing log counts as clean here; whether a log should exist at all
  /// is the caller's concern. A log that exists but cannot be read counts as failed.
  pub fn log_is_clean(&self, path: &Path) -> bool {
    match self.first_error_line(path) {
      Ok(None) => true,
      Ok(Some(line)) => {
        debug!(log = %path.display(), line = %line, "error line in build log");
        false
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound => true,
      Err(e) => {
        error!(log = %path.display(), error = %e, "failed to read build log");
        false
      }
    }
  }

  /// The first error line in the log, if any.
  pub fn first_error_line(&self, path: &Path) -> io::Result<Option<String>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut buf = Vec::new();
    loop {
      buf.clear();
      if reader.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
      }
      let line = String::from_utf8_lossy(&buf);
      let line = line.trim_end_matches(['\r', '\n']);
      if self.is_error_line(line) {
        return Ok(Some(line.to_string()));
      }
    }
  }
}
