//! Build status report.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Outcome of one attempted target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildResult {
  pub target: String,
  pub success: bool,
  /// Wall-clock seconds, rounded to hundredths.
  pub elapsed_secs: f64,
  pub build_log: PathBuf,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
  /// Libraries copied into the install directory, target first, then aliases.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub installed: Vec<PathBuf>,
  /// Archive or install problems that did not fail the target.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub warnings: Vec<String>,
}

/// Results of every attempted target, in the order they were attempted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
  pub results: Vec<BuildResult>,
  /// Set when a single target was requested that the configuration does not define.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub missing_target: Option<String>,
  pub success: bool,
}

impl Report {
  pub fn new() -> Self {
    Self {
      results: Vec::new(),
      missing_target: None,
      success: true,
    }
  }

  pub fn push(&mut self, result: BuildResult) {
    self.success &= result.success;
    self.results.push(result);
  }

  pub fn mark_missing(&mut self, target: &str) {
    self.missing_target = Some(target.to_string());
    self.success = false;
  }

  pub fn is_success(&self) -> bool {
    self.success
  }

  pub fn len(&self) -> usize {
    self.results.len()
  }

  pub fn is_empty(&self) -> bool {
    self.results.is_empty()
  }

  pub fn failed(&self) -> impl Iterator<Item = &BuildResult> {
    self.results.iter().filter(|r| !r.success)
  }

  /// Total number of warnings across all rows.
  pub fn warning_count(&self) -> usize {
    self.results.iter().map(|r| r.warnings.len()).sum()
  }
}

impl Default for Report {
  fn default() -> Self {
    Self::new()
  }
}

const HEADERS: [&str; 4] = ["Build Target", "Status", "Build Time", "Build Log"];

impl fmt::Display for Report {
  /// Renders an ASCII table with one row per attempted target.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let rows: Vec<[String; 4]> = self
      .results
      .iter()
      .map(|r| {
        [
          r.target.clone(),
          status_cell(r),
          format!("{:.2}", r.elapsed_secs),
          r.build_log.display().to_string(),
        ]
      })
      .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
      for (width, cell) in widths.iter_mut().zip(row) {
        *width = (*width).max(cell.chars().count());
      }
    }

    let border = widths
      .iter()
      .map(|w| "-".repeat(w + 2))
      .collect::<Vec<_>>()
      .join("+");
    let border = format!("+{}+", border);

    writeln!(f, "{}", border)?;
    write_row(f, &HEADERS[..], &widths)?;
    writeln!(f, "{}", border)?;
    for row in &rows {
      write_row(f, &row[..], &widths)?;
    }
    write!(f, "{}", border)
  }
}

fn status_cell(result: &BuildResult) -> String {
  match result.warnings.len() {
    0 => result.success.to_string(),
    n => format!("{} ({} warnings)", result.success, n),
  }
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[impl AsRef<str>], widths: &[usize]) -> fmt::Result {
  write!(f, "|")?;
  for (cell, width) in cells.iter().zip(widths) {
    write!(f, " {:<width$} |", cell.as_ref(), width = width)?;
  }
  writeln!(f)
}
