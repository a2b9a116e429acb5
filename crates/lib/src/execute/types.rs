//! Types for running external commands.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while running an external command.
#[derive(Debug, Error)]
pub enum RunError {
  /// The program could not be started (not found, not executable, ...).
  #[error("failed to start `{cmd}`: {source}")]
  Spawn {
    cmd: String,
    #[source]
    source: std::io::Error,
  },

  /// The process ran but did not exit with status 0.
  #[error("command exited with code {code:?}: {cmd}")]
  Exit { cmd: String, code: Option<i32> },

  /// Waiting for the process failed.
  #[error("failed to wait for `{cmd}`: {source}")]
  Wait {
    cmd: String,
    #[source]
    source: std::io::Error,
  },

  /// The tee log could not be created.
  #[error("failed to create log {path}: {source}")]
  Log {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Console stream a command's relayed output is echoed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputStream {
  #[default]
  Stdout,
  Stderr,
}

/// A single external command: program, argument list and optional working directory.
///
/// Arguments are passed to the program as-is, never through a shell, so values
/// containing spaces or quotes need no escaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
  program: OsString,
  args: Vec<OsString>,
  cwd: Option<PathBuf>,
  log: Option<PathBuf>,
  echo: OutputStream,
}

impl CommandSpec {
  pub fn new(program: impl AsRef<OsStr>) -> Self {
    Self {
      program: program.as_ref().to_os_string(),
      args: Vec::new(),
      cwd: None,
      log: None,
      echo: OutputStream::default(),
    }
  }

  pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
    self.args.push(arg.as_ref().to_os_string());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
  {
    self.args.extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
    self
  }

  /// Run the command from `dir` instead of the current directory.
  pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.cwd = Some(dir.into());
    self
  }

  /// Copy the combined output of the command into `path` (truncated first).
  pub fn tee(mut self, path: impl Into<PathBuf>) -> Self {
    self.log = Some(path.into());
    self
  }

  /// Echo the command's output to `stream` instead of stdout.
  pub fn echo_to(mut self, stream: OutputStream) -> Self {
    self.echo = stream;
    self
  }

  pub fn program(&self) -> &OsStr {
    &self.program
  }

  pub fn get_args(&self) -> &[OsString] {
    &self.args
  }

  pub fn get_current_dir(&self) -> Option<&Path> {
    self.cwd.as_deref()
  }

  pub fn log_path(&self) -> Option<&Path> {
    self.log.as_deref()
  }

  pub fn echo_stream(&self) -> OutputStream {
    self.echo
  }
}

impl fmt::Display for CommandSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program.to_string_lossy())?;
    for arg in &self.args {
      write!(f, " {}", arg.to_string_lossy())?;
    }
    Ok(())
  }
}
