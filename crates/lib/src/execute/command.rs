//! Blocking command execution.
//!
//! Output from both stdout and stderr of the child is relayed line by line to
//! our stdout (or stderr, see [`CommandSpec::echo_to`]) and, when a tee log is
//! set, appended to that file. This is
//! the `cmd 2>&1 | tee log` of a shell pipeline, but the exit status reported
//! is the child's own rather than that of `tee`.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Command, Stdio};
use std::sync::Mutex;
use std::thread;

use tracing::{debug, error, info, warn};

use super::types::{CommandSpec, OutputStream, RunError};

/// Run `spec` to completion.
///
/// Returns `Ok(())` only when the process exits with status 0. There are no
/// retries and no timeout: the call blocks until the child exits.
pub fn run(spec: &CommandSpec) -> Result<(), RunError> {
  let cmd = spec.to_string();
  info!(cmd = %cmd, cwd = ?spec.get_current_dir(), "running command");

  let log = match spec.log_path() {
    Some(path) => Some(File::create(path).map_err(|source| RunError::Log {
      path: path.to_path_buf(),
      source,
    })?),
    None => None,
  };

  let mut command = Command::new(spec.program());
  command
    .args(spec.get_args())
    .stdin(Stdio::null())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped());
  if let Some(dir) = spec.get_current_dir() {
    command.current_dir(dir);
  }

  let mut child = command.spawn().map_err(|source| RunError::Spawn {
    cmd: cmd.clone(),
    source,
  })?;

  let echo = spec.echo_stream();
  let sink = Mutex::new(log);
  let stdout = child.stdout.take();
  let stderr = child.stderr.take();
  thread::scope(|s| {
    let sink = &sink;
    if let Some(out) = stdout {
      s.spawn(move || relay(out, echo, sink));
    }
    if let Some(err) = stderr {
      s.spawn(move || relay(err, echo, sink));
    }
  });

  let status = child.wait().map_err(|source| RunError::Wait {
    cmd: cmd.clone(),
    source,
  })?;
  debug!(cmd = %cmd, code = ?status.code(), "command exited");

  if status.success() {
    Ok(())
  } else {
    Err(RunError::Exit {
      cmd,
      code: status.code(),
    })
  }
}

/// Run `spec` and report the outcome as a boolean.
///
/// Failures are logged, never propagated.
pub fn succeeded(spec: &CommandSpec) -> bool {
  match run(spec) {
    Ok(()) => true,
    Err(e) => {
      error!(error = %e, "command failed");
      false
    }
  }
}

fn relay(stream: impl Read, echo: OutputStream, sink: &Mutex<Option<File>>) {
  let mut reader = BufReader::new(stream);
  let mut buf = Vec::new();
  loop {
    buf.clear();
    match reader.read_until(b'\n', &mut buf) {
      Ok(0) => break,
      Ok(_) => {}
      Err(e) => {
        warn!(error = %e, "failed to read command output");
        break;
      }
    }

    let line = String::from_utf8_lossy(&buf);
    let line = line.trim_end_matches(['\r', '\n']);
    match echo {
      OutputStream::Stdout => println!("{}", line),
      OutputStream::Stderr => eprintln!("{}", line),
    }

    let Ok(mut guard) = sink.lock() else {
      continue;
    };
    if let Some(file) = guard.as_mut() {
      if let Err(e) = file.write_all(&buf) {
        warn!(error = %e, "failed to write command output to log");
      }
    }
  }
}
