//! External command execution.
//!
//! Every tool the builder drives (configure, build, archive, strip) goes
//! through [`run`]: one synchronous invocation with an explicit argument list
//! and working directory, its output relayed to the console and optionally
//! tee'd into a log file.

mod command;
pub mod types;

pub use command::{run, succeeded};
pub use types::{CommandSpec, OutputStream, RunError};
