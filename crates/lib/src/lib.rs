//! nlbuild-lib: build a static library once per target configuration.
//!
//! The crate drives an external configure/build/archive toolchain across a
//! matrix of targets read from a JSON document:
//! - `config`: loads the matrix, merging global options into each target
//! - `build`: configures, builds, archives and installs one target
//! - `orchestrate`: runs the matrix and collects a `Report`
//! - `execute`: runs a single external command, tee'ing its output to a log
//! - `inspect`: scans build logs for error lines the exit code missed

pub mod build;
pub mod config;
pub mod consts;
pub mod execute;
pub mod inspect;
pub mod orchestrate;
pub mod toolchain;
pub mod util;
