//! Per-target library builds.
//!
//! A target is built in its own directory `<build_root>/<prefix>/<target>`:
//!
//! 1. **Configure**: run the configure tool with the target's options as
//!    `-D<key>=<value>` definitions (skipped when reusing an existing Makefile)
//! 2. **Build**: run the build tool in the build directory, checking both the
//!    exit status and the build log
//! 3. **Archive**: pack every object file under the build directory into
//!    `lib<prefix>_<target>.a`
//! 4. **Install**: copy the archive, and one copy per alias, into the install directory
//!
//! # Submodules
//!
//! - [`target`] - The [`TargetBuilder`] driving the steps above

pub mod target;
mod types;

pub use target::{BuilderOptions, TargetBuilder, TargetRequest, parallel_flag};
pub use types::*;
