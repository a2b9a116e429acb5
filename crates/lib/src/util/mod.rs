//! Shared utilities.
//!
//! Filesystem helpers used by the builder and test helpers.

pub mod fs;

#[cfg(test)]
pub mod testutil;
