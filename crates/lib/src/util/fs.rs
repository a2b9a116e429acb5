//! Filesystem helpers.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Create `dir` and its parents. With `remove_first`, an existing tree is deleted beforehand.
pub fn recreate_dir(dir: &Path, remove_first: bool) -> io::Result<()> {
  if remove_first && dir.is_dir() {
    std::fs::remove_dir_all(dir)?;
  }
  std::fs::create_dir_all(dir)
}

/// All files under `root` (recursively) with extension `ext`, as paths relative to `root`.
///
/// Results are sorted so that archive member order is stable between runs.
pub fn find_files_recursive(root: &Path, ext: &str) -> io::Result<Vec<PathBuf>> {
  let mut found = Vec::new();
  for entry in WalkDir::new(root).sort_by_file_name() {
    let entry = entry.map_err(io::Error::other)?;
    if !entry.file_type().is_file() || !has_extension(entry.path(), ext) {
      continue;
    }
    if let Ok(relative) = entry.path().strip_prefix(root) {
      found.push(relative.to_path_buf());
    }
  }
  Ok(found)
}

/// Files directly inside `dir` with extension `ext`, sorted.
pub fn find_files_shallow(dir: &Path, ext: &str) -> io::Result<Vec<PathBuf>> {
  let mut found = Vec::new();
  for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
    let entry = entry.map_err(io::Error::other)?;
    if entry.file_type().is_file() && has_extension(entry.path(), ext) {
      found.push(entry.into_path());
    }
  }
  Ok(found)
}

fn has_extension(path: &Path, ext: &str) -> bool {
  path.extension().is_some_and(|e| e == ext)
}
