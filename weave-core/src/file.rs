use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use eyre::{Result, WrapErr};
use walkdir::WalkDir;

/// Result of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written
    Written,
    /// File already had the exact same content
    Unchanged,
}

/// Write `content` to `path`, creating parent directories as needed.
///
/// Files whose current content is identical are left untouched so that
/// repeated runs keep their modification times.
pub fn write_if_changed(path: &Path, content: &str) -> Result<WriteResult> {
    if std::fs::read_to_string(path).is_ok_and(|existing| existing == content) {
        return Ok(WriteResult::Unchanged);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create directory '{}'", parent.display()))?;
    }
    std::fs::write(path, content)
        .wrap_err_with(|| format!("failed to write '{}'", path.display()))?;
    Ok(WriteResult::Written)
}

/// List every regular file below `root`.
///
/// A missing root is not an error and yields an empty set.
pub fn list_files(root: &Path) -> Result<BTreeSet<PathBuf>> {
    let mut files = BTreeSet::new();
    if !root.exists() {
        return Ok(files);
    }
    for entry in WalkDir::new(root) {
        let entry = entry.wrap_err_with(|| format!("failed to scan '{}'", root.display()))?;
        if entry.file_type().is_file() {
            files.insert(entry.into_path());
        }
    }
    Ok(files)
}

/// Remove a single file.
pub fn remove_file(path: &Path) -> Result<()> {
    std::fs::remove_file(path).wrap_err_with(|| format!("failed to remove '{}'", path.display()))
}

/// Remove the ancestors of `path` that are empty, up to `root` excluded.
///
/// Returns the number of removed directories.
pub fn remove_empty_parents(path: &Path, root: &Path) -> Result<usize> {
    let mut removed = 0;
    let mut current = path.parent();
    while let Some(dir) = current {
        if dir == root || !dir.starts_with(root) {
            break;
        }
        let mut entries = std::fs::read_dir(dir)
            .wrap_err_with(|| format!("failed to read directory '{}'", dir.display()))?;
        if entries.next().is_some() {
            break;
        }
        std::fs::remove_dir(dir)
            .wrap_err_with(|| format!("failed to remove directory '{}'", dir.display()))?;
        removed += 1;
        current = dir.parent();
    }
    Ok(removed)
}
