use super::SOURCE_EXTENSION;
use crate::{Error, Result};

const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// Path segments, ignoring empty and `.` segments. Both separators are accepted.
pub(super) fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
}

/// Split `a/b/c.ts` into `("a/b", "c.ts")`.
pub(super) fn split_file_path(path: &str) -> Result<(&str, &str)> {
    let (folder, name) = match path.rfind(['/', '\\']) {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    };
    if name.is_empty() {
        return Err(Error::invalid_name(path, "missing file name"));
    }
    Ok((folder, name))
}

fn check_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::invalid_name(name, "name is empty"));
    }
    if let Some(c) = name
        .chars()
        .find(|c| INVALID_CHARS.contains(c) || c.is_control())
    {
        return Err(Error::invalid_name(
            name,
            format!("invalid character {c:?}"),
        ));
    }
    Ok(())
}

pub(super) fn check_folder_name(name: &str) -> Result<()> {
    check_name(name)?;
    if name.to_ascii_lowercase().ends_with(SOURCE_EXTENSION) {
        return Err(Error::invalid_name(
            name,
            format!("a folder name cannot end with '{SOURCE_EXTENSION}'"),
        ));
    }
    Ok(())
}

/// `name` without its source extension, compared case-insensitively.
pub(super) fn strip_extension(name: &str) -> Option<&str> {
    let split = name.len().checked_sub(SOURCE_EXTENSION.len())?;
    let extension = name.get(split..)?;
    extension
        .eq_ignore_ascii_case(SOURCE_EXTENSION)
        .then(|| &name[..split])
}

pub(super) fn check_file_name(name: &str) -> Result<()> {
    check_name(name)?;
    match strip_extension(name) {
        Some(stem) if !stem.trim().is_empty() => Ok(()),
        Some(_) => Err(Error::invalid_name(name, "file name has no stem")),
        None => Err(Error::invalid_name(
            name,
            format!("a file name must end with '{SOURCE_EXTENSION}'"),
        )),
    }
}
