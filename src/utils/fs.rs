//! File system helpers: directory creation and lexical path containment.
//!
//! Containment checks here never touch the disk. They reason about path
//! components only, which is what archive extraction needs: the target of an
//! entry has to be validated before anything is created.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Ensures a directory exists, creating it and all parent directories if necessary.
///
/// # Errors
///
/// Fails if the path exists but is not a directory, or if creation fails.
///
/// # Examples
///
/// ```rust,no_run
/// use sdkup::utils::fs::ensure_dir;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// ensure_dir(Path::new("go_appengine/goroot/bin"))?;
/// # Ok(())
/// # }
/// ```
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Ensures that the parent directory of a file path exists.
///
/// Paths without a parent (or with an empty one) are accepted as-is.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }
    Ok(())
}

/// Normalizes a relative path lexically, refusing to leave its starting point.
///
/// `.` components are dropped and `..` removes the previous component. The
/// result is `None` when the path is absolute, carries a Windows prefix, or
/// climbs above its start at any point (`a/../../b` is rejected even though
/// it would end up "inside" again).
///
/// # Examples
///
/// ```rust
/// use sdkup::utils::fs::normalize_relative;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(normalize_relative(Path::new("a/./b/../c")), Some(PathBuf::from("a/c")));
/// assert_eq!(normalize_relative(Path::new("../etc/passwd")), None);
/// assert_eq!(normalize_relative(Path::new("/etc/passwd")), None);
/// ```
#[must_use]
pub fn normalize_relative(path: &Path) -> Option<PathBuf> {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                components.pop()?;
            }
            Component::Normal(part) => components.push(part),
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    Some(components.iter().collect())
}

/// Joins `relative` onto `base` if it stays lexically within `base`.
///
/// Returns `None` for anything [`normalize_relative`] rejects.
///
/// # Examples
///
/// ```rust
/// use sdkup::utils::fs::join_within;
/// use std::path::{Path, PathBuf};
///
/// let base = Path::new("/opt/sdk");
/// assert_eq!(
///     join_within(base, "go_appengine/VERSION"),
///     Some(PathBuf::from("/opt/sdk/go_appengine/VERSION"))
/// );
/// assert_eq!(join_within(base, "go_appengine/../../etc"), None);
/// ```
#[must_use]
pub fn join_within(base: &Path, relative: &str) -> Option<PathBuf> {
    normalize_relative(Path::new(relative)).map(|normalized| base.join(normalized))
}
