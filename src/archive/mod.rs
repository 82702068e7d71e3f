//! Zip archive extraction.
//!
//! [`ArchiveExtractor`] unpacks a zip archive onto a target directory,
//! recreating directory entries and the Unix permission bits stored with
//! every entry.
//!
//! # Guarantees
//!
//! - **Path containment**: every entry name is checked before anything is
//!   written. A single entry that is absolute or climbs out with `..` rejects
//!   the whole archive with [`SdkError::UnsafeArchivePath`].
//! - **Parents on demand**: a file whose directory has no entry of its own,
//!   or whose directory entry comes later, still extracts.
//! - **Bounded handles**: each entry's output file is opened, filled and
//!   closed before the next entry is read.
//! - **Not transactional**: a failure stops at the failing entry and leaves
//!   earlier entries in place. The error names the entry.
//!
//! Directory permission bits are applied after all files are written,
//! deepest directory first, so that a read-only directory entry cannot block
//! the files beneath it.
//!
//! The zip reader is blocking; async callers should run
//! [`ArchiveExtractor::extract`] on a blocking thread.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::ZipArchive;

use crate::core::SdkError;
use crate::utils::fs::{ensure_dir, ensure_parent_dir, join_within};

/// Counts of what an extraction wrote.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Directory entries created
    pub directories: usize,
    /// File entries written
    pub files: usize,
    /// Decompressed bytes written
    pub bytes: u64,
}

/// Extracts zip archives into one target directory.
///
/// # Examples
///
/// ```rust,no_run
/// use sdkup::archive::ArchiveExtractor;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let extractor = ArchiveExtractor::new("/opt/sdk");
/// let summary = extractor.extract(Path::new("/tmp/go_appengine.zip"))?;
/// println!("{} files, {} bytes", summary.files, summary.bytes);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveExtractor {
    target_dir: PathBuf,
}

/// An entry that passed path validation.
struct PlannedEntry {
    name: String,
    target: PathBuf,
}

impl ArchiveExtractor {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
        }
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Extract the zip file at `archive_path`.
    ///
    /// # Errors
    ///
    /// - [`SdkError::FileSystemError`] if the archive cannot be opened
    /// - [`SdkError::ZipError`] if it is not a readable zip archive
    /// - [`SdkError::UnsafeArchivePath`] if any entry escapes the target
    /// - [`SdkError::ExtractionError`] for the first entry that fails to extract
    pub fn extract(&self, archive_path: &Path) -> Result<ExtractionSummary> {
        let file = File::open(archive_path).map_err(|e| SdkError::FileSystemError {
            operation: "open downloaded archive".to_string(),
            path: archive_path.display().to_string(),
            reason: e.to_string(),
        })?;
        self.extract_from(file)
    }

    /// Extract a zip archive from any seekable reader.
    pub fn extract_from<R: Read + Seek>(&self, reader: R) -> Result<ExtractionSummary> {
        let mut archive = ZipArchive::new(reader).map_err(SdkError::from)?;
        let planned = self.plan(&mut archive)?;

        ensure_dir(&self.target_dir).map_err(|e| SdkError::FileSystemError {
            operation: "create extraction directory".to_string(),
            path: self.target_dir.display().to_string(),
            reason: format!("{e:#}"),
        })?;

        let mut summary = ExtractionSummary::default();
        let mut directory_modes: Vec<(PathBuf, u32)> = Vec::new();

        for (index, planned) in planned.into_iter().enumerate() {
            let PlannedEntry {
                name,
                target,
            } = planned;

            let mut entry = archive.by_index(index).map_err(|e| extraction_error(&name, &e))?;
            let mode = entry.unix_mode();

            if entry.is_dir() {
                // "./" style entries denote the target itself
                if target == self.target_dir {
                    continue;
                }
                debug!("Creating directory {}", target.display());
                ensure_dir(&target).map_err(|e| extraction_error(&name, &e))?;
                if let Some(mode) = mode {
                    directory_modes.push((target, mode));
                }
                summary.directories += 1;
            } else {
                debug!("Extracting {}", target.display());
                let written =
                    write_file(&mut entry, &target, mode).map_err(|e| extraction_error(&name, &e))?;
                summary.files += 1;
                summary.bytes += written;
            }
        }

        directory_modes.sort_by_key(|(path, _)| std::cmp::Reverse(path.components().count()));
        for (path, mode) in directory_modes {
            apply_mode(&path, mode)
                .map_err(|e| extraction_error(&path.display().to_string(), &e))?;
        }

        info!(
            "Extracted {} directories and {} files ({} bytes) into {}",
            summary.directories,
            summary.files,
            summary.bytes,
            self.target_dir.display()
        );
        Ok(summary)
    }

    /// Resolve every entry's target, rejecting the archive if any escapes.
    fn plan<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<PlannedEntry>> {
        let mut planned = Vec::with_capacity(archive.len());

        for index in 0..archive.len() {
            let entry = archive.by_index_raw(index).map_err(SdkError::from)?;
            let name = entry.name().to_string();
            let target = join_within(&self.target_dir, &name).ok_or_else(|| {
                SdkError::UnsafeArchivePath {
                    entry: name.clone(),
                }
            })?;
            planned.push(PlannedEntry {
                name,
                target,
            });
        }

        Ok(planned)
    }
}

fn extraction_error(entry: &str, error: &dyn std::fmt::Display) -> anyhow::Error {
    SdkError::ExtractionError {
        entry: entry.to_string(),
        reason: format!("{error:#}"),
    }
    .into()
}

/// Write one file entry; the handle is closed before returning.
fn write_file(entry: &mut impl Read, target: &Path, mode: Option<u32>) -> Result<u64> {
    ensure_parent_dir(target)?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    if let Some(mode) = mode {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode & 0o7777);
    }

    let mut file = options
        .open(target)
        .with_context(|| format!("Failed to create {}", target.display()))?;
    let written = io::copy(entry, &mut file)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    file.flush()?;
    drop(file);

    // The open mode is filtered by the umask; set the stored bits exactly.
    if let Some(mode) = mode {
        apply_mode(target, mode)?;
    }
    Ok(written)
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777))
        .with_context(|| format!("Failed to set permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
