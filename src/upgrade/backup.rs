use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::core::SdkError;
use crate::version::Version;

/// Moves an installed SDK out of the way before it is replaced.
///
/// The backup is a rename of `<install_dir>/<sdk_dir>` to
/// `<install_dir>/<sdk_dir>-<installed version>`, so it is cheap, keeps every
/// file attribute, and never copies data. There is exactly one backup slot
/// per version; an occupied slot is an error rather than being overwritten.
///
/// # Examples
///
/// ```rust,no_run
/// use sdkup::upgrade::backup::BackupManager;
/// use sdkup::version::Version;
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// let installed = Version::parse_normalized("1.9.48");
/// let manager = BackupManager::new(Path::new("/opt/sdk"), "go_appengine", &installed);
/// manager.create_backup().await?;
/// assert!(manager.backup_path().ends_with("go_appengine-1.9.48"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BackupManager {
    live_path: PathBuf,
    backup_path: PathBuf,
}

impl BackupManager {
    pub fn new(install_dir: &Path, sdk_dir_name: &str, installed: &Version) -> Self {
        Self {
            live_path: install_dir.join(sdk_dir_name),
            backup_path: install_dir.join(format!("{sdk_dir_name}-{installed}")),
        }
    }

    /// Rename the live install to its backup name.
    ///
    /// Nothing is retried. On error the live install is untouched.
    ///
    /// # Errors
    ///
    /// - [`SdkError::BackupExists`] if the backup path is already taken
    /// - [`SdkError::FileSystemError`] if the rename fails
    pub async fn create_backup(&self) -> Result<()> {
        if self.backup_exists().await {
            return Err(SdkError::BackupExists {
                path: self.backup_path.display().to_string(),
            }
            .into());
        }

        info!("Backing up {} to {}", self.live_path.display(), self.backup_path.display());
        fs::rename(&self.live_path, &self.backup_path).await.map_err(|e| {
            SdkError::FileSystemError {
                operation: "back up previous install".to_string(),
                path: self.live_path.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        debug!("Backup created");
        Ok(())
    }

    /// Put the backup back in place of the live install.
    ///
    /// Whatever a failed upgrade left at the live path is removed first.
    ///
    /// # Errors
    ///
    /// [`SdkError::FileSystemError`] if there is no backup, the partial
    /// install cannot be removed, or the rename fails.
    pub async fn restore_backup(&self) -> Result<()> {
        if !self.backup_exists().await {
            return Err(SdkError::FileSystemError {
                operation: "restore previous install".to_string(),
                path: self.backup_path.display().to_string(),
                reason: "backup not found".to_string(),
            }
            .into());
        }

        warn!("Restoring {} from {}", self.live_path.display(), self.backup_path.display());

        if fs::symlink_metadata(&self.live_path).await.is_ok() {
            debug!("Removing partial install at {}", self.live_path.display());
            fs::remove_dir_all(&self.live_path).await.map_err(|e| SdkError::FileSystemError {
                operation: "remove partial install".to_string(),
                path: self.live_path.display().to_string(),
                reason: e.to_string(),
            })?;
        }

        fs::rename(&self.backup_path, &self.live_path).await.map_err(|e| {
            SdkError::FileSystemError {
                operation: "restore previous install".to_string(),
                path: self.backup_path.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        info!("Restored previous install");
        Ok(())
    }

    pub async fn backup_exists(&self) -> bool {
        fs::symlink_metadata(&self.backup_path).await.is_ok()
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    pub fn live_path(&self) -> &Path {
        &self.live_path
    }
}
