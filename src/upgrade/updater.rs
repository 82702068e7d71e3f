use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, error, info};

use crate::archive::ArchiveExtractor;
use crate::config::SdkConfig;
use crate::constants::{DEFAULT_MARKER_FILE_NAME, DEFAULT_SDK_DIR_NAME, DOWNLOAD_FILE_PREFIX};
use crate::core::SdkError;
use crate::fetch::Fetcher;
use crate::upgrade::backup::BackupManager;
use crate::upgrade::version_check::{InstallPlan, InstallState, classify, read_local_version};
use crate::version::{Version, resolve};

/// Everything an update run needs to know about the installation.
///
/// Built once by the CLI (or a test) and handed to [`SdkUpdater`]; nothing
/// in the updater consults ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdaterContext {
    /// Directory that contains the SDK subdirectory
    pub install_dir: PathBuf,
    /// Explicit version to install. `None` means "whatever the manifest says".
    pub desired_version: Option<Version>,
    /// Name of the SDK subdirectory inside `install_dir`
    pub sdk_dir_name: String,
    /// Name of the marker file inside the SDK subdirectory
    pub marker_file_name: String,
    /// Restore the backup when an upgrade fails after it was taken
    pub restore_on_failure: bool,
    /// Where the archive is downloaded to; the system temp dir when `None`
    pub download_dir: Option<PathBuf>,
}

impl UpdaterContext {
    /// Default layout rooted at `install_dir`.
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
            desired_version: None,
            sdk_dir_name: DEFAULT_SDK_DIR_NAME.to_string(),
            marker_file_name: DEFAULT_MARKER_FILE_NAME.to_string(),
            restore_on_failure: true,
            download_dir: None,
        }
    }

    /// Layout and policy taken from a loaded config file.
    pub fn from_config(install_dir: impl Into<PathBuf>, config: &SdkConfig) -> Self {
        Self {
            install_dir: install_dir.into(),
            desired_version: None,
            sdk_dir_name: config.sdk_dir_name.clone(),
            marker_file_name: config.marker_file_name.clone(),
            restore_on_failure: config.upgrade.restore_on_failure,
            download_dir: config.upgrade.download_dir.clone(),
        }
    }

    pub fn with_desired_version(mut self, version: Option<Version>) -> Self {
        self.desired_version = version;
        self
    }

    pub fn with_restore_on_failure(mut self, restore: bool) -> Self {
        self.restore_on_failure = restore;
        self
    }

    pub fn with_download_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.download_dir = dir;
        self
    }

    /// `<install_dir>/<sdk_dir_name>`
    pub fn sdk_path(&self) -> PathBuf {
        self.install_dir.join(&self.sdk_dir_name)
    }

    /// `<install_dir>/<sdk_dir_name>/<marker_file_name>`
    pub fn marker_path(&self) -> PathBuf {
        self.sdk_path().join(&self.marker_file_name)
    }
}

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Nothing was changed.
    UpToDate {
        version: Version,
        location: PathBuf,
    },
    /// No previous install existed; `version` was extracted.
    Installed {
        version: Version,
        location: PathBuf,
    },
    /// `from` was moved to `backup` and `to` extracted in its place.
    Upgraded {
        from: Version,
        to: Version,
        location: PathBuf,
        backup: PathBuf,
    },
}

impl InstallOutcome {
    /// The version installed at the end of the run.
    pub fn version(&self) -> &Version {
        match self {
            Self::UpToDate {
                version,
                ..
            }
            | Self::Installed {
                version,
                ..
            } => version,
            Self::Upgraded {
                to,
                ..
            } => to,
        }
    }
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpToDate {
                version,
                location,
            } => write!(f, "Installed version {version} is up to date in {}", location.display()),
            Self::Installed {
                version,
                location,
            } => write!(f, "Installed version {version} to {}", location.display()),
            Self::Upgraded {
                from,
                to,
                location,
                backup,
            } => write!(
                f,
                "Upgraded {} from {from} to {to} (previous version kept at {})",
                location.display(),
                backup.display()
            ),
        }
    }
}

/// Brings an SDK installation to the desired version.
///
/// A run resolves the desired version, reads the installed one from the
/// marker file, and then does one of three things:
///
/// - **up to date**: returns without touching the filesystem or fetching
///   the archive
/// - **fresh install**: downloads the archive and extracts it
/// - **upgrade**: renames the installed SDK to `<sdk>-<installed>`, then
///   downloads and extracts. The rename always happens before the download
///   starts.
///
/// # Examples
///
/// ```rust,no_run
/// use sdkup::config::SdkConfig;
/// use sdkup::fetch::HttpFetcher;
/// use sdkup::upgrade::{SdkUpdater, UpdaterContext};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = SdkConfig::default();
/// let context = UpdaterContext::from_config("/opt/sdk", &config);
/// let updater = SdkUpdater::new(HttpFetcher::new(&config)?, context);
///
/// let outcome = updater.reconcile().await?;
/// println!("{outcome}");
/// # Ok(())
/// # }
/// ```
pub struct SdkUpdater<F: Fetcher> {
    fetcher: F,
    context: UpdaterContext,
}

impl<F: Fetcher> SdkUpdater<F> {
    pub fn new(fetcher: F, context: UpdaterContext) -> Self {
        Self {
            fetcher,
            context,
        }
    }

    pub fn context(&self) -> &UpdaterContext {
        &self.context
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// The explicit override if one was given, otherwise the manifest's
    /// release. The manifest is only fetched in the second case.
    pub async fn resolve_desired_version(&self) -> Result<Version> {
        if let Some(version) = &self.context.desired_version {
            debug!("Using requested version {}", version);
            return Ok(version.clone());
        }

        let manifest = self.fetcher.fetch_manifest().await?;
        let version = resolve(&manifest, &self.fetcher.manifest_location())?;
        info!("Latest version is {}", version);
        Ok(version)
    }

    /// Classify the installation without changing anything.
    pub async fn plan(&self) -> Result<InstallPlan> {
        let desired = self.resolve_desired_version().await?;

        let marker = self.context.marker_path();
        let local = read_local_version(&marker).await?;
        match &local {
            Some(version) => info!("Installed version is {}", version),
            None => info!("No installed version found at {}", self.context.sdk_path().display()),
        }

        let state = classify(local.as_ref(), &desired);
        debug!("Install state: {}", state.label());
        Ok(InstallPlan {
            desired,
            state,
        })
    }

    /// Carry out a plan produced by [`plan`](Self::plan).
    pub async fn apply(&self, plan: &InstallPlan) -> Result<InstallOutcome> {
        let location = self.context.sdk_path();
        match &plan.state {
            InstallState::UpToDate => {
                info!("Installed version is up to date");
                Ok(InstallOutcome::UpToDate {
                    version: plan.desired.clone(),
                    location,
                })
            }
            InstallState::FreshInstall => {
                self.install(&plan.desired).await?;
                Ok(InstallOutcome::Installed {
                    version: plan.desired.clone(),
                    location,
                })
            }
            InstallState::UpgradeNeeded {
                installed,
            } => {
                let backup = self.upgrade(installed, &plan.desired).await?;
                Ok(InstallOutcome::Upgraded {
                    from: installed.clone(),
                    to: plan.desired.clone(),
                    location,
                    backup,
                })
            }
        }
    }

    /// [`plan`](Self::plan) followed by [`apply`](Self::apply).
    pub async fn reconcile(&self) -> Result<InstallOutcome> {
        let plan = self.plan().await?;
        self.apply(&plan).await
    }

    async fn upgrade(&self, installed: &Version, desired: &Version) -> Result<PathBuf> {
        info!("Upgrading from {} to {}", installed, desired);

        let backup = BackupManager::new(
            &self.context.install_dir,
            &self.context.sdk_dir_name,
            installed,
        );
        backup.create_backup().await?;

        if let Err(e) = self.install(desired).await {
            if self.context.restore_on_failure {
                if let Err(restore_err) = backup.restore_backup().await {
                    error!("Failed to restore previous install: {:#}", restore_err);
                    return Err(e.context(format!(
                        "Upgrade failed and the previous version could not be restored; it is still at {}",
                        backup.backup_path().display()
                    )));
                }
                return Err(e.context(format!(
                    "Upgrade to {desired} failed; version {installed} was restored"
                )));
            }
            return Err(e.context(format!(
                "Upgrade to {desired} failed; version {installed} remains at {}",
                backup.backup_path().display()
            )));
        }

        Ok(backup.backup_path().to_path_buf())
    }

    async fn install(&self, version: &Version) -> Result<()> {
        let download = self.download_file()?;
        info!("Downloading version {}", version);
        self.fetcher.fetch_archive(version, &download).await?;

        info!("Extracting to {}", self.context.install_dir.display());
        let extractor = ArchiveExtractor::new(self.context.install_dir.clone());
        let archive_path = download.to_path_buf();
        let summary = tokio::task::spawn_blocking(move || extractor.extract(&archive_path))
            .await
            .context("Extraction task failed")??;
        debug!(
            "Extracted {} files and {} directories ({} bytes)",
            summary.files, summary.directories, summary.bytes
        );

        // The download is deleted here, after extraction has finished with it.
        drop(download);
        Ok(())
    }

    fn download_file(&self) -> Result<tempfile::TempPath> {
        let dir = self.context.download_dir.clone().unwrap_or_else(std::env::temp_dir);
        let file = tempfile::Builder::new()
            .prefix(DOWNLOAD_FILE_PREFIX)
            .suffix(".zip")
            .tempfile_in(&dir)
            .map_err(|e| SdkError::FileSystemError {
                operation: "create download file".to_string(),
                path: dir.display().to_string(),
                reason: e.to_string(),
            })?;

        Ok(file.into_temp_path())
    }
}
