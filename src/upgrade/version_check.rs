use anyhow::Result;
use std::fmt;
use std::io;
use std::path::Path;
use tokio::fs;
use tracing::debug;

use crate::core::SdkError;
use crate::version::{Version, resolve};

/// How the installed SDK relates to the desired version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallState {
    /// No marker file: nothing to back up, install straight away.
    FreshInstall,
    /// The marker reports exactly the desired version.
    UpToDate,
    /// The marker reports a different version, which has to be backed up
    /// before the desired one is installed.
    UpgradeNeeded {
        /// Version found in the marker file
        installed: Version,
    },
}

impl InstallState {
    /// Short label for logs and `--check` output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FreshInstall => "fresh install",
            Self::UpToDate => "up to date",
            Self::UpgradeNeeded {
                ..
            } => "upgrade needed",
        }
    }
}

/// Compare the installed version (if any) with the desired one.
///
/// Only textual equality counts. A desired version "older" than the installed
/// one is still an upgrade in this sense.
///
/// # Examples
///
/// ```rust
/// use sdkup::upgrade::version_check::{InstallState, classify};
/// use sdkup::version::Version;
///
/// let desired = Version::parse_normalized("1.9.50");
/// assert_eq!(classify(None, &desired), InstallState::FreshInstall);
/// assert_eq!(classify(Some(&desired), &desired), InstallState::UpToDate);
///
/// let installed = Version::parse_normalized("1.9.48");
/// assert_eq!(
///     classify(Some(&installed), &desired),
///     InstallState::UpgradeNeeded { installed: installed.clone() }
/// );
/// ```
pub fn classify(installed: Option<&Version>, desired: &Version) -> InstallState {
    match installed {
        None => InstallState::FreshInstall,
        Some(installed) if installed == desired => InstallState::UpToDate,
        Some(installed) => InstallState::UpgradeNeeded {
            installed: installed.clone(),
        },
    }
}

/// The outcome of classification, before anything is changed on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    /// The version to end up with
    pub desired: Version,
    /// Where the installation stands
    pub state: InstallState,
}

impl InstallPlan {
    /// The currently installed version, if there is one.
    pub fn installed(&self) -> Option<&Version> {
        match &self.state {
            InstallState::FreshInstall => None,
            InstallState::UpToDate => Some(&self.desired),
            InstallState::UpgradeNeeded {
                installed,
            } => Some(installed),
        }
    }
}

impl fmt::Display for InstallPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            InstallState::FreshInstall => {
                write!(f, "No installed version found; version {} would be installed", self.desired)
            }
            InstallState::UpToDate => {
                write!(f, "Installed version {} is up to date", self.desired)
            }
            InstallState::UpgradeNeeded {
                installed,
            } => write!(
                f,
                "Installed version {installed} differs from {}; an upgrade is available",
                self.desired
            ),
        }
    }
}

/// Read the version recorded in an installation's marker file.
///
/// A missing marker means there is no installation (`Ok(None)`). Any other
/// read failure is fatal, and so is a marker without a `release` record.
///
/// # Errors
///
/// - [`SdkError::FileSystemError`] when the marker exists but cannot be read
/// - [`SdkError::ManifestFormatError`] when it has no `release` record
pub async fn read_local_version(marker_path: &Path) -> Result<Option<Version>> {
    let bytes = match fs::read(marker_path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No version marker at {}", marker_path.display());
            return Ok(None);
        }
        Err(e) => {
            return Err(SdkError::FileSystemError {
                operation: "read installed version marker".to_string(),
                path: marker_path.display().to_string(),
                reason: e.to_string(),
            }
            .into());
        }
    };

    let text = String::from_utf8_lossy(&bytes);
    let version = resolve(&text, &marker_path.display().to_string())?;
    Ok(Some(version))
}
