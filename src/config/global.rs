//! The sdkup configuration file.
//!
//! Every setting has a default, so the file is optional. It lives at
//! `~/.sdkup/config.toml` (`%LOCALAPPDATA%\sdkup\config.toml` on Windows),
//! or wherever `SDKUP_CONFIG_PATH` points.
//!
//! ```toml
//! manifest_url = "https://storage.googleapis.com/appengine-sdks/featured/VERSION"
//! archive_url_template = "https://storage.googleapis.com/appengine-sdks/featured/go_appengine_sdk_linux_amd64-{version}.zip"
//! sdk_dir_name = "go_appengine"
//! marker_file_name = "VERSION"
//! request_timeout_secs = 300
//!
//! [upgrade]
//! restore_on_failure = true
//! ```
//!
//! Command-line flags take precedence over the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::debug;

use crate::constants::{
    CONFIG_PATH_ENV, DEFAULT_ARCHIVE_URL_TEMPLATE, DEFAULT_MANIFEST_URL, DEFAULT_MARKER_FILE_NAME,
    DEFAULT_SDK_DIR_NAME, VERSION_PLACEHOLDER,
};
use crate::core::SdkError;
use crate::upgrade::config::UpgradeConfig;

/// Where the SDK is published and how an installation is laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkConfig {
    /// URL of the release manifest.
    #[serde(default = "default_manifest_url")]
    pub manifest_url: String,

    /// Archive URL with a `{version}` placeholder.
    #[serde(default = "default_archive_url_template")]
    pub archive_url_template: String,

    /// Name of the SDK subdirectory inside the install directory.
    #[serde(default = "default_sdk_dir_name")]
    pub sdk_dir_name: String,

    /// Name of the version marker file inside the SDK subdirectory.
    #[serde(default = "default_marker_file_name")]
    pub marker_file_name: String,

    /// Overall timeout for each HTTP request. Unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Upgrade behavior.
    #[serde(default)]
    pub upgrade: UpgradeConfig,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            manifest_url: default_manifest_url(),
            archive_url_template: default_archive_url_template(),
            sdk_dir_name: default_sdk_dir_name(),
            marker_file_name: default_marker_file_name(),
            request_timeout_secs: None,
            upgrade: UpgradeConfig::default(),
        }
    }
}

fn default_manifest_url() -> String {
    DEFAULT_MANIFEST_URL.to_string()
}

fn default_archive_url_template() -> String {
    DEFAULT_ARCHIVE_URL_TEMPLATE.to_string()
}

fn default_sdk_dir_name() -> String {
    DEFAULT_SDK_DIR_NAME.to_string()
}

fn default_marker_file_name() -> String {
    DEFAULT_MARKER_FILE_NAME.to_string()
}

impl SdkConfig {
    /// Load from the default location, falling back to defaults when the
    /// file does not exist.
    pub async fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_optional(&path).await
    }

    /// Load from `path` when it exists, otherwise return defaults.
    pub async fn load_optional(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path).await
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load from `path`, which must exist.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .map_err(SdkError::from)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// `SDKUP_CONFIG_PATH` if set, otherwise the per-user location.
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("sdkup")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".sdkup")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Reject settings the updater cannot work with.
    ///
    /// # Errors
    ///
    /// [`SdkError::ConfigError`] when the archive template lacks the
    /// `{version}` placeholder or a directory/file name is not a single
    /// plain path component.
    pub fn validate(&self) -> Result<()> {
        if !self.archive_url_template.contains(VERSION_PLACEHOLDER) {
            return Err(SdkError::ConfigError {
                message: format!(
                    "archive_url_template '{}' has no {VERSION_PLACEHOLDER} placeholder",
                    self.archive_url_template
                ),
            }
            .into());
        }

        for (key, value) in [
            ("sdk_dir_name", &self.sdk_dir_name),
            ("marker_file_name", &self.marker_file_name),
        ] {
            if !is_single_component(value) {
                return Err(SdkError::ConfigError {
                    message: format!("{key} '{value}' must be a plain file name"),
                }
                .into());
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
