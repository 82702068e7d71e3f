use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings that control how an upgrade treats the previous installation.
///
/// Lives under the `[upgrade]` table of the config file:
///
/// ```toml
/// [upgrade]
/// restore_on_failure = true
/// download_dir = "/var/tmp"
/// ```
///
/// # Examples
///
/// ```rust
/// use sdkup::upgrade::config::UpgradeConfig;
///
/// let config = UpgradeConfig::default();
/// assert!(config.restore_on_failure);
/// assert!(config.download_dir.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeConfig {
    /// Put the backup back in place when the download or extraction of the
    /// new version fails after the previous install was renamed away.
    ///
    /// When disabled, a failed upgrade leaves the live SDK path missing and
    /// the previous version only under its backup name.
    #[serde(default = "default_restore_on_failure")]
    pub restore_on_failure: bool,

    /// Directory for the temporary archive download. Defaults to the system
    /// temporary directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            restore_on_failure: default_restore_on_failure(),
            download_dir: None,
        }
    }
}

fn default_restore_on_failure() -> bool {
    true
}
