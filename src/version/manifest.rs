use anyhow::Result;
use tracing::debug;

use super::Version;
use crate::constants::RELEASE_KEY;
use crate::core::SdkError;

/// Extract the release [`Version`] from a `key: value` manifest.
///
/// Lines are split on every `:`. A line is the release record when its first
/// segment, trimmed, is `release`; its second segment is the raw value. Text
/// after a second colon is dropped. The first release record wins.
///
/// `source_name` only labels the error (e.g. the manifest URL or the marker
/// file path).
///
/// # Errors
///
/// [`SdkError::ManifestFormatError`] when no line carries a `release` key.
///
/// # Examples
///
/// ```rust
/// use sdkup::version::resolve;
///
/// let manifest = "release: \"1.9.48\"\ntimestamp: 1481571235\n";
/// let version = resolve(manifest, "VERSION").unwrap();
/// assert_eq!(version.as_str(), "1.9.48");
///
/// assert!(resolve("timestamp: 1481571235\n", "VERSION").is_err());
/// ```
pub fn resolve(manifest: &str, source_name: &str) -> Result<Version> {
    for line in manifest.split('\n') {
        let mut segments = line.split(':');
        let key = segments.next().unwrap_or_default();
        if key.trim() != RELEASE_KEY {
            continue;
        }
        // A bare "release" without a colon has no value to read.
        let Some(value) = segments.next() else {
            continue;
        };

        let version = Version::parse_normalized(value);
        debug!("Resolved release {:?} from {}", version.as_str(), source_name);
        return Ok(version);
    }

    Err(SdkError::ManifestFormatError {
        source_name: source_name.to_string(),
    }
    .into())
}
