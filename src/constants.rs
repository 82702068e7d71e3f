//! Global constants used throughout the sdkup codebase.
//!
//! Default locations of the published SDK, the on-disk layout of an
//! installation, and the names of environment variables honored by the CLI.

/// Default location of the published release manifest.
pub const DEFAULT_MANIFEST_URL: &str =
    "https://storage.googleapis.com/appengine-sdks/featured/VERSION";

/// Default archive location. `{version}` is replaced with the desired version.
pub const DEFAULT_ARCHIVE_URL_TEMPLATE: &str = "https://storage.googleapis.com/appengine-sdks/featured/go_appengine_sdk_linux_amd64-{version}.zip";

/// Placeholder substituted in [`DEFAULT_ARCHIVE_URL_TEMPLATE`].
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Name of the SDK subdirectory inside the install directory.
pub const DEFAULT_SDK_DIR_NAME: &str = "go_appengine";

/// Name of the marker file inside the SDK subdirectory.
pub const DEFAULT_MARKER_FILE_NAME: &str = "VERSION";

/// Manifest key carrying the release version.
pub const RELEASE_KEY: &str = "release";

/// Prefix of the temporary file the archive is downloaded to.
pub const DOWNLOAD_FILE_PREFIX: &str = "sdkup-archive-";

/// Overrides the location of the configuration file.
pub const CONFIG_PATH_ENV: &str = "SDKUP_CONFIG_PATH";

/// Disables progress bars when set to any value.
pub const NO_PROGRESS_ENV: &str = "SDKUP_NO_PROGRESS";
