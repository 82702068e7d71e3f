//! sdkup - SDK distribution updater
//!
//! Keeps a locally installed, versioned SDK in step with the release its
//! publisher advertises. The installed version is read from a `VERSION`
//! marker file inside the SDK directory; the desired version comes from a
//! small remote manifest (or is given explicitly).
//!
//! # Architecture Overview
//!
//! A run is a short state machine:
//!
//! - **Fresh install**: no marker file. The release archive is downloaded and
//!   extracted into the install directory.
//! - **Up to date**: the marker matches the desired version. Nothing is
//!   fetched or written.
//! - **Upgrade needed**: the marker differs. The SDK directory is renamed to
//!   `<sdk>-<installed version>` first, then the archive is downloaded and
//!   extracted. A failure after the rename restores the previous install.
//!
//! Versions are opaque strings compared for equality only.
//!
//! # Core Modules
//!
//! - [`archive`] - Zip extraction with permission bits and path containment
//! - [`cli`] - Command-line interface
//! - [`config`] - Optional `~/.sdkup/config.toml`
//! - [`core`] - Error types and user-facing error formatting
//! - [`fetch`] - Manifest and archive retrieval over HTTP
//! - [`upgrade`] - Classification, backup and the update run itself
//! - [`version`] - Version values and manifest parsing
//!
//! ## Supporting Modules
//! - [`constants`] - Default URLs, layout names and environment variables
//! - [`utils`] - Filesystem helpers and progress bars
//!
//! # Manifest Format
//!
//! A line-oriented `key: value` text. Only the `release` line matters:
//!
//! ```text
//! release: "1.9.50"
//! timestamp: 1481571235
//! api_versions: ['go1']
//! ```
//!
//! The same format is used by the installed `VERSION` marker.
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Bring the SDK in the current directory up to the latest release
//! sdkup
//!
//! # Install a specific version into /opt/sdk
//! sdkup --version 1.9.50 --install /opt/sdk
//!
//! # Show what would happen
//! sdkup --check
//! ```

pub mod archive;
pub mod cli;
pub mod config;
pub mod core;
pub mod fetch;
pub mod upgrade;

// Supporting modules
pub mod constants;
pub mod utils;
pub mod version;
