//! Installation and upgrade of the SDK.
//!
//! This module decides what an update run has to do and then does it, keeping
//! the previous installation recoverable while the new one is put in place.
//!
//! # Architecture Overview
//!
//! - **[`SdkUpdater`]**: drives a run against any [`Fetcher`](crate::fetch::Fetcher)
//! - **[`UpdaterContext`]**: install directory, layout and policy of a run
//! - **[`backup::BackupManager`]**: rename-based backup and restore
//! - **[`version_check`]**: marker file reading and classification
//! - **[`config::UpgradeConfig`]**: the `[upgrade]` table of the config file
//!
//! ## Update Process Flow
//!
//! ```text
//! 1. Desired version
//!    ├── --version override, or
//!    └── `release` record of the fetched manifest
//!
//! 2. Classification
//!    ├── no marker file          -> fresh install
//!    ├── marker == desired       -> up to date (stop, nothing touched)
//!    └── marker != desired       -> upgrade needed
//!
//! 3. Backup (upgrade only)
//!    └── rename <sdk> to <sdk>-<installed>
//!
//! 4. Install
//!    ├── download archive to a temporary file
//!    └── extract into the install directory
//!
//! 5. On failure after backup (unless restore is disabled)
//!    ├── remove the partial <sdk>
//!    └── rename <sdk>-<installed> back to <sdk>
//! ```
//!
//! Versions are compared for equality only. Installing an "older" version is
//! handled exactly like installing a newer one.
//!
//! # Examples
//!
//! ```rust,no_run
//! use sdkup::config::SdkConfig;
//! use sdkup::fetch::HttpFetcher;
//! use sdkup::upgrade::{InstallState, SdkUpdater, UpdaterContext};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = SdkConfig::default();
//! let updater = SdkUpdater::new(
//!     HttpFetcher::new(&config)?,
//!     UpdaterContext::from_config(".", &config),
//! );
//!
//! let plan = updater.plan().await?;
//! if plan.state != InstallState::UpToDate {
//!     println!("{}", updater.apply(&plan).await?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod backup;
pub mod config;
mod updater;
pub mod version_check;


pub use updater::{InstallOutcome, SdkUpdater, UpdaterContext};
pub use version_check::{InstallPlan, InstallState};
