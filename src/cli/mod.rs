//! Command-line interface for sdkup.
//!
//! `sdkup` has no subcommands: a run brings the SDK in the install directory
//! to the desired version, or with `--check` only reports what it would do.
//!
//! # Usage
//!
//! ```bash
//! # Install or upgrade to the latest published release in the current directory
//! sdkup
//!
//! # Pin a version and install elsewhere
//! sdkup --version 1.9.50 --install /opt/sdk
//!
//! # Report the state without changing anything
//! sdkup --check --install /opt/sdk
//! ```
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug output
//! - `--quiet` - Suppress logging and progress, keep the final result line
//! - `--no-progress` - Disable the download progress bar
//! - `--config` - Path to a config file (default `~/.sdkup/config.toml`)
//!
//! Logging goes to stderr so that stdout only carries the result.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use colored::Colorize;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::SdkConfig;
use crate::core::SdkError;
use crate::fetch::HttpFetcher;
use crate::upgrade::{InstallOutcome, InstallPlan, InstallState, SdkUpdater, UpdaterContext};
use crate::version::Version;

/// Runtime settings derived from the global flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log filter directive; `None` disables logging unless `RUST_LOG` is set
    pub log_level: Option<String>,
    /// Hide the download progress bar
    pub no_progress: bool,
    /// Explicit config file, which then has to exist
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber. Later calls are no-ops.
    ///
    /// `--verbose` always wins. Otherwise `RUST_LOG` is honored when set,
    /// then the level chosen from the flags.
    pub fn init_logging(&self) {
        let verbose = self.log_level.as_deref().is_some_and(|level| level.contains("debug"));
        let filter = if verbose {
            self.log_level.as_deref().map(EnvFilter::new)
        } else if std::env::var_os("RUST_LOG").is_some() {
            Some(EnvFilter::from_default_env())
        } else {
            self.log_level.as_deref().map(EnvFilter::new)
        };

        let Some(filter) = filter else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Install or upgrade a versioned SDK distribution.
#[derive(Parser, Debug)]
#[command(
    name = "sdkup",
    about = "Install or upgrade an SDK from its published release archive",
    version,
    author,
    disable_version_flag = true,
    long_about = "sdkup reads the installed SDK version from its VERSION marker, compares it with \
                  the published (or requested) release, and when they differ moves the old \
                  install aside and extracts the new release archive in its place."
)]
pub struct Cli {
    /// SDK version to install instead of the latest published release.
    ///
    /// Non-numeric characters are stripped, so `go1.9.50` and `1.9.50` are the
    /// same version. The release manifest is not fetched when this is given.
    #[arg(long = "version", value_name = "VERSION")]
    sdk_version: Option<String>,

    /// Directory containing the SDK subdirectory (default: current directory)
    #[arg(long = "install", visible_alias = "install-dir", value_name = "DIR")]
    install: Option<PathBuf>,

    /// Print the installed and desired versions and exit without changes
    #[arg(long)]
    check: bool,

    /// Leave the previous install under its backup name if the upgrade fails
    #[arg(long)]
    no_restore: bool,

    /// Path to the config file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress logging and progress output
    #[arg(short, long)]
    quiet: bool,

    /// Disable the download progress bar
    #[arg(long)]
    no_progress: bool,

    /// Print the sdkup version
    #[arg(
        short = 'V',
        long = "tool-version",
        action = ArgAction::Version,
        value_parser = clap::value_parser!(bool)
    )]
    tool_version: (),
}

impl Cli {
    /// Run with settings derived from the parsed flags.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("sdkup=debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("sdkup=info".to_string())
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress || self.quiet,
            config_path: self.config.clone(),
        }
    }

    /// Run the updater with explicit runtime settings.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        let sdk_config = match &config.config_path {
            Some(path) => SdkConfig::load_from(path).await?,
            None => SdkConfig::load().await?,
        };
        sdk_config.validate()?;

        let desired = self.sdk_version.as_deref().map(parse_version_arg).transpose()?;
        let install_dir = match self.install {
            Some(dir) => dir,
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };
        debug!("Install directory: {}", install_dir.display());

        let context = UpdaterContext::from_config(install_dir, &sdk_config)
            .with_desired_version(desired)
            .with_restore_on_failure(sdk_config.upgrade.restore_on_failure && !self.no_restore);
        let fetcher = HttpFetcher::new(&sdk_config)?.show_progress(!config.no_progress);
        let updater = SdkUpdater::new(fetcher, context);

        if self.check {
            let plan = updater.plan().await?;
            print_plan(&plan);
            return Ok(());
        }

        let outcome = updater.reconcile().await?;
        print_outcome(&outcome);
        Ok(())
    }
}

/// Normalize the `--version` argument.
fn parse_version_arg(raw: &str) -> Result<Version> {
    let version = Version::parse_normalized(raw);
    if version.is_empty() {
        return Err(SdkError::ConfigError {
            message: format!("--version '{raw}' contains no version number"),
        }
        .into());
    }
    Ok(version)
}

fn print_plan(plan: &InstallPlan) {
    let line = plan.to_string();
    match plan.state {
        InstallState::UpToDate => println!("{}", line.green()),
        InstallState::FreshInstall | InstallState::UpgradeNeeded { .. } => {
            println!("{}", line.yellow());
        }
    }
}

fn print_outcome(outcome: &InstallOutcome) {
    match outcome {
        InstallOutcome::UpToDate {
            ..
        } => println!("{}", outcome.to_string().green()),
        InstallOutcome::Installed {
            ..
        } => println!("{} {}", "✓".green(), outcome.to_string().green()),
        InstallOutcome::Upgraded {
            backup,
            ..
        } => {
            println!("{} {}", "✓".green(), outcome.to_string().green());
            println!("Remove {} once the new version is confirmed working", backup.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "sdkup",
            "--version",
            "go1.9.50",
            "--install-dir",
            "/opt/sdk",
            "--check",
            "--no-restore",
        ])
        .unwrap();

        assert_eq!(cli.sdk_version.as_deref(), Some("go1.9.50"));
        assert_eq!(cli.install, Some(PathBuf::from("/opt/sdk")));
        assert!(cli.check);
        assert!(cli.no_restore);
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["sdkup", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_build_config() {
        let cli = Cli::try_parse_from(["sdkup", "-q"]).unwrap();
        let config = cli.build_config();
        assert_eq!(config.log_level, None);
        assert!(config.no_progress);

        let cli = Cli::try_parse_from(["sdkup", "--verbose", "--config", "/tmp/c.toml"]).unwrap();
        let config = cli.build_config();
        assert_eq!(config.log_level.as_deref(), Some("sdkup=debug"));
        assert!(!config.no_progress);
        assert_eq!(config.config_path, Some(PathBuf::from("/tmp/c.toml")));
    }

    #[test]
    fn test_parse_version_arg() {
        assert_eq!(parse_version_arg("go1.9.50").unwrap().as_str(), "1.9.50");

        let err = parse_version_arg("latest").unwrap_err();
        assert!(matches!(err.downcast_ref::<SdkError>(), Some(SdkError::ConfigError { .. })));
    }
}
