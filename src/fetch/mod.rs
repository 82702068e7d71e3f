//! Retrieval of the release manifest and the SDK archive.
//!
//! The updater only depends on the [`Fetcher`] trait, so the transport can be
//! swapped out (tests use in-memory fetchers). [`HttpFetcher`] is the
//! production implementation on top of `reqwest`.
//!
//! Downloads are not resumable and are not verified against checksums; a
//! non-success HTTP status is reported as [`SdkError::NetworkError`] instead
//! of being saved as if it were the archive.

use anyhow::Result;
use std::future::Future;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::config::SdkConfig;
use crate::constants::VERSION_PLACEHOLDER;
use crate::core::SdkError;
use crate::utils::progress::ProgressBar;
use crate::version::Version;

/// Source of the two remote inputs of an update run.
pub trait Fetcher {
    /// Human-readable location of the manifest, used in error messages.
    fn manifest_location(&self) -> String;

    /// Fetch the release manifest text.
    fn fetch_manifest(&self) -> impl Future<Output = Result<String>>;

    /// Download the archive for `version` into `destination`, creating or
    /// truncating it. Returns the number of bytes written.
    fn fetch_archive(&self, version: &Version, destination: &Path)
    -> impl Future<Output = Result<u64>>;
}

/// Fetches over HTTP(S).
///
/// # Examples
///
/// ```rust,no_run
/// use sdkup::config::SdkConfig;
/// use sdkup::fetch::{Fetcher, HttpFetcher};
///
/// # async fn example() -> anyhow::Result<()> {
/// let fetcher = HttpFetcher::new(&SdkConfig::default())?;
/// let manifest = fetcher.fetch_manifest().await?;
/// println!("{manifest}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    manifest_url: String,
    archive_url_template: String,
    show_progress: bool,
}

impl HttpFetcher {
    /// Build a client from the configured URLs and timeout.
    pub fn new(config: &SdkConfig) -> Result<Self> {
        let mut builder =
            reqwest::Client::builder().user_agent(concat!("sdkup/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| SdkError::NetworkError {
            operation: "initialize HTTP client".to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            manifest_url: config.manifest_url.clone(),
            archive_url_template: config.archive_url_template.clone(),
            show_progress: true,
        })
    }

    /// Enable or disable the download progress bar.
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// The archive URL for `version`.
    ///
    /// ```rust
    /// # use sdkup::config::SdkConfig;
    /// # use sdkup::fetch::HttpFetcher;
    /// # use sdkup::version::Version;
    /// let fetcher = HttpFetcher::new(&SdkConfig::default()).unwrap();
    /// let url = fetcher.archive_url(&Version::parse_normalized("1.9.50"));
    /// assert!(url.ends_with("go_appengine_sdk_linux_amd64-1.9.50.zip"));
    /// ```
    pub fn archive_url(&self, version: &Version) -> String {
        self.archive_url_template.replace(VERSION_PLACEHOLDER, version.as_str())
    }

    async fn get(&self, url: &str, operation: &str) -> Result<reqwest::Response> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| network_error(operation, url, &e))?;
        Ok(response)
    }
}

fn network_error(operation: &str, url: &str, error: &reqwest::Error) -> anyhow::Error {
    SdkError::NetworkError {
        operation: format!("{operation} from {url}"),
        reason: error.to_string(),
    }
    .into()
}

impl Fetcher for HttpFetcher {
    fn manifest_location(&self) -> String {
        self.manifest_url.clone()
    }

    async fn fetch_manifest(&self) -> Result<String> {
        let operation = "fetch release manifest";
        let response = self.get(&self.manifest_url, operation).await?;
        let text = response
            .text()
            .await
            .map_err(|e| network_error(operation, &self.manifest_url, &e))?;
        Ok(text)
    }

    async fn fetch_archive(&self, version: &Version, destination: &Path) -> Result<u64> {
        let operation = "download SDK archive";
        let url = self.archive_url(version);
        let mut response = self.get(&url, operation).await?;

        let progress = if self.show_progress {
            ProgressBar::new_download(response.content_length())
        } else {
            ProgressBar::hidden()
        };
        progress.set_prefix(format!("Downloading {version}"));

        let fs_error = |e: std::io::Error| SdkError::FileSystemError {
            operation: "write downloaded archive".to_string(),
            path: destination.display().to_string(),
            reason: e.to_string(),
        };

        let mut file = File::create(destination).await.map_err(fs_error)?;
        let mut written = 0u64;
        while let Some(chunk) =
            response.chunk().await.map_err(|e| network_error(operation, &url, &e))?
        {
            file.write_all(&chunk).await.map_err(fs_error)?;
            written += chunk.len() as u64;
            progress.inc(chunk.len() as u64);
        }
        file.flush().await.map_err(fs_error)?;
        progress.finish_and_clear();

        info!("Total of bytes {}", written);
        Ok(written)
    }
}
