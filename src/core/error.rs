//! Error handling for sdkup
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** so callers (and tests) can tell a network
//!    failure from a malformed manifest or a filesystem problem
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`SdkError`] - Enumerated error types for every failure the updater reports
//! - [`ErrorContext`] - Wrapper that adds suggestions and details for display
//!
//! Library code returns [`anyhow::Result`] and raises [`SdkError`] values where
//! the category matters; [`user_friendly_error`] downcasts them again at the
//! edge of the program.
//!
//! # Error Categories
//!
//! - **Network**: [`SdkError::NetworkError`]
//! - **Manifest**: [`SdkError::ManifestFormatError`]
//! - **File system**: [`SdkError::FileSystemError`], [`SdkError::ExtractionError`],
//!   [`SdkError::UnsafeArchivePath`], [`SdkError::BackupExists`]
//! - **Configuration**: [`SdkError::ConfigError`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use sdkup::core::{SdkError, user_friendly_error};
//!
//! let error = anyhow::Error::from(SdkError::ManifestFormatError {
//!     source_name: "https://example.com/VERSION".to_string(),
//! });
//! user_friendly_error(error).display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Every failure category sdkup distinguishes.
///
/// All of them are fatal: the updater never retries and never recovers
/// locally, apart from restoring the backup after a failed upgrade.
#[derive(Error, Debug)]
pub enum SdkError {
    /// Fetching the manifest or the archive failed.
    ///
    /// Covers connection failures as well as non-success HTTP statuses.
    #[error("Network error: {operation}")]
    NetworkError {
        /// What was being fetched
        operation: String,
        /// Underlying cause
        reason: String,
    },

    /// A manifest (remote or local marker file) has no `release` record.
    #[error("No release version found in {source_name}")]
    ManifestFormatError {
        /// URL or path of the manifest
        source_name: String,
    },

    /// A filesystem operation outside of extraction failed.
    #[error("File system error: {operation} ({path})")]
    FileSystemError {
        /// The operation that failed
        operation: String,
        /// Path involved
        path: String,
        /// Underlying cause
        reason: String,
    },

    /// The backup destination for the current install is already taken.
    #[error("Backup destination already exists: {path}")]
    BackupExists {
        /// The occupied backup path
        path: String,
    },

    /// Writing an archive entry failed. Earlier entries stay on disk.
    #[error("Failed to extract archive entry '{entry}'")]
    ExtractionError {
        /// Stored name of the entry
        entry: String,
        /// Underlying cause
        reason: String,
    },

    /// An archive entry would land outside of the extraction directory.
    #[error("Archive entry '{entry}' escapes the extraction directory")]
    UnsafeArchivePath {
        /// Stored name of the entry
        entry: String,
    },

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// What is wrong
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Archive could not be read as a zip file.
    #[error("Invalid archive: {0}")]
    ZipError(#[from] zip::result::ZipError),

    /// Config file could not be parsed.
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Anything else.
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

/// An [`SdkError`] together with hints for the person running the CLI.
///
/// # Examples
///
/// ```rust,no_run
/// use sdkup::core::{ErrorContext, SdkError};
///
/// let context = ErrorContext::new(SdkError::ConfigError {
///     message: "archive_url_template has no {version} placeholder".to_string(),
/// })
/// .with_suggestion("Add {version} to archive_url_template");
///
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: SdkError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context with no suggestion or details.
    pub fn new(error: SdkError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Attach a suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] suitable for the terminal.
///
/// Typed [`SdkError`]s (also when wrapped in `anyhow` context) get tailored
/// suggestions; the outer context message is kept in the details. Plain IO
/// errors are classified by kind. Anything else is reported with its full
/// cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let headline = error.to_string();
    let causes: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();

    let error = match error.downcast::<SdkError>() {
        Ok(sdk_error) => {
            let typed_message = sdk_error.to_string();
            let mut ctx = create_error_context(sdk_error);
            if headline != typed_message {
                let details = match ctx.details.take() {
                    Some(details) => format!("{details}\nWhile: {headline}"),
                    None => format!("While: {headline}"),
                };
                ctx.details = Some(details);
            }
            return ctx;
        }
        Err(error) => error,
    };

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(SdkError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                    reason: io_error.to_string(),
                })
                .with_suggestion("Check ownership of the install directory or run with elevated permissions")
                .with_details(headline);
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(SdkError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                    reason: io_error.to_string(),
                })
                .with_suggestion("Check that the install directory exists and the path is correct")
                .with_details(headline);
            }
            _ => {}
        }
    }

    let mut message = headline;
    if !causes.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in causes.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(SdkError::Other {
        message,
    })
}

fn create_error_context(error: SdkError) -> ErrorContext {
    match error {
        SdkError::NetworkError { operation, reason } => {
            let details = format!("Cause: {reason}");
            ErrorContext::new(SdkError::NetworkError { operation, reason })
                .with_suggestion("Check your internet connection and the manifest_url / archive_url_template settings")
                .with_details(details)
        }

        SdkError::ManifestFormatError { source_name } => {
            let details = format!(
                "{source_name} must contain a line like 'release: \"1.9.48\"'"
            );
            ErrorContext::new(SdkError::ManifestFormatError { source_name })
                .with_suggestion("Pass the desired version explicitly with --version, or fix the manifest")
                .with_details(details)
        }

        SdkError::FileSystemError { operation, path, reason } => {
            let details = format!("Cause: {reason}");
            ErrorContext::new(SdkError::FileSystemError { operation, path, reason })
                .with_suggestion(match cfg!(windows) {
                    true => "Check that no other program holds files in the install directory and that you may write to it",
                    false => "Check permissions of the install directory with 'ls -la'",
                })
                .with_details(details)
        }

        SdkError::BackupExists { path } => {
            let suggestion = format!("Move or delete {path} and run again");
            ErrorContext::new(SdkError::BackupExists { path })
                .with_suggestion(suggestion)
                .with_details("Only one backup per installed version is kept and an existing one is never overwritten")
        }

        SdkError::ExtractionError { entry, reason } => {
            let details = format!("Cause: {reason}. Entries written before the failure remain on disk");
            ErrorContext::new(SdkError::ExtractionError { entry, reason })
                .with_suggestion("Check free disk space and permissions, then run again")
                .with_details(details)
        }

        SdkError::UnsafeArchivePath { entry } => ErrorContext::new(SdkError::UnsafeArchivePath { entry })
            .with_suggestion("Verify the archive source; the download may be corrupted or tampered with")
            .with_details("Nothing was extracted because the archive failed path validation"),

        SdkError::ConfigError { message } => ErrorContext::new(SdkError::ConfigError { message })
            .with_suggestion("Check the config file (see --config or SDKUP_CONFIG_PATH)"),

        SdkError::ZipError(e) => ErrorContext::new(SdkError::ZipError(e))
            .with_suggestion("The downloaded file is not a valid zip archive; check archive_url_template"),

        other => ErrorContext::new(other),
    }
}
