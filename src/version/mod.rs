//! Release version tokens and the manifest parser that produces them.
//!
//! Both the published manifest and the marker file left behind by an
//! installation are loose `key: value` documents:
//!
//! ```text
//! release: "1.9.48"
//! timestamp: 1481571235
//! api_versions: ['go1']
//! ```
//!
//! Only the `release` record matters. Its value is normalized to digits and
//! dots, so `"go1.9.48"` and `1.9.48` designate the same [`Version`].
//!
//! Versions are compared by equality only. There is no ordering:
//! anything that differs from the installed version counts as the one to
//! install, including older releases.

mod manifest;

pub use manifest::resolve;

use std::fmt;

/// A normalized release version made only of ASCII digits and `.`.
///
/// # Examples
///
/// ```rust
/// use sdkup::version::Version;
///
/// let version = Version::parse_normalized("go1.9.48  ");
/// assert_eq!(version.as_str(), "1.9.48");
/// assert_eq!(version, Version::parse_normalized("1.9.48"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    /// Build a version from arbitrary text by dropping every character
    /// outside `[0-9.]`.
    ///
    /// The result may be empty when the input holds no digits or dots. That is
    /// not rejected here; callers that care check [`Version::is_empty`].
    #[must_use]
    pub fn parse_normalized(raw: &str) -> Self {
        Self(raw.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect())
    }

    /// The normalized token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether normalization left nothing behind.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Version {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
