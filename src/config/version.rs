//! Admin API version selection.
//!
//! Versions are released quarterly and named `YYYY-MM`. The version becomes
//! part of every REST path (`/admin/api/{version}/...`).

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Months in which stable versions are released.
const RELEASE_MONTHS: [u8; 4] = [1, 4, 7, 10];

/// Number of stable releases the platform keeps serving.
const SUPPORTED_RELEASES: u16 = 4;

/// An Admin API version.
///
/// ```rust
/// use shopify_client_core::ApiVersion;
///
/// let version: ApiVersion = "2025-04".parse().unwrap();
/// assert_eq!(version.to_string(), "2025-04");
/// assert!(version < ApiVersion::latest());
/// assert_eq!("unstable".parse::<ApiVersion>().unwrap(), ApiVersion::Unstable);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ApiVersion {
    /// A quarterly stable release.
    Release {
        /// Four-digit year.
        year: u16,
        /// Release month (1, 4, 7 or 10).
        month: u8,
    },
    /// The unstable preview version. Sorts after every release.
    Unstable,
}

impl ApiVersion {
    /// Creates a stable release version.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiVersion`] if `month` is not a release month.
    pub fn release(year: u16, month: u8) -> Result<Self, ConfigError> {
        if !(1000..=9999).contains(&year) || !RELEASE_MONTHS.contains(&month) {
            return Err(ConfigError::InvalidApiVersion {
                version: format!("{year:04}-{month:02}"),
            });
        }
        Ok(Self::Release { year, month })
    }

    /// Returns the latest stable version this crate was tested against.
    #[must_use]
    pub const fn latest() -> Self {
        Self::Release {
            year: 2025,
            month: 10,
        }
    }

    /// Returns `true` for released versions.
    #[must_use]
    pub const fn is_stable(&self) -> bool {
        matches!(self, Self::Release { .. })
    }

    /// Returns `true` if the version is within the support window ending at
    /// [`ApiVersion::latest`]. Unstable and newer versions always count.
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        match (self.release_index(), Self::latest().release_index()) {
            (Some(index), Some(latest)) => index + SUPPORTED_RELEASES > latest,
            _ => true,
        }
    }

    const fn release_index(&self) -> Option<u16> {
        match self {
            Self::Release { year, month } => Some(*year * 4 + (*month as u16 - 1) / 3),
            Self::Unstable => None,
        }
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::latest()
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Release { year, month } => write!(f, "{year:04}-{month:02}"),
            Self::Unstable => f.write_str("unstable"),
        }
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s == "unstable" {
            return Ok(Self::Unstable);
        }

        let invalid = || ConfigError::InvalidApiVersion { version: s.clone() };
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: u16 = year.parse().map_err(|_| invalid())?;
        let month: u8 = month.parse().map_err(|_| invalid())?;

        Self::release(year, month).map_err(|_| invalid())
    }
}
