//! Artifactory version selection
//!
//! A version is either the `[RELEASE]` sentinel, resolved by the releases
//! server to the latest build, or a strict `major.minor.patch` triple with
//! `major >= 6`.

use std::fmt;
use std::str::FromStr;

use crate::error::precondition::invalid_version;
use crate::error::{Result, SetupError};

/// Sentinel understood by the releases server as "latest release"
pub const LATEST: &str = "[RELEASE]";

/// Oldest supported major version, which is also the legacy layout
const LEGACY_MAJOR: u32 = 6;

/// A validated version selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpec {
    Latest,
    Exact { major: u32, minor: u32, patch: u32 },
}

impl VersionSpec {
    /// Parse and validate a version selector
    pub fn parse(input: &str) -> Result<Self> {
        if input == LATEST {
            return Ok(VersionSpec::Latest);
        }

        let parts: Vec<&str> = input.split('.').collect();
        if parts.len() != 3 {
            return Err(invalid_version(input));
        }

        let mut numbers = [0u32; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid_version(input));
            }
            *slot = part.parse().map_err(|_| invalid_version(input))?;
        }

        let [major, minor, patch] = numbers;
        if major < LEGACY_MAJOR {
            return Err(SetupError::UnsupportedVersion {
                version: input.to_string(),
            });
        }

        Ok(VersionSpec::Exact {
            major,
            minor,
            patch,
        })
    }

    /// Whether this selects the major-6 layout. `[RELEASE]` is always modern.
    pub fn is_legacy(&self) -> bool {
        matches!(self, VersionSpec::Exact { major, .. } if *major == LEGACY_MAJOR)
    }
}

impl FromStr for VersionSpec {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSpec::Latest => f.write_str(LATEST),
            VersionSpec::Exact {
                major,
                minor,
                patch,
            } => write!(f, "{major}.{minor}.{patch}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_sentinel_is_modern() {
        let version = VersionSpec::parse("[RELEASE]").unwrap();
        assert_eq!(version, VersionSpec::Latest);
        assert!(!version.is_legacy());
        assert_eq!(version.to_string(), "[RELEASE]");
    }

    #[test]
    fn test_major_six_is_legacy() {
        let version = VersionSpec::parse("6.23.42").unwrap();
        assert!(version.is_legacy());
        assert_eq!(version.to_string(), "6.23.42");
    }

    #[test]
    fn test_major_above_six_is_modern() {
        for input in ["7.0.0", "7.77.3", "10.1.2"] {
            let version = VersionSpec::parse(input).unwrap();
            assert!(!version.is_legacy(), "{input} should be modern");
        }
    }

    #[test]
    fn test_major_below_six_is_rejected() {
        let err = VersionSpec::parse("5.11.0").unwrap_err();
        assert!(matches!(err, SetupError::UnsupportedVersion { .. }));
    }

    #[test]
    fn test_malformed_versions_are_rejected() {
        for input in [
            "", "7", "7.1", "7.1.2.3", "latest", "[release]", "7.x.1", "v7.1.2", "7..1", "-7.1.2",
            "+7.1.2", "7.1.2 ", "7.1.-2",
        ] {
            let err = VersionSpec::parse(input).unwrap_err();
            assert!(
                matches!(err, SetupError::InvalidVersion { .. }),
                "{input:?} should be invalid, got {err:?}"
            );
        }
    }

    #[test]
    fn test_from_str() {
        let version: VersionSpec = "7.84.7".parse().unwrap();
        assert_eq!(
            version,
            VersionSpec::Exact {
                major: 7,
                minor: 84,
                patch: 7
            }
        );
    }
}
