//! Host operating system detection

use std::fmt;

use crate::error::Result;
use crate::error::precondition::unsupported_platform;

/// Operating systems Artifactory ships archives for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Mac,
    Windows,
    Linux,
}

impl HostOs {
    /// Detect the OS this binary was built for
    pub fn detect() -> Result<Self> {
        Self::from_id(std::env::consts::OS)
    }

    /// Map a Rust `target_os` identifier onto a supported OS
    pub fn from_id(id: &str) -> Result<Self> {
        match id {
            "macos" => Ok(HostOs::Mac),
            "windows" => Ok(HostOs::Windows),
            "linux" => Ok(HostOs::Linux),
            other => Err(unsupported_platform(other)),
        }
    }

    /// Archive suffix used by the releases server for modern versions
    pub fn archive_suffix(self) -> &'static str {
        match self {
            HostOs::Mac => "-darwin.tar.gz",
            HostOs::Windows => "-windows.zip",
            HostOs::Linux => "-linux.tar.gz",
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HostOs::Mac => "mac",
            HostOs::Windows => "windows",
            HostOs::Linux => "linux",
        })
    }
}
