//! Run configuration
//!
//! Everything a provisioning run needs is resolved up front into a
//! [`Settings`] value. Steps read from it and never consult the process
//! environment directly.

use std::path::PathBuf;

use crate::environment::ProcessEnvironment;
use crate::error::{Result, SetupError};
use crate::host::HostOs;
use crate::retry::RetryPolicy;
use crate::version::VersionSpec;

/// Base of the public releases repository
pub const RELEASES_URL: &str = "https://releases.jfrog.io/artifactory";

/// Loopback addresses of the launched server
pub const LOCAL_ARTIFACTORY_URL: &str = "http://localhost:8081/artifactory/";
pub const LOCAL_ACCESS_URL: &str = "http://localhost:8081/access/";

/// Credentials every fresh installation ships with
pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "password";

/// Where the launched server and its download source live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Releases repository root, without trailing slash
    pub releases: String,
    /// Artifactory service root, with trailing slash
    pub artifactory: String,
    /// Access service root, with trailing slash
    pub access: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            releases: RELEASES_URL.to_string(),
            artifactory: LOCAL_ARTIFACTORY_URL.to_string(),
            access: LOCAL_ACCESS_URL.to_string(),
        }
    }
}

/// Basic-auth credentials for the Artifactory REST API
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl Default for BasicCredentials {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Immutable inputs of one provisioning run
#[derive(Clone)]
pub struct Settings {
    pub version: VersionSpec,
    pub license: String,
    /// Pre-set jfrog home; a default under the user's home is derived when absent
    pub home_override: Option<PathBuf>,
    /// File receiving the exported admin token, if any
    pub export_file: Option<PathBuf>,
    pub host_os: HostOs,
    pub endpoints: Endpoints,
    pub credentials: BasicCredentials,
    pub polling: RetryPolicy,
}

impl Settings {
    /// Validate the CLI version flag and captured environment.
    ///
    /// Checks run in the order license, version, platform so the cheapest
    /// failure is reported first.
    pub fn resolve(rt_version: &str, env: &ProcessEnvironment) -> Result<Self> {
        let license = env
            .license
            .clone()
            .filter(|license| !license.is_empty())
            .ok_or(SetupError::MissingLicense)?;
        let version = VersionSpec::parse(rt_version)?;
        let host_os = HostOs::detect()?;

        Ok(Self {
            version,
            license,
            home_override: env.jfrog_home.clone(),
            export_file: env.github_env.clone(),
            host_os,
            endpoints: Endpoints::default(),
            credentials: BasicCredentials::default(),
            polling: RetryPolicy::default(),
        })
    }

    pub fn is_legacy(&self) -> bool {
        self.version.is_legacy()
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("version", &self.version)
            .field("license", &"<redacted>")
            .field("home_override", &self.home_override)
            .field("export_file", &self.export_file)
            .field("host_os", &self.host_os)
            .field("endpoints", &self.endpoints)
            .field("credentials", &self.credentials)
            .field("polling", &self.polling)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with_license(license: Option<&str>) -> ProcessEnvironment {
        ProcessEnvironment {
            jfrog_home: Some(PathBuf::from("/tmp/jfrog_home")),
            license: license.map(str::to_string),
            github_env: None,
        }
    }

    #[test]
    fn test_missing_license_is_reported_before_version() {
        let err = Settings::resolve("not-a-version", &env_with_license(None)).unwrap_err();
        assert!(matches!(err, SetupError::MissingLicense));

        let err = Settings::resolve("7.1.1", &env_with_license(Some(""))).unwrap_err();
        assert!(matches!(err, SetupError::MissingLicense));
    }

    #[test]
    fn test_invalid_version_is_rejected() {
        let err = Settings::resolve("7.1", &env_with_license(Some("LIC"))).unwrap_err();
        assert!(matches!(err, SetupError::InvalidVersion { .. }));
    }

    #[test]
    fn test_resolved_defaults() {
        let settings = Settings::resolve("6.9.0", &env_with_license(Some("LIC"))).unwrap();
        assert!(settings.is_legacy());
        assert_eq!(settings.license, "LIC");
        assert_eq!(
            settings.home_override,
            Some(PathBuf::from("/tmp/jfrog_home"))
        );
        assert_eq!(settings.endpoints, Endpoints::default());
        assert_eq!(settings.polling, RetryPolicy::default());
        assert_eq!(settings.credentials.username, "admin");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let settings = Settings::resolve("7.1.1", &env_with_license(Some("SECRET-LIC"))).unwrap();
        let debug = format!("{settings:?}");
        assert!(!debug.contains("SECRET-LIC"));
        assert!(!debug.contains("password\""));
        assert!(debug.contains("<redacted>"));
    }
}
