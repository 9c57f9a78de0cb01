//! Process environment boundary
//!
//! The tool reads three variables and mutates two of them. Both directions go
//! through this module so the rest of the crate works on plain values.

use std::path::{Path, PathBuf};

/// Home override understood by Artifactory itself
pub const JFROG_HOME_ENV: &str = "JFROG_HOME";

/// License content
pub const LICENSE_ENV: &str = "RTLIC";

/// GitHub Actions environment file
pub const GITHUB_ENV_FILE_ENV: &str = "GITHUB_ENV";

/// Variables read at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessEnvironment {
    pub jfrog_home: Option<PathBuf>,
    pub license: Option<String>,
    pub github_env: Option<PathBuf>,
}

impl ProcessEnvironment {
    /// Snapshot the relevant variables of the current process
    pub fn capture() -> Self {
        let non_empty = |name: &str| std::env::var_os(name).filter(|value| !value.is_empty());
        Self {
            jfrog_home: non_empty(JFROG_HOME_ENV).map(PathBuf::from),
            license: std::env::var(LICENSE_ENV).ok(),
            github_env: std::env::var_os(GITHUB_ENV_FILE_ENV).map(PathBuf::from),
        }
    }
}

/// Receives the environment changes a run makes
pub trait EnvironmentSink {
    /// Publish the resolved jfrog home for tooling started after this run
    fn export_home(&mut self, home: &Path);

    /// Forget the license once it is on disk
    fn clear_license(&mut self);
}

/// Applies changes to the real process environment.
///
/// Only use this from a single-threaded process. The provisioning pipeline
/// calls the sink before the download client exists and after it is dropped,
/// and before the server client is first used.
#[derive(Debug, Default)]
pub struct ProcessEnvironmentSink;

impl EnvironmentSink for ProcessEnvironmentSink {
    fn export_home(&mut self, home: &Path) {
        // SAFETY: no other thread exists when the home is exported.
        unsafe { std::env::set_var(JFROG_HOME_ENV, home) };
    }

    fn clear_license(&mut self) {
        // SAFETY: the download client thread is joined before the license is cleared.
        unsafe { std::env::remove_var(LICENSE_ENV) };
    }
}

/// Records changes without touching the process
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingSink {
    pub exported_home: Option<PathBuf>,
    pub license_cleared: bool,
}

impl EnvironmentSink for RecordingSink {
    fn export_home(&mut self, home: &Path) {
        self.exported_home = Some(home.to_path_buf());
    }

    fn clear_license(&mut self) {
        self.license_cleared = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_capture_and_sink_round_trip() {
        // SAFETY: serialized with every other test that touches these variables.
        unsafe {
            std::env::set_var(LICENSE_ENV, "LIC");
            std::env::set_var(JFROG_HOME_ENV, "");
            std::env::remove_var(GITHUB_ENV_FILE_ENV);
        }

        let captured = ProcessEnvironment::capture();
        assert_eq!(captured.license.as_deref(), Some("LIC"));
        assert_eq!(captured.jfrog_home, None);
        assert_eq!(captured.github_env, None);

        let mut sink = ProcessEnvironmentSink;
        sink.export_home(Path::new("/tmp/jfrog_home"));
        sink.clear_license();

        let captured = ProcessEnvironment::capture();
        assert_eq!(captured.license, None);
        assert_eq!(
            captured.jfrog_home,
            Some(PathBuf::from("/tmp/jfrog_home"))
        );

        // SAFETY: see above.
        unsafe { std::env::remove_var(JFROG_HOME_ENV) };
    }

    #[test]
    fn test_recording_sink() {
        let mut sink = RecordingSink::default();
        sink.export_home(Path::new("/jf"));
        sink.clear_license();
        assert_eq!(sink.exported_home, Some(PathBuf::from("/jf")));
        assert!(sink.license_cleared);
    }
}
