//! Installation layout constants
//!
//! Every path that differs between the major-6 layout and the modern layout
//! is resolved once into a [`ServerLayout`], so later steps never branch on
//! the version themselves.

use std::path::{Path, PathBuf};

use crate::host::HostOs;

/// Prefix of the directory found at the root of every Artifactory Pro archive
pub const VENDOR_DIR_PREFIX: &str = "artifactory-pro-";

/// Name the extracted directory is renamed to
pub const INSTALL_DIR: &str = "artifactory";

/// Resolved paths of an installation under a jfrog home
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerLayout {
    home: PathBuf,
    legacy: bool,
}

impl ServerLayout {
    pub fn new(home: impl Into<PathBuf>, legacy: bool) -> Self {
        Self {
            home: home.into(),
            legacy,
        }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn is_legacy(&self) -> bool {
        self.legacy
    }

    /// `<home>/artifactory`
    pub fn install_dir(&self) -> PathBuf {
        self.home.join(INSTALL_DIR)
    }

    /// Directory holding the start scripts
    pub fn bin_dir(&self) -> PathBuf {
        if self.legacy {
            self.install_dir().join("bin")
        } else {
            self.install_dir().join("app").join("bin")
        }
    }

    /// Runtime data directory; only the modern layout has one
    pub fn var_dir(&self) -> Option<PathBuf> {
        (!self.legacy).then(|| self.install_dir().join("var"))
    }

    /// Top-level configuration directory
    pub fn etc_dir(&self) -> PathBuf {
        match self.var_dir() {
            Some(var) => var.join("etc"),
            None => self.install_dir().join("etc"),
        }
    }

    pub fn license_file(&self) -> PathBuf {
        if self.legacy {
            self.etc_dir().join("artifactory.lic")
        } else {
            self.etc_dir()
                .join("artifactory")
                .join("artifactory.cluster.license")
        }
    }

    /// Start command and its arguments for `os`
    pub fn start_command(&self, os: HostOs) -> (PathBuf, Vec<&'static str>) {
        match os {
            HostOs::Windows => (self.bin_dir().join("InstallService.bat"), Vec::new()),
            HostOs::Mac | HostOs::Linux => (self.bin_dir().join("artifactoryctl"), vec!["start"]),
        }
    }

    /// Modern-only paths. `None` on the major-6 layout.
    pub fn modern(&self) -> Option<ModernPaths> {
        let var = self.var_dir()?;
        let etc = var.join("etc");
        Some(ModernPaths {
            system_yaml: etc.join("system.yaml"),
            system_properties: etc.join("artifactory").join("artifactory.system.properties"),
            access_import: etc.join("access").join("access.config.import.yml"),
            token_marker: var
                .join("bootstrap")
                .join("etc")
                .join("access")
                .join("keys")
                .join("generate.token.json"),
            generated_token: etc.join("access").join("keys").join("token.json"),
            common_script: self.bin_dir().join("artifactoryCommon.sh"),
            var,
        })
    }
}

/// Files that only exist on the modern layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModernPaths {
    pub var: PathBuf,
    pub system_yaml: PathBuf,
    pub system_properties: PathBuf,
    pub access_import: PathBuf,
    /// Empty file whose presence makes the server write `generated_token`
    pub token_marker: PathBuf,
    pub generated_token: PathBuf,
    pub common_script: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_layout() {
        let layout = ServerLayout::new("/jf", true);
        assert_eq!(layout.bin_dir(), Path::new("/jf/artifactory/bin"));
        assert_eq!(layout.etc_dir(), Path::new("/jf/artifactory/etc"));
        assert_eq!(
            layout.license_file(),
            Path::new("/jf/artifactory/etc/artifactory.lic")
        );
        assert!(layout.var_dir().is_none());
        assert!(layout.modern().is_none());
    }

    #[test]
    fn test_modern_layout() {
        let layout = ServerLayout::new("/jf", false);
        assert_eq!(layout.bin_dir(), Path::new("/jf/artifactory/app/bin"));
        assert_eq!(layout.etc_dir(), Path::new("/jf/artifactory/var/etc"));
        assert_eq!(
            layout.license_file(),
            Path::new("/jf/artifactory/var/etc/artifactory/artifactory.cluster.license")
        );

        let modern = layout.modern().unwrap();
        assert_eq!(
            modern.token_marker,
            Path::new("/jf/artifactory/var/bootstrap/etc/access/keys/generate.token.json")
        );
        assert_eq!(
            modern.generated_token,
            Path::new("/jf/artifactory/var/etc/access/keys/token.json")
        );
        assert_eq!(
            modern.common_script,
            Path::new("/jf/artifactory/app/bin/artifactoryCommon.sh")
        );
    }

    #[test]
    fn test_start_commands() {
        let layout = ServerLayout::new("/jf", false);
        let (program, args) = layout.start_command(HostOs::Linux);
        assert_eq!(program, Path::new("/jf/artifactory/app/bin/artifactoryctl"));
        assert_eq!(args, vec!["start"]);

        let (program, args) = layout.start_command(HostOs::Windows);
        assert_eq!(
            program,
            Path::new("/jf/artifactory/app/bin/InstallService.bat")
        );
        assert!(args.is_empty());
    }
}
