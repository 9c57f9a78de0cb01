//! Jfrog home resolution
//!
//! The home is either given by `JFROG_HOME` or defaults to
//! `<user home>/jfrog_home`. A home that already holds an installation is
//! refused so a live instance is never overwritten.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::common::fs::exists;
use crate::error::precondition::configuration;
use crate::error::{Result, SetupError};
use crate::layout::INSTALL_DIR;

/// Directory name used under the user's home when no override is set
pub const DEFAULT_HOME_DIR: &str = "jfrog_home";

/// Outcome of resolving the home directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHome {
    pub path: PathBuf,
    /// True when the path was derived rather than given, so it must be exported
    pub derived: bool,
}

/// Resolve the home from an optional override, deriving a default from the user's home
pub fn resolve(override_path: Option<&Path>) -> Result<ResolvedHome> {
    match override_path {
        Some(path) => resolve_at(path, false),
        None => {
            let user_home = dirs::home_dir()
                .ok_or_else(|| configuration("could not determine the user's home directory"))?;
            resolve_at(&user_home.join(DEFAULT_HOME_DIR), true)
        }
    }
}

/// Prepare `path` as the home: create it when missing, refuse it when provisioned
pub fn resolve_at(path: &Path, derived: bool) -> Result<ResolvedHome> {
    if !exists(path)? {
        fs::create_dir_all(path).map_err(|e| {
            configuration(format!("failed creating jfrog home {}: {e}", path.display()))
        })?;
        info!("Created jfrog home at {}", path.display());
    } else if !path.is_dir() {
        return Err(configuration(format!(
            "jfrog home {} is not a directory",
            path.display()
        )));
    } else {
        let installation = path.join(INSTALL_DIR);
        if exists(&installation)? {
            return Err(SetupError::AlreadyProvisioned {
                path: installation.display().to_string(),
            });
        }
    }

    Ok(ResolvedHome {
        path: path.to_path_buf(),
        derived,
    })
}
