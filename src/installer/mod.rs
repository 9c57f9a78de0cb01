//! Archive installation
//!
//! This module handles:
//! - Unpacking the downloaded archive into the jfrog home
//! - Renaming the versioned vendor directory to `artifactory`
//! - macOS fixes for the modern layout

pub mod extract;
pub mod fixups;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::error::fs::{installation, read_failed, write_failed};
use crate::fetch::DownloadedArchive;
use crate::host::HostOs;
use crate::layout::{ServerLayout, VENDOR_DIR_PREFIX};

/// Unpack `archive` and normalise the result into `layout`
pub fn install(archive: &DownloadedArchive, layout: &ServerLayout, os: HostOs) -> Result<()> {
    info!("Extracting archive...");
    extract::extract(&archive.local_path, layout.home())?;
    fs::remove_file(&archive.local_path).map_err(|e| write_failed(&archive.local_path, e))?;

    rename_vendor_dir(layout.home(), &layout.install_dir())?;

    if os == HostOs::Mac {
        if let Some(modern) = layout.modern() {
            fixups::make_tree_permissive(&modern.var)?;
            fixups::fix_bash3_compatibility(&modern.common_script)?;
        }
    }

    Ok(())
}

/// Rename the single `artifactory-pro-*` directory in `home` to `target`.
///
/// Zero or several candidates mean the archive layout changed and the
/// installation cannot continue.
pub fn rename_vendor_dir(home: &Path, target: &Path) -> Result<PathBuf> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(home).map_err(|e| read_failed(home, e))? {
        let entry = entry.map_err(|e| read_failed(home, e))?;
        let is_dir = entry
            .file_type()
            .map_err(|e| read_failed(&entry.path(), e))?
            .is_dir();
        let name = entry.file_name();
        if is_dir && name.to_string_lossy().starts_with(VENDOR_DIR_PREFIX) {
            candidates.push(entry.path());
        }
    }

    match candidates.as_slice() {
        [] => Err(installation(
            "artifactory dir was not found after extracting",
        )),
        [source] => {
            fs::rename(source, target).map_err(|e| {
                installation(format!(
                    "failed renaming {} to {}: {e}",
                    source.display(),
                    target.display()
                ))
            })?;
            info!("Renamed {} to {}", source.display(), target.display());
            Ok(target.to_path_buf())
        }
        several => Err(installation(format!(
            "found {} artifactory dirs after extracting, expected one",
            several.len()
        ))),
    }
}
