//! Common file system operations with unified error handling

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::error::fs::{read_failed, write_failed};

/// Mode for licenses, tokens and other secret material
pub const SECRET_MODE: u32 = 0o600;

/// Mode for ordinary configuration files
pub const CONFIG_MODE: u32 = 0o644;

/// Write `contents` to `path`, creating parent directories, and leave the
/// file with `mode` on Unix. Existing files are truncated and re-moded.
pub fn write_with_mode(path: &Path, contents: &[u8], mode: u32) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| write_failed(parent, e))?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }

    let mut file = options.open(path).map_err(|e| write_failed(path, e))?;
    file.write_all(contents).map_err(|e| write_failed(path, e))?;
    file.sync_all().map_err(|e| write_failed(path, e))?;

    set_mode(path, mode)
}

/// Append `line` to `path`, creating it with `mode` when missing
pub fn append_line(path: &Path, line: &str, mode: u32) -> Result<()> {
    let mut options = OpenOptions::new();
    options.append(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    let mut file = options.open(path).map_err(|e| write_failed(path, e))?;
    writeln!(file, "{line}").map_err(|e| write_failed(path, e))?;
    file.flush().map_err(|e| write_failed(path, e))
}

/// Read a whole file as UTF-8
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| read_failed(path, e))
}

/// Whether `path` exists; errors other than "not found" are propagated
pub fn exists(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(read_failed(path, e)),
    }
}

#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| write_failed(path, e))
}

#[cfg(not(unix))]
pub fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
