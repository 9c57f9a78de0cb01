//! macOS compatibility fixes for the modern layout

use std::path::Path;

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::common::fs::{read_to_string, set_mode, write_with_mode};
use crate::error::Result;
use crate::error::fs::write_failed;

/// Mode applied to the runtime data tree
pub const PERMISSIVE_MODE: u32 = 0o777;

/// Mode of the rewritten start helper
const SCRIPT_MODE: u32 = 0o755;

/// Bash-4 lowercase expansion operator, a syntax error under bash 3
const BASH4_LOWERCASE: &str = ",,";

/// Set [`PERMISSIVE_MODE`] on `root` and everything below it
pub fn make_tree_permissive(root: &Path) -> Result<()> {
    let mut count = 0usize;
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| write_failed(root, e))?;
        set_mode(entry.path(), PERMISSIVE_MODE)?;
        count += 1;
    }
    info!("Opened permissions on {count} entries under {}", root.display());
    Ok(())
}

/// Remove every bash-4 `,,` lowercase operator from `script`.
///
/// Precondition: the script is the vendor's `artifactoryCommon.sh`, where
/// `,,` only ever appears as that operator. Returns the rewritten text and
/// the number of occurrences removed.
pub fn strip_bash4_lowercase(script: &str) -> (String, usize) {
    let count = script.matches(BASH4_LOWERCASE).count();
    (script.replace(BASH4_LOWERCASE, ""), count)
}

/// Rewrite the start helper at `path` so it runs under bash 3
pub fn fix_bash3_compatibility(path: &Path) -> Result<()> {
    let content = read_to_string(path)?;
    let (patched, removed) = strip_bash4_lowercase(&content);
    if removed == 0 {
        warn!("No bash 4 expansions found in {}", path.display());
    }
    write_with_mode(path, patched.as_bytes(), SCRIPT_MODE)
}
