//! Pre-start configuration
//!
//! Writes the license and, on the modern layout, the configuration the
//! server must find on its first boot. Nothing here talks to the server.

pub mod templates;

use tracing::info;

use crate::common::fs::{CONFIG_MODE, SECRET_MODE, write_with_mode};
use crate::environment::EnvironmentSink;
use crate::error::Result;
use crate::layout::{ModernPaths, ServerLayout};

/// Properties line enabling staging mode
pub const STAGING_MODE_PROPERTIES: &str = "staging.mode=true\n";

/// Write every file the server needs before it is started
pub fn patch(layout: &ServerLayout, license: &str, env: &mut dyn EnvironmentSink) -> Result<()> {
    write_license(layout, license, env)?;

    if let Some(modern) = layout.modern() {
        write_modern_config(&modern)?;
    }

    Ok(())
}

/// Write the license and clear it from the environment, whether or not the
/// write succeeds
pub fn write_license(
    layout: &ServerLayout,
    license: &str,
    env: &mut dyn EnvironmentSink,
) -> Result<()> {
    info!("Creating license...");
    let written = write_with_mode(&layout.license_file(), license.as_bytes(), SECRET_MODE);
    env.clear_license();
    written
}

fn write_modern_config(paths: &ModernPaths) -> Result<()> {
    info!("Allowing the embedded database...");
    write_with_mode(
        &paths.system_yaml,
        templates::system_yaml()?.as_bytes(),
        CONFIG_MODE,
    )?;

    info!("Enabling staging mode...");
    write_with_mode(
        &paths.system_properties,
        STAGING_MODE_PROPERTIES.as_bytes(),
        CONFIG_MODE,
    )?;

    write_with_mode(
        &paths.access_import,
        templates::access_import()?.as_bytes(),
        CONFIG_MODE,
    )?;

    // The server writes the bootstrap token once it sees this file
    info!("Triggering admin token creation...");
    write_with_mode(&paths.token_marker, b"", SECRET_MODE)
}
