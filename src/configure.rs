//! Post-start configuration against the running server

use reqwest::StatusCode;
use tracing::{info, warn};

use crate::error::Result;
use crate::error::http::unexpected_status;
use crate::error::precondition::configuration;
use crate::server::ServerApi;

const ARCHIVE_INDEX_DISABLED: &str = "<archiveIndexEnabled>false</archiveIndexEnabled>";
const ARCHIVE_INDEX_ENABLED: &str = "<archiveIndexEnabled>true</archiveIndexEnabled>";

/// Point the custom base URL at the server's own address.
///
/// The server may answer 500 while still applying the change, so 500 is
/// accepted here and only here. A ping must succeed afterwards.
pub fn set_custom_base_url(api: &dyn ServerApi, base_url: &str) -> Result<()> {
    info!("Setting custom URL base...");
    let status = api.set_base_url(base_url)?;
    match StatusCode::from_u16(status) {
        Ok(StatusCode::OK) => {}
        Ok(StatusCode::INTERNAL_SERVER_ERROR) => {
            warn!("Artifactory answered 500 to the base URL change, verifying with a ping");
        }
        _ => return Err(unexpected_status("setting custom url", status)),
    }

    let status = api.ping()?;
    if status != StatusCode::OK.as_u16() {
        return Err(unexpected_status(
            "reaching Artifactory after setting custom url base",
            status,
        ));
    }

    info!("Done setting custom URL base.");
    Ok(())
}

/// Flip the archive index flag in a configuration document.
///
/// Precondition: `document` contains the literal disabled element. Its
/// absence means the document shape changed, and is an error rather than a
/// silent no-op.
pub fn toggle_archive_index(document: &str) -> Result<String> {
    if !document.contains(ARCHIVE_INDEX_DISABLED) {
        return Err(configuration(
            "failed setting the archive index property - attribute does not exist in configuration",
        ));
    }
    Ok(document.replace(ARCHIVE_INDEX_DISABLED, ARCHIVE_INDEX_ENABLED))
}

/// Enable archive indexing through a fetch-modify-push of the configuration
pub fn enable_archive_index(api: &dyn ServerApi) -> Result<()> {
    info!("Enabling archive index...");
    let document = api.fetch_configuration()?;
    let patched = toggle_archive_index(&document)?;
    api.push_configuration(&patched)
}
