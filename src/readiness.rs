//! Readiness polling of the launched server

use reqwest::StatusCode;
use tracing::info;

use crate::error::Result;
use crate::retry::{Pause, ProbeError, RetryPolicy, run_with_retry};
use crate::server::ServerApi;

/// Poll the health endpoint until it answers 200.
///
/// Transport failures are expected while the server boots and only keep the
/// loop going; so do non-200 answers.
pub fn wait_until_ready(api: &dyn ServerApi, policy: &RetryPolicy, pause: &dyn Pause) -> Result<()> {
    info!("Waiting for successful connection with Artifactory...");
    run_with_retry(
        policy,
        pause,
        "Artifactory to respond",
        || {
            api.ping()
                .map_err(|err| ProbeError::Transient(err.to_string()))
        },
        |status| *status == StatusCode::OK.as_u16(),
    )?;
    info!("Artifactory is up!");
    Ok(())
}
