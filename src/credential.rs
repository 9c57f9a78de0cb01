//! Admin credential minting
//!
//! The server writes a bootstrap token to disk after it finds the marker file
//! created before launch. That token is exchanged for a refreshable admin
//! token, which is then exported for the calling CI job.

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::common::fs::{SECRET_MODE, append_line, exists, read_to_string};
use crate::error::Result;
use crate::error::http::protocol;
use crate::retry::{Pause, ProbeError, RetryPolicy, run_with_retry};
use crate::server::ServerApi;

/// Variable the exported token is published under
pub const ACCESS_TOKEN_ENV: &str = "JFROG_TESTS_LOCAL_ACCESS_TOKEN";

/// Audience of the server-generated bootstrap token
pub const BOOTSTRAP_AUDIENCE: &str = "jfac@*";

/// A bearer token and the audience it was issued for
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    audience: String,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            audience: audience.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("audience", &self.audience)
            .finish()
    }
}

#[derive(Deserialize)]
struct TokenFile {
    #[serde(default)]
    token: String,
}

/// Read the bootstrap token at `path`. A missing file means "not yet".
pub fn read_bootstrap_token(path: &Path) -> Result<Option<AccessToken>> {
    if !exists(path)? {
        return Ok(None);
    }

    let content = read_to_string(path)?;
    let parsed: TokenFile = serde_json::from_str(&content)
        .map_err(|e| protocol(format!("malformed token file {}: {e}", path.display())))?;
    if parsed.token.is_empty() {
        return Err(protocol(format!("token file {} has an empty token", path.display())));
    }

    info!("Successfully extracted bootstrap token.");
    Ok(Some(AccessToken::new(parsed.token, BOOTSTRAP_AUDIENCE)))
}

/// Poll for the bootstrap token file under `policy`
pub fn wait_for_bootstrap_token(
    policy: &RetryPolicy,
    pause: &dyn Pause,
    path: &Path,
) -> Result<AccessToken> {
    info!("Waiting for the bootstrap token at {}...", path.display());
    let token = run_with_retry(
        policy,
        pause,
        "the bootstrap token file",
        || read_bootstrap_token(path).map_err(ProbeError::Fatal),
        Option::is_some,
    )?;
    token.ok_or_else(|| protocol("bootstrap token disappeared"))
}

/// Obtain an admin token: wait for the bootstrap token, then exchange it
pub fn mint(
    api: &dyn ServerApi,
    policy: &RetryPolicy,
    pause: &dyn Pause,
    token_file: &Path,
) -> Result<AccessToken> {
    let bootstrap = wait_for_bootstrap_token(policy, pause, token_file)?;
    info!("Requesting an admin access token...");
    api.mint_admin_token(&bootstrap)
}

/// Append the token to the CI environment file, if one is configured
pub fn export(export_file: Option<&Path>, token: &AccessToken) -> Result<()> {
    let Some(path) = export_file else {
        info!("GITHUB_ENV not set, assuming the script is not running on GitHub. Skipping token export...");
        return Ok(());
    };

    append_line(path, &format!("{ACCESS_TOKEN_ENV}={}", token.value()), SECRET_MODE)?;
    info!("Successfully exported the Artifactory admin token to {}", path.display());
    Ok(())
}
