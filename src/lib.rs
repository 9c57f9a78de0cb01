//! local-rt-setup - provision a local Artifactory for integration tests
//!
//! Downloads a release archive, installs and configures it, starts the
//! server, waits for it to become healthy and mints an admin token.

pub mod cli;
pub mod common;
pub mod configure;
pub mod credential;
pub mod environment;
pub mod error;
pub mod fetch;
pub mod home;
pub mod host;
pub mod installer;
pub mod launcher;
pub mod layout;
pub mod logging;
pub mod patcher;
pub mod progress;
pub mod provision;
pub mod readiness;
pub mod retry;
pub mod server;
pub mod settings;
pub mod version;

use environment::{EnvironmentSink, ProcessEnvironment};
use error::Result;
use provision::{ProvisionReport, Provisioner};
use retry::ThreadSleep;
use server::HttpServerApi;
use settings::Settings;

/// Run a full provisioning against the real process environment and network.
///
/// `env` is written to before the server API makes its first request, while
/// no HTTP client thread is alive.
pub fn run(cli: &cli::Cli, env: &mut dyn EnvironmentSink) -> Result<ProvisionReport> {
    let settings = Settings::resolve(&cli.rt_version, &ProcessEnvironment::capture())?;
    let api = HttpServerApi::new(settings.endpoints.clone(), settings.credentials.clone());
    Provisioner::new(&settings, &api, &ThreadSleep, env).run()
}
