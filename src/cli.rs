//! CLI definitions using clap derive API

use clap::Parser;
use clap::builder::{Styles, styling::AnsiColor};

use crate::version::LATEST;

/// local-rt-setup - provision a local Artifactory for integration tests
#[derive(Parser, Debug)]
#[command(
    name = "local-rt-setup",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Download, configure and start a local Artifactory for integration tests",
    long_about = "Downloads an Artifactory Pro release into $JFROG_HOME (default ~/jfrog_home), \
                  writes the license from $RTLIC, starts the server and waits until it is healthy. \
                  On Artifactory 7+ an admin access token is minted and appended to $GITHUB_ENV \
                  as JFROG_TESTS_LOCAL_ACCESS_TOKEN.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  RTLIC=... local-rt-setup\n    \
                  RTLIC=... local-rt-setup --rt-version 7.84.7\n    \
                  RTLIC=... JFROG_HOME=/tmp/jf local-rt-setup --rt-version 6.23.42"
)]
pub struct Cli {
    /// The version of Artifactory to download: [RELEASE] or X.Y.Z (6 or higher)
    #[arg(long = "rt-version", value_name = "VERSION", default_value = LATEST)]
    pub rt_version: String,

    /// Enable verbose output
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
