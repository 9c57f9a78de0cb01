//! Error types and handling for local-rt-setup
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Constructor helpers are grouped by the step that raises them:
//! - [`fs`]: File system errors
//! - [`http`]: Server and download protocol errors
//! - [`precondition`]: Checks made before any network or disk work

pub mod fs;
pub mod http;
pub mod precondition;


use miette::Diagnostic;
use thiserror::Error;

/// Main error type for provisioning runs
#[derive(Error, Diagnostic, Debug)]
pub enum SetupError {
    // Precondition errors
    #[error("No license provided")]
    #[diagnostic(
        code(rt_setup::precondition::missing_license),
        help("Provide the license by setting the 'RTLIC' environment variable")
    )]
    MissingLicense,

    #[error("Invalid Artifactory version '{version}'")]
    #[diagnostic(
        code(rt_setup::precondition::invalid_version),
        help("The version must be [RELEASE] or match the format X.Y.Z")
    )]
    InvalidVersion { version: String },

    #[error("Artifactory {version} is not supported")]
    #[diagnostic(
        code(rt_setup::precondition::unsupported_version),
        help("This tool supports Artifactory 6 or higher")
    )]
    UnsupportedVersion { version: String },

    #[error("Platform not supported: {platform}")]
    #[diagnostic(
        code(rt_setup::precondition::unsupported_platform),
        help("Supported platforms: mac, windows, linux")
    )]
    UnsupportedPlatform { platform: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(rt_setup::config::invalid))]
    Configuration { message: String },

    #[error("Artifactory dir already exists in jfrog home: {path}")]
    #[diagnostic(
        code(rt_setup::home::already_provisioned),
        help("Remove the existing installation or point JFROG_HOME at an empty directory")
    )]
    AlreadyProvisioned { path: String },

    // Download and install errors
    #[error("Failed downloading Artifactory from {url}: HTTP {status}")]
    #[diagnostic(code(rt_setup::fetch::download_failed))]
    Download { url: String, status: u16 },

    #[error("Unexpected server response: {message}")]
    #[diagnostic(
        code(rt_setup::http::protocol),
        help("The server no longer behaves the way this tool expects")
    )]
    Protocol { message: String },

    #[error("Installation failed: {message}")]
    #[diagnostic(code(rt_setup::install::failed))]
    Installation { message: String },

    #[error("Failed to start Artifactory with '{command}': {reason}")]
    #[diagnostic(code(rt_setup::launch::failed))]
    Launch { command: String, reason: String },

    // Server interaction errors
    #[error("Timed out waiting for {operation} after {attempts} attempts")]
    #[diagnostic(
        code(rt_setup::poll::timeout),
        help("Check the Artifactory logs under $JFROG_HOME/artifactory/var/log")
    )]
    ConnectionTimeout { operation: String, attempts: u32 },

    #[error("Failed obtaining an admin access token: {message}")]
    #[diagnostic(code(rt_setup::credential::failed))]
    Credential { message: String },

    #[error("Failed {operation}. response: {status}")]
    #[diagnostic(code(rt_setup::http::unexpected_status))]
    UnexpectedStatus { operation: String, status: u16 },

    #[error("HTTP request failed: {message}")]
    #[diagnostic(code(rt_setup::http::transport))]
    Http { message: String },

    // File system errors
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(rt_setup::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(rt_setup::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },
}

impl From<reqwest::Error> for SetupError {
    fn from(err: reqwest::Error) -> Self {
        SetupError::Http {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for SetupError {
    fn from(err: serde_json::Error) -> Self {
        SetupError::Protocol {
            message: err.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for SetupError {
    fn from(err: zip::result::ZipError) -> Self {
        SetupError::Installation {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, SetupError>;
