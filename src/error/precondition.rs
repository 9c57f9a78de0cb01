//! Precondition errors

use super::SetupError;

/// Creates an invalid version error
pub fn invalid_version(version: impl Into<String>) -> SetupError {
    SetupError::InvalidVersion {
        version: version.into(),
    }
}

/// Creates an unsupported platform error
pub fn unsupported_platform(platform: impl Into<String>) -> SetupError {
    SetupError::UnsupportedPlatform {
        platform: platform.into(),
    }
}

/// Creates a configuration error
pub fn configuration(message: impl Into<String>) -> SetupError {
    SetupError::Configuration {
        message: message.into(),
    }
}
