//! File system errors

use std::path::Path;

use super::SetupError;

/// Creates a read failed error for `path`
pub fn read_failed(path: &Path, err: impl std::fmt::Display) -> SetupError {
    SetupError::FileReadFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

/// Creates a write failed error for `path`
pub fn write_failed(path: &Path, err: impl std::fmt::Display) -> SetupError {
    SetupError::FileWriteFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

/// Creates an installation error
pub fn installation(message: impl Into<String>) -> SetupError {
    SetupError::Installation {
        message: message.into(),
    }
}
