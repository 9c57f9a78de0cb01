//! Server and download protocol errors

use super::SetupError;

/// Creates a protocol error
pub fn protocol(message: impl Into<String>) -> SetupError {
    SetupError::Protocol {
        message: message.into(),
    }
}

/// Creates a credential error
pub fn credential(message: impl Into<String>) -> SetupError {
    SetupError::Credential {
        message: message.into(),
    }
}

/// Creates an unexpected status error for a named operation
pub fn unexpected_status(operation: impl Into<String>, status: u16) -> SetupError {
    SetupError::UnexpectedStatus {
        operation: operation.into(),
        status,
    }
}

/// Creates a transport error
pub fn transport(message: impl Into<String>) -> SetupError {
    SetupError::Http {
        message: message.into(),
    }
}
