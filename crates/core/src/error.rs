//! Error types for gsmrelay-core

use thiserror::Error;

/// Rejected user input. The command is never built or sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Password must be 4 digits")]
    InvalidPassword,

    #[error("Serial number must be 3 digits (001-200), got {0:?}")]
    InvalidSerialFormat(String),

    #[error("Serial number must be between 001 and 200, got {0}")]
    SerialOutOfRange(u16),

    #[error("Please enter an admin phone number")]
    MissingAdminNumber,

    #[error("Please enter a phone number")]
    MissingPhoneNumber,

    #[error("Phone number must not contain '#', got {0:?}")]
    InvalidPhoneNumber(String),
}

/// Core error type
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Please set the relay unit number in settings")]
    MissingUnitNumber,

    #[error("{capability} not available on this device")]
    CapabilityUnavailable { capability: Capability },

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No data directory found")]
    NoDataDir,
}

/// Platform capability a dispatch depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Sms,
    Call,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::Sms => write!(f, "SMS"),
            Capability::Call => write!(f, "Phone calls"),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CoreError>;
