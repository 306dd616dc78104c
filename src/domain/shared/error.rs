//! Domain errors

use thiserror::Error;

/// Result code reported when the resolver has no internal identifier for a target
pub const RETCODE_UNKNOWN_TARGET: i64 = 100;

/// Result code reported for any unexpected failure during call initiation
pub const RETCODE_INTERNAL: i64 = 500;

/// Domain result type
pub type Result<T> = std::result::Result<T, DomainError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Malformed field: {0}")]
    MalformedField(String),

    #[error("Target user does not exist or could not be resolved")]
    UnknownTarget,

    #[error("Call request rejected, result code {0}")]
    CallRejected(i64),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to cancel call {session_id}: {reason}")]
    CancellationFailed { session_id: String, reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Result code carried into the action response
    pub fn retcode(&self) -> i64 {
        match self {
            DomainError::UnknownTarget => RETCODE_UNKNOWN_TARGET,
            DomainError::CallRejected(code) => *code,
            _ => RETCODE_INTERNAL,
        }
    }
}
