//! Error types for topic state replay.

use thiserror::Error;

/// Main error type for replay operations.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// A required argument was missing or had the wrong shape.
    #[error("Invalid argument `{argument}`: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl ReplayError {
    pub(crate) fn invalid(argument: &'static str, reason: impl Into<String>) -> Self {
        ReplayError::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }

    /// Whether this is an argument (contract) violation.
    pub fn is_argument_error(&self) -> bool {
        matches!(self, ReplayError::InvalidArgument { .. })
    }
}

impl From<serde_json::Error> for ReplayError {
    fn from(e: serde_json::Error) -> Self {
        ReplayError::Serialization(e.to_string())
    }
}

impl From<rmp_serde::encode::Error> for ReplayError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        ReplayError::Serialization(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for ReplayError {
    fn from(e: rmp_serde::decode::Error) -> Self {
        ReplayError::Deserialization(e.to_string())
    }
}

/// Result type for replay operations.
pub type Result<T> = std::result::Result<T, ReplayError>;
