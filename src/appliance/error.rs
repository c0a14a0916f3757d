//! Appliance transport error types.

use thiserror::Error;

/// Result type for appliance calls.
pub type ApplianceResult<T> = Result<T, ApplianceError>;

/// Errors reported by a [`ReportingApi`](super::ReportingApi) implementation.
#[derive(Error, Debug)]
pub enum ApplianceError {
    /// The addressed resource does not exist (never created or already removed).
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The request could not be delivered or the connection failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The appliance returned an error response.
    #[error("appliance error: {message} (code: {code})")]
    Remote {
        /// Error code from the appliance.
        code: String,
        /// Error message from the appliance.
        message: String,
    },

    /// A response body could not be decoded.
    #[error("failed to deserialize response: {0}")]
    Deserialize(#[from] serde_json::Error),
}

impl ApplianceError {
    /// Create a remote error from an error response.
    pub fn remote(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Check if this error means the resource is already gone.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
