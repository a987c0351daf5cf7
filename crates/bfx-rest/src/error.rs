//! Error types for REST operations

use crate::outcome::RequestEcho;
use crate::transport::TransportError;
use bfx_auth::AuthError;
use bfx_types::PathError;

/// Errors that can occur while configuring a request
#[derive(Debug, thiserror::Error)]
pub enum ConfigureError {
    /// Path was empty or had no resolvable version
    #[error(transparent)]
    Path(#[from] PathError),
}

/// Errors that can occur during a transmission
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Network level failure
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Server answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Response body was not valid JSON
    #[error("failed to decode response: {message}")]
    Decode {
        message: String,
        /// Raw response body
        raw: String,
    },

    /// Request body could not be serialized
    #[error("failed to serialize request body: {0}")]
    Serialize(String),

    /// Signing failed
    #[error("signing failed: {0}")]
    Auth(#[from] AuthError),

    /// Request could not be configured
    #[error("configuration error: {0}")]
    Configure(#[from] ConfigureError),
}

impl RestError {
    /// Check if this error is worth retrying
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Decode { .. } | Self::Serialize(_) | Self::Auth(_) | Self::Configure(_) => false,
        }
    }

    /// Check if this error indicates rate limiting
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::Status { status, body } => *status == 429 || body.contains("ratelimit"),
            _ => false,
        }
    }
}

/// A failed transmission together with the request that produced it
#[derive(Debug, thiserror::Error)]
#[error("request to {} failed: {error}", request.request_path)]
pub struct TransmitError {
    /// What went wrong
    #[source]
    pub error: RestError,
    /// The request as it was (or would have been) sent
    pub request: RequestEcho,
}

impl TransmitError {
    pub fn new(error: impl Into<RestError>, request: RequestEcho) -> Self {
        Self {
            error: error.into(),
            request,
        }
    }
}

impl From<TransmitError> for RestError {
    fn from(err: TransmitError) -> Self {
        err.error
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

/// Result type for request configuration
pub type ConfigureResult<T> = Result<T, ConfigureError>;
