//! Error types for WebSocket sessions

use crate::transport::TransportError;
use bfx_auth::AuthError;
use serde_json::Value;

/// Errors that can occur while opening or using a session
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Neither a token nor a key pair was configured
    #[error("missing credentials: a token or key/secret pair is required for socket auth")]
    MissingCredentials,

    /// Server rejected the auth frame
    #[error("authentication failed: {frame}")]
    AuthenticationFailed {
        /// Raw failure frame
        frame: Value,
    },

    /// Server rate limited the auth frame, and the retry was limited too
    #[error("authentication rate limited: {frame}")]
    RateLimited {
        /// Raw failure frame from the retry
        frame: Value,
    },

    /// Socket closed before an auth reply arrived
    #[error("connection closed before authentication completed")]
    ConnectionClosed,

    /// Socket level failure
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Signing the auth frame failed
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// JSON encode/decode failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SessionError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::ConnectionClosed | Self::Transport(_)
        )
    }
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;
