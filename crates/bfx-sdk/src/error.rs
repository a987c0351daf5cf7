//! Unified error type

use bfx_rest::{ConfigureError, RestError, TransmitError};
use bfx_types::PathError;
use bfx_ws::SessionError;

/// Any error raised by the helper
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request could not be configured
    #[error(transparent)]
    Configure(#[from] ConfigureError),

    /// Transmission failed; carries the request echo
    #[error(transparent)]
    Transmit(#[from] TransmitError),

    #[error(transparent)]
    Rest(#[from] RestError),

    #[error(transparent)]
    Session(#[from] SessionError),

    /// Defaults mapping could not be parsed
    #[error("invalid defaults: {0}")]
    InvalidDefaults(#[from] serde_json::Error),
}

impl Error {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transmit(e) => e.error.is_retryable(),
            Self::Rest(e) => e.is_retryable(),
            Self::Session(e) => e.is_retryable(),
            Self::Configure(_) | Self::InvalidDefaults(_) => false,
        }
    }

    /// The path error, if configuration failed on the path
    pub fn as_path_error(&self) -> Option<&PathError> {
        match self {
            Self::Configure(ConfigureError::Path(e))
            | Self::Rest(RestError::Configure(ConfigureError::Path(e))) => Some(e),
            _ => None,
        }
    }
}

/// Result type for helper operations
pub type Result<T> = std::result::Result<T, Error>;
