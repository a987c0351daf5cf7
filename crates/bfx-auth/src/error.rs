//! Error types for authentication operations

/// Errors that can occur while signing
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Signing was requested with credentials that cannot sign
    #[error("token credentials cannot produce a signature")]
    TokenCannotSign,

    /// HMAC key was rejected
    #[error("invalid signing key: {0}")]
    InvalidKey(String),
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
