//! Error types for request configuration

/// Errors raised while turning a caller path into a routable endpoint
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Path was empty (or only a leading slash / query string)
    #[error("invalid path: endpoint path must not be empty")]
    InvalidPath,

    /// Path does not start with a known API version segment
    #[error("unresolved API version for path '{path}' (expected a v1/ or v2/ prefix)")]
    UnresolvedVersion {
        /// The normalized path that failed to resolve
        path: String,
    },
}

/// Result type for path operations
pub type PathResult<T> = Result<T, PathError>;
