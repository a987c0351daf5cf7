//! Endpoint path parsing
//!
//! Callers hand in paths such as `/v2/auth/r/orders?limit=25`. The path is
//! normalized once (leading slash stripped, query split on the first `?`)
//! and carried around as an [`EndpointPath`].

use crate::error::{PathError, PathResult};
use crate::version::ApiVersion;

/// A normalized endpoint path with its optional query-string suffix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointPath {
    path: String,
    args: Option<String>,
}

impl EndpointPath {
    /// Parse a caller supplied path
    ///
    /// # Errors
    /// Returns [`PathError::InvalidPath`] if nothing remains after
    /// normalization.
    pub fn parse(raw: &str) -> PathResult<Self> {
        let (path, args) = match raw.split_once('?') {
            Some((path, args)) => (path, Some(args)),
            None => (raw, None),
        };

        let path = path.strip_prefix('/').unwrap_or(path);
        if path.is_empty() {
            return Err(PathError::InvalidPath);
        }

        Ok(Self {
            path: path.to_string(),
            args: args.filter(|a| !a.is_empty()).map(str::to_string),
        })
    }

    /// Normalized path without leading slash or query string
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query-string suffix (without the `?`)
    pub fn args(&self) -> Option<&str> {
        self.args.as_deref()
    }

    /// Version inferred from the path prefix
    pub fn version(&self) -> PathResult<ApiVersion> {
        ApiVersion::from_path(&self.path).ok_or_else(|| PathError::UnresolvedVersion {
            path: self.path.clone(),
        })
    }

    /// Path with the query suffix re-attached only when one is present
    pub fn full_path(&self) -> String {
        match &self.args {
            Some(args) => format!("{}?{}", self.path, args),
            None => self.path.clone(),
        }
    }

    /// Absolute URL under the given REST root
    pub fn url(&self, base: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), self.full_path())
    }
}
