//! API version and HTTP method enums

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bitfinex REST API generation
///
/// The two generations sign requests differently and shape their payloads
/// differently, so every request is bound to exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ApiVersion {
    /// Legacy v1 API (`X-BFX-*` headers, base64 payload signature)
    V1,
    /// Current v2 API (`bfx-*` headers, path + nonce + body signature)
    V2,
}

impl ApiVersion {
    /// Path segment that selects this version (e.g. `v2/`)
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::V1 => "v1/",
            Self::V2 => "v2/",
        }
    }

    /// Infer the version from a normalized (slash-stripped) path
    pub fn from_path(path: &str) -> Option<Self> {
        [Self::V1, Self::V2]
            .into_iter()
            .find(|version| path.starts_with(version.prefix()))
    }

    /// Numeric version
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::V1 => 1,
            Self::V2 => 2,
        }
    }
}

impl TryFrom<u8> for ApiVersion {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            2 => Ok(Self::V2),
            other => Err(format!("unsupported API version: {}", other)),
        }
    }
}

impl From<ApiVersion> for u8 {
    fn from(version: ApiVersion) -> Self {
        version.as_u8()
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.as_u8())
    }
}

/// HTTP method used for a REST transmission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }

    /// Whether requests with this method carry a body
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_from_path() {
        assert_eq!(ApiVersion::from_path("v1/balances"), Some(ApiVersion::V1));
        assert_eq!(ApiVersion::from_path("v2/auth/r/wallets"), Some(ApiVersion::V2));
        assert_eq!(ApiVersion::from_path("v3/anything"), None);
        assert_eq!(ApiVersion::from_path("v2"), None);
    }

    #[test]
    fn test_version_serde_numeric() {
        let version: ApiVersion = serde_json::from_str("1").unwrap();
        assert_eq!(version, ApiVersion::V1);
        assert_eq!(serde_json::to_string(&ApiVersion::V2).unwrap(), "2");
        assert!(serde_json::from_str::<ApiVersion>("3").is_err());
    }

    #[test]
    fn test_method_body() {
        assert!(HttpMethod::Post.has_body());
        assert!(!HttpMethod::Get.has_body());
        assert_eq!(HttpMethod::Get.to_string(), "GET");
    }
}
