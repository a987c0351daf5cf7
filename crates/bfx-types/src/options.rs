//! Layered configuration
//!
//! Options are resolved from three layers, lowest precedence first:
//!
//! 1. hard defaults (see [`ApiConfig::default`])
//! 2. the loaded layer (environment or a caller supplied defaults mapping)
//! 3. per-call overrides
//!
//! Each layer is an [`ApiOptions`] value where every field is optional.
//! Layers are combined with [`ApiOptions::merge`] and turned into a
//! concrete [`ApiConfig`] with [`ApiOptions::resolve`].

use crate::version::ApiVersion;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Default REST root
pub const DEFAULT_REST_URL: &str = "https://api.bitfinex.com";
/// Default WebSocket root
pub const DEFAULT_WS_URL: &str = "wss://api.bitfinex.com/ws/2";

/// One layer of options
///
/// Field names deserialize from camelCase so a defaults mapping such as
/// `{"baseRestUrl": "...", "verboseOutput": true}` can be loaded directly.
#[derive(Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiOptions {
    pub key: Option<String>,
    pub secret: Option<String>,
    pub token: Option<String>,
    pub base_rest_url: Option<String>,
    pub base_ws_url: Option<String>,
    /// Log raw requests and responses
    pub verbose_output: Option<bool>,
    /// Dead-man's switch for authenticated sockets
    pub dms: Option<bool>,
    /// Channel filters sent with the socket auth frame
    pub filter: Option<Vec<String>>,
    /// Attach timing metadata to REST responses
    pub performance: Option<bool>,
    /// Force a version instead of inferring it from the path
    pub version: Option<ApiVersion>,
    /// Extra static headers merged into every request
    pub optional_headers: Option<BTreeMap<String, String>>,
}

impl ApiOptions {
    /// Create an empty layer
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a layer from environment variables
    ///
    /// Recognizes `BFX_API_KEY`, `BFX_API_SECRET`, `BFX_API_TOKEN`,
    /// `BFX_REST_URL` and `BFX_WS_URL`. Unset variables leave the
    /// corresponding option empty.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        Self {
            key: var("BFX_API_KEY"),
            secret: var("BFX_API_SECRET"),
            token: var("BFX_API_TOKEN"),
            base_rest_url: var("BFX_REST_URL"),
            base_ws_url: var("BFX_WS_URL"),
            ..Self::default()
        }
    }

    /// Parse a layer from a JSON defaults mapping
    pub fn from_json(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    pub fn with_api_key(mut self, key: impl Into<String>, secret: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self.secret = Some(secret.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_rest_url(mut self, url: impl Into<String>) -> Self {
        self.base_rest_url = Some(url.into());
        self
    }

    pub fn with_ws_url(mut self, url: impl Into<String>) -> Self {
        self.base_ws_url = Some(url.into());
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose_output = Some(verbose);
        self
    }

    pub fn with_dms(mut self, dms: bool) -> Self {
        self.dms = Some(dms);
        self
    }

    pub fn with_filter<I, S>(mut self, filter: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter = Some(filter.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_performance(mut self, performance: bool) -> Self {
        self.performance = Some(performance);
        self
    }

    pub fn with_version(mut self, version: ApiVersion) -> Self {
        self.version = Some(version);
        self
    }

    /// Add one extra header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.optional_headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Overlay `over` on top of this layer; values set in `over` win
    pub fn merge(self, over: ApiOptions) -> ApiOptions {
        ApiOptions {
            key: over.key.or(self.key),
            secret: over.secret.or(self.secret),
            token: over.token.or(self.token),
            base_rest_url: over.base_rest_url.or(self.base_rest_url),
            base_ws_url: over.base_ws_url.or(self.base_ws_url),
            verbose_output: over.verbose_output.or(self.verbose_output),
            dms: over.dms.or(self.dms),
            filter: over.filter.or(self.filter),
            performance: over.performance.or(self.performance),
            version: over.version.or(self.version),
            optional_headers: over.optional_headers.or(self.optional_headers),
        }
    }

    /// Whether any credential material is present in this layer
    pub fn has_credentials(&self) -> bool {
        self.token.is_some() || (self.key.is_some() && self.secret.is_some())
    }

    /// Resolve this layer over the hard defaults
    pub fn resolve(&self) -> ApiConfig {
        let defaults = ApiConfig::default();

        ApiConfig {
            base_rest_url: self.base_rest_url.clone().unwrap_or(defaults.base_rest_url),
            base_ws_url: self.base_ws_url.clone().unwrap_or(defaults.base_ws_url),
            verbose_output: self.verbose_output.unwrap_or(defaults.verbose_output),
            dms: self.dms.unwrap_or(defaults.dms),
            filter: self.filter.clone().unwrap_or(defaults.filter),
            performance: self.performance.unwrap_or(defaults.performance),
            version: self.version.or(defaults.version),
            optional_headers: self
                .optional_headers
                .clone()
                .unwrap_or(defaults.optional_headers),
        }
    }
}

impl fmt::Debug for ApiOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");

        f.debug_struct("ApiOptions")
            .field("key", &self.key)
            .field("secret", &redact(&self.secret))
            .field("token", &redact(&self.token))
            .field("base_rest_url", &self.base_rest_url)
            .field("base_ws_url", &self.base_ws_url)
            .field("verbose_output", &self.verbose_output)
            .field("dms", &self.dms)
            .field("filter", &self.filter)
            .field("performance", &self.performance)
            .field("version", &self.version)
            .field("optional_headers", &self.optional_headers)
            .finish()
    }
}

/// Fully resolved, non-secret settings for one operation
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_rest_url: String,
    pub base_ws_url: String,
    pub verbose_output: bool,
    pub dms: bool,
    pub filter: Vec<String>,
    pub performance: bool,
    pub version: Option<ApiVersion>,
    pub optional_headers: BTreeMap<String, String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_rest_url: DEFAULT_REST_URL.to_string(),
            base_ws_url: DEFAULT_WS_URL.to_string(),
            verbose_output: false,
            dms: false,
            filter: Vec::new(),
            performance: false,
            version: None,
            optional_headers: BTreeMap::new(),
        }
    }
}
