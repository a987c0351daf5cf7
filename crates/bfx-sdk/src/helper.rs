//! The API helper
//!
//! [`ApiHelper`] holds the loaded option layer and a REST transport, and
//! exposes the two entry points of the library:
//!
//! - [`ApiHelper::request`] configures a REST call which is then sent with
//!   `get`/`post`/`transmit` and inspected with `react`
//! - [`ApiHelper::open_session`] authenticates a WebSocket and hands it over

use bfx_auth::Credentials;
use bfx_rest::{ConfiguredRequest, HttpTransport, JsonBody, ReqwestTransport, RestClient};
use bfx_types::{ApiConfig, ApiOptions};
use bfx_ws::{AuthenticatedSession, SessionConfig, Transport, WsTransport};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::Result;

/// Builder for [`ApiHelper`]
///
/// Collects the loaded layer (environment and/or a defaults mapping)
/// that sits between the hard defaults and per-call options.
///
/// # Example
///
/// ```
/// use bfx_sdk::ApiHelper;
/// use bfx_types::ApiOptions;
///
/// let helper = ApiHelper::builder()
///     .with_defaults(ApiOptions::new().with_api_key("key", "secret"))
///     .quiet()
///     .build()
///     .unwrap();
/// assert!(helper.has_credentials());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ApiHelperBuilder {
    loaded: ApiOptions,
    quiet: bool,
}

impl ApiHelperBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay a layer on the loaded options
    pub fn with_defaults(mut self, options: ApiOptions) -> Self {
        self.loaded = self.loaded.merge(options);
        self
    }

    /// Overlay a camelCase JSON defaults mapping
    pub fn with_defaults_json(self, defaults: Value) -> Result<Self> {
        Ok(self.with_defaults(ApiOptions::from_json(defaults)?))
    }

    /// Overlay `BFX_*` environment variables
    pub fn with_env(self) -> Self {
        self.with_defaults(ApiOptions::from_env())
    }

    /// Do not warn when no credentials were loaded
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    fn check_credentials(&self) {
        if !self.loaded.has_credentials() && !self.quiet {
            warn!("No API credentials loaded, authenticated calls will be sent unauthenticated");
        }
    }

    /// Build a helper over reqwest
    pub fn build(self) -> Result<ApiHelper> {
        let transport = ReqwestTransport::new().map_err(bfx_rest::RestError::from)?;
        Ok(self.build_with_transport(transport))
    }

    /// Build a helper over a custom HTTP transport
    pub fn build_with_transport<H: HttpTransport>(self, transport: H) -> ApiHelper<H> {
        self.check_credentials();
        ApiHelper {
            rest: RestClient::with_transport(transport, self.loaded),
        }
    }
}

/// Entry point for signed REST calls and authenticated sockets
#[derive(Debug, Clone)]
pub struct ApiHelper<H = ReqwestTransport> {
    rest: RestClient<H>,
}

impl ApiHelper<ReqwestTransport> {
    pub fn builder() -> ApiHelperBuilder {
        ApiHelperBuilder::new()
    }

    /// Helper configured from `BFX_*` environment variables
    ///
    /// Logs a warning when no credentials are found.
    pub fn from_env() -> Result<Self> {
        ApiHelperBuilder::new().with_env().build()
    }
}

impl<H: HttpTransport> ApiHelper<H> {
    /// The loaded option layer
    pub fn defaults(&self) -> &ApiOptions {
        self.rest.defaults()
    }

    /// Check if the loaded layer carries credentials
    pub fn has_credentials(&self) -> bool {
        self.rest.has_credentials()
    }

    pub fn rest(&self) -> &RestClient<H> {
        &self.rest
    }

    /// Resolve per-call options over the loaded layer
    pub fn resolve(&self, options: ApiOptions) -> ApiConfig {
        self.defaults().clone().merge(options).resolve()
    }

    /// Configure a REST call
    ///
    /// # Errors
    /// Fails with a path error for an empty or unversioned path.
    pub fn request(
        &self,
        path: &str,
        body: Option<JsonBody>,
        options: ApiOptions,
    ) -> Result<ConfiguredRequest<'_, H>> {
        Ok(self.rest.request(path, body, options)?)
    }

    /// Query the public platform status
    pub async fn platform_status(&self) -> Result<Value> {
        Ok(self.rest.platform_status().await?)
    }

    /// Open an authenticated socket on the configured WebSocket root
    ///
    /// `settle_delay` is waited after a successful auth before returning;
    /// some authenticated channels ignore commands sent immediately.
    pub async fn open_session(
        &self,
        options: ApiOptions,
        settle_delay: Option<Duration>,
        nonce_override: Option<&str>,
    ) -> Result<AuthenticatedSession<WsTransport>> {
        let url = self.resolve(options.clone()).base_ws_url;
        self.open_session_with(WsTransport::new(url), options, settle_delay, nonce_override)
            .await
    }

    /// Open an authenticated socket over a caller supplied transport
    pub async fn open_session_with<T: Transport>(
        &self,
        transport: T,
        options: ApiOptions,
        settle_delay: Option<Duration>,
        nonce_override: Option<&str>,
    ) -> Result<AuthenticatedSession<T>> {
        let merged = self.defaults().clone().merge(options);
        let credentials = Credentials::from_options(&merged);

        let mut config = SessionConfig::from_config(&merged.resolve());
        config.settle_delay = settle_delay;

        debug!("Opening session on {}", transport.endpoint());
        Ok(bfx_ws::open_session(transport, credentials.as_ref(), &config, nonce_override).await?)
    }
}
