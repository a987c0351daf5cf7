//! REST client
//!
//! [`RestClient`] owns a transport and the loaded option layer. Each call
//! merges its own options over that layer, configures an [`ApiRequest`]
//! and returns it bound to the transport as a [`ConfiguredRequest`].

use bfx_types::{ApiOptions, HttpMethod};
use serde_json::Value;
use tracing::info;

use crate::error::{ConfigureResult, RestResult, TransmitError};
use crate::outcome::Settled;
use crate::request::{ApiRequest, JsonBody};
use crate::transport::{HttpTransport, ReqwestTransport};

/// Public platform status endpoint
const PLATFORM_STATUS_PATH: &str = "v2/platform/status";

/// Bitfinex REST client
///
/// # Example
///
/// ```no_run
/// use bfx_rest::RestClient;
/// use bfx_types::ApiOptions;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = RestClient::new(ApiOptions::from_env())?;
///
///     let wallets = client
///         .request("v2/auth/r/wallets", None, ApiOptions::new())?
///         .post(true)
///         .await?
///         .react(|response, request| println!("{} -> {}", request.request_path, response));
///
///     println!("{:?}", wallets.timing);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RestClient<H = ReqwestTransport> {
    transport: H,
    defaults: ApiOptions,
}

impl RestClient<ReqwestTransport> {
    /// Create a client over reqwest with the given loaded layer
    pub fn new(defaults: ApiOptions) -> RestResult<Self> {
        let transport = ReqwestTransport::new()?;
        info!("Created Bitfinex REST client");
        Ok(Self::with_transport(transport, defaults))
    }
}

impl<H: HttpTransport> RestClient<H> {
    /// Create a client over a custom transport
    pub fn with_transport(transport: H, defaults: ApiOptions) -> Self {
        Self {
            transport,
            defaults,
        }
    }

    pub fn transport(&self) -> &H {
        &self.transport
    }

    /// The loaded option layer
    pub fn defaults(&self) -> &ApiOptions {
        &self.defaults
    }

    /// Check if the loaded layer carries credentials
    pub fn has_credentials(&self) -> bool {
        self.defaults.has_credentials()
    }

    /// Configure a request with per-call `options` over the loaded layer
    pub fn request(
        &self,
        path: &str,
        body: Option<JsonBody>,
        options: ApiOptions,
    ) -> ConfigureResult<ConfiguredRequest<'_, H>> {
        let merged = self.defaults.clone().merge(options);
        let request = ApiRequest::configure(path, body, &merged)?;

        Ok(ConfiguredRequest {
            transport: &self.transport,
            request,
        })
    }

    /// Query the public platform status
    ///
    /// Never signed, whatever credentials are loaded. A non-2xx status
    /// is an error here.
    pub async fn platform_status(&self) -> RestResult<Value> {
        let settled = self
            .request(PLATFORM_STATUS_PATH, None, ApiOptions::new())?
            .get(false)
            .await?
            .error_for_status()?;
        Ok(settled.into_response())
    }
}

/// A configured request bound to a transport
#[derive(Debug)]
pub struct ConfiguredRequest<'a, H> {
    transport: &'a H,
    request: ApiRequest,
}

impl<'a, H: HttpTransport> ConfiguredRequest<'a, H> {
    pub fn request(&self) -> &ApiRequest {
        &self.request
    }

    pub fn into_request(self) -> ApiRequest {
        self.request
    }

    pub async fn get(&self, authenticated: bool) -> Result<Settled, TransmitError> {
        self.transmit(HttpMethod::Get, authenticated, None).await
    }

    pub async fn post(&self, authenticated: bool) -> Result<Settled, TransmitError> {
        self.transmit(HttpMethod::Post, authenticated, None).await
    }

    /// Transmit with an explicit method and optional nonce override
    pub async fn transmit(
        &self,
        method: HttpMethod,
        authenticated: bool,
        nonce_override: Option<&str>,
    ) -> Result<Settled, TransmitError> {
        self.request
            .transmit(self.transport, method, authenticated, nonce_override)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockHttpTransport;
    use bfx_auth::header_names;
    use serde_json::json;

    #[tokio::test]
    async fn test_platform_status_unsigned() {
        let defaults = ApiOptions::new().with_api_key("key", "secret");
        let client = RestClient::with_transport(MockHttpTransport::new(), defaults);
        client.transport().push_json(&json!({"status": "operative"}));

        let status = client.platform_status().await.unwrap();
        assert_eq!(status["status"], "operative");

        let sent = client.transport().last_request().unwrap();
        assert_eq!(sent.url, "https://api.bitfinex.com/v2/platform/status");
        assert!(sent.header(header_names::V2_SIGNATURE).is_none());
    }

    #[tokio::test]
    async fn test_per_call_options_override_defaults() {
        let defaults = ApiOptions::new()
            .with_api_key("loaded_key", "loaded_secret")
            .with_rest_url("https://loaded.example");
        let client = RestClient::with_transport(MockHttpTransport::new(), defaults);
        client.transport().push_json(&json!([]));

        client
            .request(
                "v2/auth/r/wallets",
                None,
                ApiOptions::new().with_api_key("call_key", "call_secret"),
            )
            .unwrap()
            .post(true)
            .await
            .unwrap();

        let sent = client.transport().last_request().unwrap();
        assert_eq!(sent.url, "https://loaded.example/v2/auth/r/wallets");
        assert_eq!(sent.header(header_names::V2_API_KEY), Some("call_key"));
    }

    #[test]
    fn test_unversioned_path_rejected() {
        let client = RestClient::with_transport(MockHttpTransport::new(), ApiOptions::new());
        let err = client.request("platform/status", None, ApiOptions::new()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::ConfigureError::Path(bfx_types::PathError::UnresolvedVersion { .. })
        ));
    }

    #[tokio::test]
    async fn test_status_error_converts() {
        let client = RestClient::with_transport(MockHttpTransport::new(), ApiOptions::new());
        client.transport().push_response(503, "unavailable");

        let err = client.platform_status().await.unwrap_err();
        assert!(err.is_retryable());
    }
}
