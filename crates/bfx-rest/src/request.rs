//! Versioned request model
//!
//! A request is configured once into an immutable [`ApiRequest`]. The
//! version is decided at configuration time and selects the payload
//! builder: v1 injects `request`/`nonce` into the body and signs its
//! base64 encoding, v2 signs path, nonce and body together.
//!
//! Transmitting never mutates the request, so one [`ApiRequest`] can be
//! sent several times; each transmission draws a fresh nonce.

use bfx_auth::{generate_nonce, AuthHeaders, Credentials};
use bfx_types::{ApiConfig, ApiOptions, ApiVersion, EndpointPath, HttpMethod};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::{Instant, SystemTime};
use tracing::{debug, info, instrument, warn};

use crate::error::{ConfigureResult, RestError, RestResult, TransmitError};
use crate::outcome::{RequestEcho, Settled, Timing};
use crate::transport::{HttpRequest, HttpTransport};

/// JSON object used as a request body
pub type JsonBody = Map<String, Value>;

const CONTENT_TYPE: &str = "Content-Type";
const APPLICATION_JSON: &str = "application/json";

#[derive(Debug, Clone)]
struct RequestParts {
    endpoint: EndpointPath,
    body: JsonBody,
    config: ApiConfig,
    credentials: Option<Credentials>,
}

/// Body and auth headers for one transmission
struct Payload {
    body: JsonBody,
    body_json: String,
    auth: Option<AuthHeaders>,
}

/// Version specific payload shaping
trait BuildPayload {
    fn parts(&self) -> &RequestParts;

    fn unsigned(&self) -> RestResult<Payload> {
        let body = self.parts().body.clone();
        Ok(Payload {
            body_json: to_json(&body)?,
            body,
            auth: None,
        })
    }

    fn signed(&self, credentials: &Credentials, nonce: &str) -> RestResult<Payload>;
}

fn to_json(body: &JsonBody) -> RestResult<String> {
    serde_json::to_string(body).map_err(|e| RestError::Serialize(e.to_string()))
}

/// A request against the v1 API
#[derive(Debug, Clone)]
pub struct V1Request(RequestParts);

impl BuildPayload for V1Request {
    fn parts(&self) -> &RequestParts {
        &self.0
    }

    fn signed(&self, credentials: &Credentials, nonce: &str) -> RestResult<Payload> {
        let mut body = self.0.body.clone();
        body.insert(
            "request".to_string(),
            Value::String(format!("/{}", self.0.endpoint.full_path())),
        );
        body.insert("nonce".to_string(), Value::String(nonce.to_string()));

        let body_json = to_json(&body)?;
        let auth = AuthHeaders::v1(credentials, &body_json)?;

        Ok(Payload {
            body,
            body_json,
            auth: Some(auth),
        })
    }
}

/// A request against the v2 API
#[derive(Debug, Clone)]
pub struct V2Request(RequestParts);

impl BuildPayload for V2Request {
    fn parts(&self) -> &RequestParts {
        &self.0
    }

    fn signed(&self, credentials: &Credentials, nonce: &str) -> RestResult<Payload> {
        let body = self.0.body.clone();
        let body_json = to_json(&body)?;
        let auth = AuthHeaders::v2(credentials, self.0.endpoint.path(), nonce, &body_json)?;

        Ok(Payload {
            body,
            body_json,
            auth: Some(auth),
        })
    }
}

/// A configured, immutable request
#[derive(Debug, Clone)]
pub enum ApiRequest {
    V1(V1Request),
    V2(V2Request),
}

impl ApiRequest {
    /// Configure a request
    ///
    /// `options` should already be the merged layer for this call. The
    /// version comes from `options.version` when forced, otherwise from
    /// the path prefix. Half a key pair configures as unauthenticated.
    ///
    /// # Errors
    /// - [`PathError::InvalidPath`](bfx_types::PathError::InvalidPath) for an empty path
    /// - [`PathError::UnresolvedVersion`](bfx_types::PathError::UnresolvedVersion) when no version applies
    pub fn configure(
        path: &str,
        body: Option<JsonBody>,
        options: &ApiOptions,
    ) -> ConfigureResult<Self> {
        let endpoint = EndpointPath::parse(path)?;
        let config = options.resolve();
        let version = match config.version {
            Some(version) => version,
            None => endpoint.version()?,
        };
        let credentials = Credentials::from_options(options);

        let parts = RequestParts {
            endpoint,
            body: body.unwrap_or_default(),
            config,
            credentials,
        };

        debug!("Configured {} request for {}", version, parts.endpoint.full_path());

        Ok(match version {
            ApiVersion::V1 => Self::V1(V1Request(parts)),
            ApiVersion::V2 => Self::V2(V2Request(parts)),
        })
    }

    fn builder(&self) -> &dyn BuildPayload {
        match self {
            Self::V1(request) => request,
            Self::V2(request) => request,
        }
    }

    fn parts(&self) -> &RequestParts {
        self.builder().parts()
    }

    pub fn version(&self) -> ApiVersion {
        match self {
            Self::V1(_) => ApiVersion::V1,
            Self::V2(_) => ApiVersion::V2,
        }
    }

    pub fn endpoint(&self) -> &EndpointPath {
        &self.parts().endpoint
    }

    pub fn body(&self) -> &JsonBody {
        &self.parts().body
    }

    pub fn config(&self) -> &ApiConfig {
        &self.parts().config
    }

    pub fn has_credentials(&self) -> bool {
        self.parts().credentials.is_some()
    }

    /// Absolute URL this request is sent to
    pub fn url(&self) -> String {
        let parts = self.parts();
        parts.endpoint.url(&parts.config.base_rest_url)
    }

    fn echo(&self, body: JsonBody) -> RequestEcho {
        RequestEcho {
            request_body: Value::Object(body),
            request_path: self.endpoint().full_path(),
        }
    }

    /// Build the wire request for one transmission
    fn prepare(
        &self,
        method: HttpMethod,
        authenticated: bool,
        nonce: &str,
    ) -> Result<(HttpRequest, RequestEcho), TransmitError> {
        let parts = self.parts();

        let credentials = match (authenticated, parts.credentials.as_ref()) {
            (true, Some(credentials)) => Some(credentials),
            (true, None) => {
                warn!(
                    "No credentials configured for {}, sending unauthenticated",
                    parts.endpoint.path()
                );
                None
            }
            (false, _) => None,
        };

        let payload = match credentials {
            Some(credentials) => self.builder().signed(credentials, nonce),
            None => self.builder().unsigned(),
        }
        .map_err(|e| TransmitError::new(e, self.echo(parts.body.clone())))?;

        let mut headers: BTreeMap<String, String> = parts.config.optional_headers.clone();
        if method.has_body() {
            headers.insert(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string());
        }
        if let Some(auth) = &payload.auth {
            auth.apply_to(&mut headers);
        }

        let request = HttpRequest {
            method,
            url: self.url(),
            headers,
            body: method.has_body().then_some(payload.body_json),
        };

        Ok((request, self.echo(payload.body)))
    }

    /// Send the request
    ///
    /// A fresh nonce is drawn for every call unless `nonce_override` is
    /// given. Requesting authentication without configured credentials
    /// logs a warning and sends the request unauthenticated.
    ///
    /// Any HTTP status settles. Exchange errors such as
    /// `["error", 10020, "apikey: invalid"]` arrive as the response; see
    /// [`Settled::error_for_status`].
    ///
    /// # Errors
    /// Returns a [`TransmitError`] carrying the request echo when signing
    /// or the transport fails, or when a 2xx body is not JSON.
    #[instrument(skip(self, transport), fields(path = %self.endpoint().path(), version = %self.version()))]
    pub async fn transmit<H>(
        &self,
        transport: &H,
        method: HttpMethod,
        authenticated: bool,
        nonce_override: Option<&str>,
    ) -> Result<Settled, TransmitError>
    where
        H: HttpTransport + ?Sized,
    {
        let nonce = nonce_override
            .map(str::to_string)
            .unwrap_or_else(generate_nonce);
        let (request, echo) = self.prepare(method, authenticated, &nonce)?;
        let config = self.config();

        if config.verbose_output {
            info!(
                method = %request.method,
                url = %request.url,
                body = request.body.as_deref().unwrap_or(""),
                "Sending request"
            );
        }

        let started_at = SystemTime::now();
        let started = Instant::now();
        let result = transport.execute(request).await;
        let elapsed = started.elapsed();

        let response = match result {
            Ok(response) => response,
            Err(e) => return Err(TransmitError::new(e, echo)),
        };

        if config.verbose_output {
            info!(status = response.status, body = %response.body, "Received response");
        }

        let status = response.status;
        let success = response.is_success();
        let value = if response.body.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(&response.body) {
                Ok(value) => value,
                Err(_) if !success => Value::String(response.body),
                Err(e) => {
                    return Err(TransmitError::new(
                        RestError::Decode {
                            message: e.to_string(),
                            raw: response.body,
                        },
                        echo,
                    ))
                }
            }
        };

        if !success {
            debug!(status, "Request settled with error status");
        }

        Ok(Settled {
            status,
            response: value,
            request: echo,
            timing: config.performance.then_some(Timing {
                started_at,
                elapsed,
            }),
        })
    }
}
