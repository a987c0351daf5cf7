//! REST client for the Bitfinex v1 and v2 APIs
//!
//! This crate covers the full lifecycle of one REST call:
//! configure → transmit → react.
//!
//! # Versions
//!
//! | | v1 | v2 |
//! |---|---|---|
//! | Body when signed | `request` + `nonce` injected | as given |
//! | Signed message | `base64(JSON(body))` | `"/api/" + path + nonce + JSON(body)` |
//! | Headers | `X-BFX-APIKEY`, `X-BFX-PAYLOAD`, `X-BFX-SIGNATURE` | `bfx-nonce`, `bfx-apikey`, `bfx-signature` |
//!
//! Token credentials replace either header set with a single `bfx-token`.
//!
//! # Example
//!
//! ```no_run
//! use bfx_rest::RestClient;
//! use bfx_types::ApiOptions;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RestClient::new(ApiOptions::new())?;
//!     let status = client.platform_status().await?;
//!     println!("Platform status: {}", status);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod outcome;
pub mod request;
pub mod transport;

// Re-export main types
pub use client::{ConfiguredRequest, RestClient};
pub use error::{ConfigureError, ConfigureResult, RestError, RestResult, TransmitError};
pub use outcome::{RequestEcho, Settled, Timing};
pub use request::{ApiRequest, JsonBody, V1Request, V2Request};
#[cfg(any(test, feature = "test-utils"))]
pub use transport::MockHttpTransport;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
