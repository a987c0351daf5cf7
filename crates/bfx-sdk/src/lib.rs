//! High-level helper for the Bitfinex REST and WebSocket APIs
//!
//! Signs REST v1/v2 calls and authenticates WebSocket sessions from one
//! layered configuration.
//!
//! # Quick Start
//!
//! ```no_run
//! use bfx_sdk::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let helper = ApiHelper::from_env()?;
//!
//!     // Public, unsigned
//!     println!("status: {}", helper.platform_status().await?);
//!
//!     // Signed v2 call
//!     helper
//!         .request("v2/auth/r/wallets", None, ApiOptions::new())?
//!         .post(true)
//!         .await?
//!         .react(|wallets, request| println!("{}: {}", request.request_path, wallets));
//!
//!     // Authenticated socket, handed over after a short settle delay
//!     let mut session = helper
//!         .open_session(ApiOptions::new().with_dms(true), Some(Duration::from_millis(250)), None)
//!         .await?;
//!     while let Some(frame) = session.recv().await? {
//!         println!("{}", frame);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Configuration precedence
//!
//! hard defaults < loaded layer (environment / defaults mapping) < per-call options

pub mod error;
pub mod helper;
pub mod prelude;

pub use error::{Error, Result};
pub use helper::{ApiHelper, ApiHelperBuilder};

// Re-export commonly used types from dependencies
pub use bfx_auth::{generate_nonce, Credentials};
pub use bfx_rest::{ApiRequest, RequestEcho, Settled, TransmitError};
pub use bfx_types::{ApiConfig, ApiOptions, ApiVersion, EndpointPath, HttpMethod, PathError};
pub use bfx_ws::{AuthenticatedSession, SessionConfig, SessionError};
