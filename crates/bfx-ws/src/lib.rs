//! Authenticated WebSocket sessions for the Bitfinex API
//!
//! This crate performs the auth handshake on a socket and then hands the
//! socket to the caller. It does not subscribe to channels or dispatch
//! messages.
//!
//! # Example
//!
//! ```no_run
//! use bfx_auth::Credentials;
//! use bfx_ws::{open_session, SessionConfig, WsTransport};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let creds = Credentials::api_key("key", "secret");
//!     let transport = WsTransport::new("wss://api.bitfinex.com/ws/2");
//!     let config = SessionConfig::new().with_settle_delay(Duration::from_millis(250));
//!
//!     let mut session = open_session(transport, Some(&creds), &config, None).await?;
//!     while let Some(frame) = session.recv().await? {
//!         println!("{}", frame);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;
pub mod session;
pub mod transport;

// Re-export main types
pub use auth::{AuthFrame, AuthOutcome, DMS_CANCEL_ON_DISCONNECT, RATE_LIMIT_MESSAGE};
pub use error::{SessionError, SessionResult};
pub use session::{open_session, AuthenticatedSession, SessionConfig, RATE_LIMIT_RETRY_DELAY};
#[cfg(any(test, feature = "test-utils"))]
pub use transport::MockTransport;
pub use transport::{Transport, TransportError, WsTransport};
