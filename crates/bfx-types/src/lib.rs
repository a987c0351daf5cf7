//! Shared types for the Bitfinex API helpers
//!
//! This crate contains the data model shared by the REST and WebSocket
//! crates: API version dispatch, endpoint path parsing and the layered
//! option set that every operation resolves before it runs.
//!
//! # Example
//!
//! ```
//! use bfx_types::{ApiOptions, ApiVersion, EndpointPath};
//!
//! let endpoint = EndpointPath::parse("/v2/auth/r/wallets?limit=10").unwrap();
//! assert_eq!(endpoint.path(), "v2/auth/r/wallets");
//! assert_eq!(endpoint.args(), Some("limit=10"));
//! assert_eq!(endpoint.version().unwrap(), ApiVersion::V2);
//!
//! let config = ApiOptions::new().with_performance(true).resolve();
//! assert!(config.performance);
//! ```

pub mod error;
pub mod options;
pub mod path;
pub mod version;

pub use error::{PathError, PathResult};
pub use options::{ApiConfig, ApiOptions, DEFAULT_REST_URL, DEFAULT_WS_URL};
pub use path::EndpointPath;
pub use version::{ApiVersion, HttpMethod};
