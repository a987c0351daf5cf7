//! Re-exports for convenience
//!
//! Import everything you need with:
//! ```
//! use bfx_sdk::prelude::*;
//! ```

// Helper
pub use crate::helper::{ApiHelper, ApiHelperBuilder};

// Types from bfx-types
pub use bfx_types::{ApiOptions, ApiVersion, HttpMethod};

// Auth
pub use bfx_auth::Credentials;

// REST lifecycle
pub use bfx_rest::{JsonBody, RequestEcho, Settled, TransmitError};

// WebSocket sessions
pub use bfx_ws::{AuthenticatedSession, SessionError};

pub use std::time::Duration;
