//! Authentication primitives for the Bitfinex REST and WebSocket APIs
//!
//! Every authenticated Bitfinex call is signed with HMAC-SHA384 over a
//! version specific message, hex encoded:
//!
//! | Surface | Signed message | Headers / fields |
//! |---------|----------------|------------------|
//! | REST v1 | `base64(JSON(body))` | `X-BFX-APIKEY`, `X-BFX-PAYLOAD`, `X-BFX-SIGNATURE` |
//! | REST v2 | `"/api/" + path + nonce + JSON(body)` | `bfx-nonce`, `bfx-apikey`, `bfx-signature` |
//! | WebSocket | `"AUTH" + nonce` | `apiKey`, `authNonce`, `authSig`, `authPayload` |
//!
//! Access tokens bypass signing entirely and travel as a `bfx-token` header
//! (or `token` field on the socket).
//!
//! # Example
//!
//! ```
//! use bfx_auth::{generate_nonce, AuthHeaders, Credentials};
//!
//! let creds = Credentials::api_key("my_key", "my_secret");
//! let nonce = generate_nonce();
//! let headers = AuthHeaders::v2(&creds, "v2/auth/r/wallets", &nonce, "{}").unwrap();
//! assert!(headers.get("bfx-signature").is_some());
//! ```

mod credentials;
mod error;
mod headers;
mod nonce;
mod signing;

pub use credentials::{AccessToken, ApiKeyPair, Credentials};
pub use error::{AuthError, AuthResult};
pub use headers::{names as header_names, AuthHeaders};
pub use nonce::generate_nonce;
pub use signing::{encode_v1_payload, hmac_sha384_hex};
