//! Common test utilities and fixtures for integration tests
//!
//! Signature fixtures were computed independently (Python `hmac` and
//! `openssl dgst -sha384 -hmac`).

#![allow(dead_code)]

use bfx_rest::MockHttpTransport;
use bfx_sdk::{ApiHelper, ApiOptions};
use serde_json::{json, Value};

pub const API_KEY: &str = "key";
pub const API_SECRET: &str = "secret";
pub const NONCE: &str = "1600000000000000";

/// v1 `/v1/balances` body with nonce, as sent on the wire
pub const V1_BALANCES_BODY: &str = r#"{"nonce":"1600000000000000","request":"/v1/balances"}"#;
pub const V1_BALANCES_PAYLOAD: &str =
    "eyJub25jZSI6IjE2MDAwMDAwMDAwMDAwMDAiLCJyZXF1ZXN0IjoiL3YxL2JhbGFuY2VzIn0=";
pub const V1_BALANCES_SIGNATURE: &str = "f3ed1f9a0e2f900c3fe3b6a9a846dc395c11b2e197c282ae45ca7f4b8e4cdc5ecca1e6f8f4ad0c217d39bb8ce539dec5";

/// v2 `v2/auth/r/wallets` with an empty body
pub const V2_WALLETS_SIGNATURE: &str = "2f459012a2105046ddf3d3b1cdb0e04466efc470ac4c1a16e3dd5c612315a5e2fec17d7963bb62d8f24008128e00a190";

/// `"AUTH" + NONCE`
pub const WS_AUTH_SIGNATURE: &str = "052bea43f4dc0ffd1b1f233d08be9333abc76606d831b1b1a103e2f7366f4075fea035a358af1ec145a86adbb5b2ac42";

/// Greeting the server sends on connect
pub fn info_frame() -> Value {
    json!({"event": "info", "version": 2, "serverId": "mock", "platform": {"status": 1}})
}

pub fn auth_ok_frame() -> Value {
    json!({"event": "auth", "status": "OK", "chanId": 0, "userId": 1234, "caps": {}})
}

pub fn auth_rate_limited_frame() -> Value {
    json!({"event": "auth", "status": "FAILED", "chanId": 0, "msg": "rate: limit", "code": 10100})
}

pub fn auth_invalid_key_frame() -> Value {
    json!({"event": "auth", "status": "FAILED", "chanId": 0, "msg": "apikey: invalid", "code": 10100})
}

/// Helper with key credentials over a mock transport
pub fn keyed_helper() -> ApiHelper<MockHttpTransport> {
    ApiHelper::builder()
        .with_defaults(ApiOptions::new().with_api_key(API_KEY, API_SECRET))
        .build_with_transport(MockHttpTransport::new())
}

/// Helper without credentials over a mock transport
pub fn public_helper() -> ApiHelper<MockHttpTransport> {
    ApiHelper::builder()
        .quiet()
        .build_with_transport(MockHttpTransport::new())
}

/// Helper whose loaded layer has a key but no secret
pub fn half_pair_helper() -> ApiHelper<MockHttpTransport> {
    ApiHelper::builder()
        .quiet()
        .with_defaults(ApiOptions {
            key: Some("key_only".to_string()),
            ..ApiOptions::new()
        })
        .build_with_transport(MockHttpTransport::new())
}

/// Route helper logs to the test writer
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}
