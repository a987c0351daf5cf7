//! Socket authentication frames
//!
//! The client authenticates by sending a single `auth` event:
//!
//! ```json
//! {"event":"auth","apiKey":"...","authNonce":"...","authPayload":"AUTH<nonce>","authSig":"<hex>"}
//! ```
//!
//! or, with an access token, `{"event":"auth","token":"..."}`. The server
//! replies with an `auth` event whose `status` is `OK` or `FAILED`.

use bfx_auth::{AuthResult, Credentials};
use serde::Serialize;
use serde_json::Value;

/// `dms` value that cancels all orders when the socket drops
pub const DMS_CANCEL_ON_DISCONNECT: u8 = 4;

/// Failure message the server sends when auth attempts are throttled
pub const RATE_LIMIT_MESSAGE: &str = "rate: limit";

/// Outbound auth event
#[derive(Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthFrame {
    event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    auth_nonce: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    auth_sig: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    auth_payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dms: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<Vec<String>>,
}

impl AuthFrame {
    /// Build the auth frame for the given credentials
    ///
    /// `dms` adds the dead-man's switch flag; a non-empty `filter` limits
    /// the channels the server will push on this socket.
    pub fn build(
        credentials: &Credentials,
        nonce: &str,
        dms: bool,
        filter: &[String],
    ) -> AuthResult<Self> {
        let mut frame = Self {
            event: "auth",
            token: None,
            api_key: None,
            auth_nonce: None,
            auth_sig: None,
            auth_payload: None,
            dms: dms.then_some(DMS_CANCEL_ON_DISCONNECT),
            filter: (!filter.is_empty()).then(|| filter.to_vec()),
        };

        match credentials {
            Credentials::Token(token) => {
                frame.token = Some(token.expose().to_string());
            }
            Credentials::ApiKey(pair) => {
                let (payload, signature) = pair.ws_auth(nonce)?;
                frame.api_key = Some(pair.api_key().to_string());
                frame.auth_nonce = Some(nonce.to_string());
                frame.auth_sig = Some(signature);
                frame.auth_payload = Some(payload);
            }
        }

        Ok(frame)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Classified server reply to an auth frame
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    Authenticated(Value),
    RateLimited(Value),
    Failed(Value),
}

impl AuthOutcome {
    /// Classify an inbound frame
    ///
    /// Returns `None` for anything that is not an `auth` event, such as
    /// the `info` greeting or channel data arrays.
    pub fn classify(frame: &Value) -> Option<Self> {
        if frame.get("event").and_then(Value::as_str) != Some("auth") {
            return None;
        }

        let status = frame.get("status").and_then(Value::as_str);
        let msg = frame.get("msg").and_then(Value::as_str);

        Some(match (status, msg) {
            (Some("OK"), _) => Self::Authenticated(frame.clone()),
            (Some("FAILED"), Some(RATE_LIMIT_MESSAGE)) => Self::RateLimited(frame.clone()),
            _ => Self::Failed(frame.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frame_json(frame: &AuthFrame) -> Value {
        serde_json::from_str(&frame.to_json().unwrap()).unwrap()
    }

    #[test]
    fn test_key_pair_frame() {
        let creds = Credentials::api_key("key", "secret");
        let frame = frame_json(&AuthFrame::build(&creds, "1600000000000000", false, &[]).unwrap());

        assert_eq!(
            frame,
            json!({
                "event": "auth",
                "apiKey": "key",
                "authNonce": "1600000000000000",
                "authPayload": "AUTH1600000000000000",
                "authSig": "052bea43f4dc0ffd1b1f233d08be9333abc76606d831b1b1a103e2f7366f4075fea035a358af1ec145a86adbb5b2ac42"
            })
        );
    }

    #[test]
    fn test_token_frame_with_dms_and_filter() {
        let creds = Credentials::token("tok");
        let filter = vec!["trading".to_string(), "wallet".to_string()];
        let frame = frame_json(&AuthFrame::build(&creds, "1", true, &filter).unwrap());

        assert_eq!(
            frame,
            json!({
                "event": "auth",
                "token": "tok",
                "dms": 4,
                "filter": ["trading", "wallet"]
            })
        );
    }

    #[test]
    fn test_classify() {
        assert!(AuthOutcome::classify(&json!({"event": "info", "version": 2})).is_none());
        assert!(AuthOutcome::classify(&json!([0, "hb"])).is_none());

        assert!(matches!(
            AuthOutcome::classify(&json!({"event": "auth", "status": "OK", "userId": 1})),
            Some(AuthOutcome::Authenticated(_))
        ));
        assert!(matches!(
            AuthOutcome::classify(&json!({"event": "auth", "status": "FAILED", "msg": "rate: limit"})),
            Some(AuthOutcome::RateLimited(_))
        ));
        assert!(matches!(
            AuthOutcome::classify(&json!({"event": "auth", "status": "FAILED", "msg": "apikey: invalid", "code": 10100})),
            Some(AuthOutcome::Failed(_))
        ));
    }
}
