//! Results of a transmission

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::{Duration, SystemTime};

use crate::error::{RestError, RestResult};

/// The request as it went out, handed to reaction handlers
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEcho {
    /// Body after version specific fields were injected
    pub request_body: Value,
    /// Endpoint path including any query suffix
    pub request_path: String,
}

/// Timing metadata, present when `performance` is enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub started_at: SystemTime,
    pub elapsed: Duration,
}

/// A completed transmission
///
/// The exchange reports failures such as a bad nonce or an invalid key
/// with a non-2xx status and an `["error", code, message]` body; both are
/// kept here rather than turned into an error.
#[derive(Debug, Clone)]
pub struct Settled {
    /// HTTP status code
    pub status: u16,
    /// Decoded body; a non-JSON error body is kept as a string
    pub response: Value,
    pub request: RequestEcho,
    pub timing: Option<Timing>,
}

impl Settled {
    /// Run `handler` against the response and hand the result back
    pub fn react<F>(self, handler: F) -> Self
    where
        F: FnOnce(&Value, &RequestEcho),
    {
        handler(&self.response, &self.request);
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx status into [`RestError::Status`]
    pub fn error_for_status(self) -> RestResult<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let body = match self.response {
            Value::String(raw) => raw,
            other => other.to_string(),
        };
        Err(RestError::Status {
            status: self.status,
            body,
        })
    }

    pub fn response(&self) -> &Value {
        &self.response
    }

    pub fn into_response(self) -> Value {
        self.response
    }

    /// Decode the response into a typed value
    pub fn json<T: DeserializeOwned>(&self) -> RestResult<T> {
        serde_json::from_value(self.response.clone()).map_err(|e| RestError::Decode {
            message: e.to_string(),
            raw: self.response.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settled() -> Settled {
        Settled {
            status: 200,
            response: json!({"status": "operative"}),
            request: RequestEcho {
                request_body: json!({}),
                request_path: "v2/platform/status".to_string(),
            },
            timing: None,
        }
    }

    #[test]
    fn test_react_sees_response_and_request() {
        let mut seen = None;
        let settled = settled().react(|response, request| {
            seen = Some((response["status"].clone(), request.request_path.clone()));
        });

        let (status, path) = seen.unwrap();
        assert_eq!(status, "operative");
        assert_eq!(path, "v2/platform/status");
        assert_eq!(settled.response()["status"], "operative");
    }

    #[test]
    fn test_error_for_status() {
        let ok = settled().error_for_status().unwrap();
        assert!(ok.is_success());

        let mut failed = settled();
        failed.status = 500;
        failed.response = json!(["error", 10020, "apikey: invalid"]);
        match failed.error_for_status() {
            Err(RestError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert!(body.contains("apikey: invalid"));
            }
            other => panic!("unexpected: {:?}", other),
        }

        let mut gateway = settled();
        gateway.status = 502;
        gateway.response = Value::String("<html>bad gateway</html>".to_string());
        let err = gateway.error_for_status().unwrap_err();
        assert!(err.is_retryable());
        assert!(err.to_string().contains("<html>bad gateway</html>"));
    }

    #[test]
    fn test_typed_decode() {
        #[derive(serde::Deserialize)]
        struct Status {
            status: String,
        }

        let status: Status = settled().json().unwrap();
        assert_eq!(status.status, "operative");
        assert!(settled().json::<Vec<u8>>().is_err());
    }
}
