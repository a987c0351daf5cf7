//! Authentication header sets for REST requests

use std::collections::BTreeMap;
use tracing::debug;

use crate::credentials::Credentials;
use crate::error::AuthResult;
use crate::signing::encode_v1_payload;

/// Header names, case-sensitive as the exchange expects them
pub mod names {
    pub const V1_API_KEY: &str = "X-BFX-APIKEY";
    pub const V1_PAYLOAD: &str = "X-BFX-PAYLOAD";
    pub const V1_SIGNATURE: &str = "X-BFX-SIGNATURE";
    pub const V2_NONCE: &str = "bfx-nonce";
    pub const V2_API_KEY: &str = "bfx-apikey";
    pub const V2_SIGNATURE: &str = "bfx-signature";
    pub const TOKEN: &str = "bfx-token";
}

/// Protocol generated authentication headers
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    entries: Vec<(&'static str, String)>,
}

impl AuthHeaders {
    fn token(token: &str) -> Self {
        Self {
            entries: vec![(names::TOKEN, token.to_string())],
        }
    }

    /// Headers for a v1 request
    ///
    /// `body_json` must already contain the `request` and `nonce` fields
    /// and must be the exact string sent as the request body.
    pub fn v1(credentials: &Credentials, body_json: &str) -> AuthResult<Self> {
        let pair = match credentials {
            Credentials::Token(token) => return Ok(Self::token(token.expose())),
            Credentials::ApiKey(pair) => pair,
        };

        let payload = encode_v1_payload(body_json);
        let signature = pair.v1_signature(&payload)?;
        debug!("Signed v1 payload ({} bytes)", payload.len());

        Ok(Self {
            entries: vec![
                (names::V1_API_KEY, pair.api_key().to_string()),
                (names::V1_PAYLOAD, payload),
                (names::V1_SIGNATURE, signature),
            ],
        })
    }

    /// Headers for a v2 request
    pub fn v2(
        credentials: &Credentials,
        path: &str,
        nonce: &str,
        body_json: &str,
    ) -> AuthResult<Self> {
        let pair = match credentials {
            Credentials::Token(token) => return Ok(Self::token(token.expose())),
            Credentials::ApiKey(pair) => pair,
        };

        let signature = pair.v2_signature(path, nonce, body_json)?;
        debug!("Signed v2 request for {}", path);

        Ok(Self {
            entries: vec![
                (names::V2_NONCE, nonce.to_string()),
                (names::V2_API_KEY, pair.api_key().to_string()),
                (names::V2_SIGNATURE, signature),
            ],
        })
    }

    /// Look up a header value by exact name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(n, v)| (*n, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write these headers into `headers`, replacing any existing entry
    /// with the same name
    pub fn apply_to(&self, headers: &mut BTreeMap<String, String>) {
        for (name, value) in &self.entries {
            headers.insert((*name).to_string(), value.clone());
        }
    }
}

impl std::fmt::Debug for AuthHeaders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(n, _)| n))
            .finish()
    }
}
