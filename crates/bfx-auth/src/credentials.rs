//! API credentials
//!
//! A request is authenticated with exactly one kind of credential: an
//! API key pair (which signs) or an access token (which does not). When
//! both are configured the token wins.
//!
//! # Security
//!
//! Secrets are held in `secrecy` containers which zeroize memory on drop
//! and keep the value out of `Debug` output.

use bfx_types::ApiOptions;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use tracing::warn;

use crate::error::{AuthError, AuthResult};
use crate::signing::hmac_sha384_hex;

/// API key and secret used to sign requests
pub struct ApiKeyPair {
    api_key: String,
    secret: SecretString,
}

impl ApiKeyPair {
    pub fn new(api_key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret: SecretString::from(secret.into()),
        }
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Sign an arbitrary message with the secret
    pub fn sign(&self, message: &str) -> AuthResult<String> {
        hmac_sha384_hex(self.secret.expose_secret().as_bytes(), message.as_bytes())
    }

    /// v1 signature over the base64 payload
    pub fn v1_signature(&self, payload: &str) -> AuthResult<String> {
        self.sign(payload)
    }

    /// v2 signature over `"/api/" + path + nonce + body`
    ///
    /// `path` is the normalized endpoint path without leading slash or
    /// query string, e.g. `v2/auth/r/wallets`.
    pub fn v2_signature(&self, path: &str, nonce: &str, body_json: &str) -> AuthResult<String> {
        self.sign(&format!("/api/{}{}{}", path, nonce, body_json))
    }

    /// WebSocket auth payload and its signature
    pub fn ws_auth(&self, nonce: &str) -> AuthResult<(String, String)> {
        let payload = format!("AUTH{}", nonce);
        let signature = self.sign(&payload)?;
        Ok((payload, signature))
    }
}

impl Clone for ApiKeyPair {
    fn clone(&self) -> Self {
        Self {
            api_key: self.api_key.clone(),
            secret: SecretString::from(self.secret.expose_secret().to_string()),
        }
    }
}

impl fmt::Debug for ApiKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyPair")
            .field(
                "api_key",
                &format!("{}...", self.api_key.chars().take(8).collect::<String>()),
            )
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Pre-issued access token
pub struct AccessToken(SecretString);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Controlled access to the raw token
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for AccessToken {
    fn clone(&self) -> Self {
        Self::new(self.expose().to_string())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Credentials for authenticated requests
#[derive(Debug, Clone)]
pub enum Credentials {
    ApiKey(ApiKeyPair),
    Token(AccessToken),
}

impl Credentials {
    /// Key pair credentials
    pub fn api_key(api_key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::ApiKey(ApiKeyPair::new(api_key, secret))
    }

    /// Token credentials
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token(AccessToken::new(token))
    }

    /// Pick credentials from optional parts
    ///
    /// A token takes precedence over a key pair. Half a key pair is
    /// unusable and is treated as no credentials, with a warning naming
    /// the missing half.
    pub fn from_parts(
        key: Option<&str>,
        secret: Option<&str>,
        token: Option<&str>,
    ) -> Option<Self> {
        if let Some(token) = token {
            return Some(Self::token(token));
        }

        match (key, secret) {
            (Some(key), Some(secret)) => Some(Self::api_key(key, secret)),
            (Some(_), None) => {
                warn!("API key configured without a secret, ignoring credentials");
                None
            }
            (None, Some(_)) => {
                warn!("API secret configured without a key, ignoring credentials");
                None
            }
            (None, None) => None,
        }
    }

    /// Pick credentials from a (merged) option layer
    pub fn from_options(options: &ApiOptions) -> Option<Self> {
        Self::from_parts(
            options.key.as_deref(),
            options.secret.as_deref(),
            options.token.as_deref(),
        )
    }

    pub fn is_token(&self) -> bool {
        matches!(self, Self::Token(_))
    }

    /// The key pair, if these credentials can sign
    pub fn key_pair(&self) -> AuthResult<&ApiKeyPair> {
        match self {
            Self::ApiKey(pair) => Ok(pair),
            Self::Token(_) => Err(AuthError::TokenCannotSign),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_takes_precedence() {
        let creds = Credentials::from_parts(Some("key"), Some("secret"), Some("tok")).unwrap();
        assert!(creds.is_token());
    }

    #[test]
    fn test_half_key_pair_is_no_credentials() {
        assert!(Credentials::from_parts(Some("key"), None, None).is_none());
        assert!(Credentials::from_parts(None, Some("secret"), None).is_none());
    }

    #[test]
    fn test_token_rescues_half_key_pair() {
        let creds = Credentials::from_parts(Some("key"), None, Some("tok")).unwrap();
        assert!(creds.is_token());
    }

    #[test]
    fn test_no_credentials() {
        assert!(Credentials::from_parts(None, None, None).is_none());
        assert!(Credentials::from_options(&ApiOptions::new()).is_none());
    }

    #[test]
    fn test_from_options() {
        let options = ApiOptions::new().with_api_key("key", "secret");
        let creds = Credentials::from_options(&options).unwrap();
        assert_eq!(creds.key_pair().unwrap().api_key(), "key");
    }

    #[test]
    fn test_token_cannot_sign() {
        let creds = Credentials::token("tok");
        assert!(matches!(creds.key_pair(), Err(AuthError::TokenCannotSign)));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::api_key("test_api_key_long", "super_secret_value");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("super_secret_value"));
        assert!(debug.contains("[REDACTED]"));

        let token = format!("{:?}", Credentials::token("session_token_value"));
        assert!(!token.contains("session_token_value"));
    }

    #[test]
    fn test_debug_truncates_multibyte_key() {
        let pair = ApiKeyPair::new("ключ-ключ-ключ", "secret");
        let debug = format!("{:?}", pair);
        assert!(debug.contains("ключ-клю..."));
    }

    #[test]
    fn test_v2_signature_fixture() {
        let pair = ApiKeyPair::new("key", "secret");
        let sig = pair
            .v2_signature("v2/auth/r/wallets", "1600000000000000", "{}")
            .unwrap();
        assert_eq!(
            sig,
            "2f459012a2105046ddf3d3b1cdb0e04466efc470ac4c1a16e3dd5c612315a5e2fec17d7963bb62d8f24008128e00a190"
        );
    }

    #[test]
    fn test_ws_auth_payload() {
        let pair = ApiKeyPair::new("key", "secret");
        let (payload, sig) = pair.ws_auth("1600000000000000").unwrap();
        assert_eq!(payload, "AUTH1600000000000000");
        assert_eq!(
            sig,
            "052bea43f4dc0ffd1b1f233d08be9333abc76606d831b1b1a103e2f7366f4075fea035a358af1ec145a86adbb5b2ac42"
        );
    }
}
