//! Authenticated session handshake
//!
//! `Connecting → AuthSent → {Authenticated | AuthFailed | RateLimited → Connecting}`
//!
//! A rate limited handshake is retried once after a fixed delay with the
//! same arguments. Once authenticated, the socket is handed to the caller
//! as an [`AuthenticatedSession`] and this module no longer reads from it.

use bfx_auth::{generate_nonce, Credentials};
use bfx_types::ApiConfig;
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use crate::auth::{AuthFrame, AuthOutcome};
use crate::error::{SessionError, SessionResult};
use crate::transport::Transport;

/// Delay before retrying a rate limited handshake
pub const RATE_LIMIT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Settings for one handshake
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Request the dead-man's switch
    pub dms: bool,
    /// Channel filters
    pub filter: Vec<String>,
    /// Grace period after a successful auth before handing the socket over
    pub settle_delay: Option<Duration>,
    pub rate_limit_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dms: false,
            filter: Vec::new(),
            settle_delay: None,
            rate_limit_delay: RATE_LIMIT_RETRY_DELAY,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take `dms` and `filter` from resolved options
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            dms: config.dms,
            filter: config.filter.clone(),
            ..Self::default()
        }
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = Some(delay);
        self
    }

    pub fn with_dms(mut self, dms: bool) -> Self {
        self.dms = dms;
        self
    }

    pub fn with_filter(mut self, filter: Vec<String>) -> Self {
        self.filter = filter;
        self
    }
}

/// A live, authenticated socket owned by the caller
pub struct AuthenticatedSession<T: Transport> {
    transport: T,
    auth_reply: Value,
}

impl<T: Transport> AuthenticatedSession<T> {
    /// The server's `auth` reply
    pub fn auth_reply(&self) -> &Value {
        &self.auth_reply
    }

    /// User id reported in the auth reply
    pub fn user_id(&self) -> Option<u64> {
        self.auth_reply.get("userId").and_then(Value::as_u64)
    }

    pub async fn send(&mut self, message: &str) -> SessionResult<()> {
        Ok(self.transport.send(message).await?)
    }

    pub async fn send_json(&mut self, message: &Value) -> SessionResult<()> {
        self.send(&message.to_string()).await
    }

    /// Next text frame, `None` once the server closed the socket
    pub async fn recv(&mut self) -> SessionResult<Option<String>> {
        Ok(self.transport.recv().await?)
    }

    pub async fn recv_json(&mut self) -> SessionResult<Option<Value>> {
        match self.recv().await? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    pub async fn close(&mut self) -> SessionResult<()> {
        Ok(self.transport.close().await?)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give up the session wrapper and keep the raw transport
    pub fn into_inner(self) -> T {
        self.transport
    }
}

impl<T: Transport> std::fmt::Debug for AuthenticatedSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedSession")
            .field("endpoint", &self.transport.endpoint())
            .field("user_id", &self.user_id())
            .finish()
    }
}

/// Connect, authenticate and hand back the live socket
///
/// # Errors
/// - [`SessionError::MissingCredentials`] before any network activity
/// - [`SessionError::AuthenticationFailed`] with the raw reply on rejection
/// - [`SessionError::RateLimited`] if the single retry is throttled too
/// - [`SessionError::ConnectionClosed`] if the socket closes before a reply
#[instrument(skip_all, fields(endpoint = %transport.endpoint()))]
pub async fn open_session<T: Transport>(
    mut transport: T,
    credentials: Option<&Credentials>,
    config: &SessionConfig,
    nonce_override: Option<&str>,
) -> SessionResult<AuthenticatedSession<T>> {
    let credentials = credentials.ok_or(SessionError::MissingCredentials)?;
    let mut retried = false;

    loop {
        match handshake(&mut transport, credentials, config, nonce_override).await? {
            AuthOutcome::Authenticated(reply) => {
                if let Some(delay) = config.settle_delay {
                    debug!("Waiting {:?} for session to settle", delay);
                    sleep(delay).await;
                }
                info!("Socket authenticated");
                return Ok(AuthenticatedSession {
                    transport,
                    auth_reply: reply,
                });
            }
            AuthOutcome::RateLimited(frame) => {
                let _ = transport.close().await;
                if retried {
                    warn!("Auth retry was rate limited again");
                    return Err(SessionError::RateLimited { frame });
                }
                retried = true;
                warn!(
                    "Auth rate limited, retrying in {:?}",
                    config.rate_limit_delay
                );
                sleep(config.rate_limit_delay).await;
            }
            AuthOutcome::Failed(frame) => {
                let _ = transport.close().await;
                warn!("Auth rejected: {}", frame);
                return Err(SessionError::AuthenticationFailed { frame });
            }
        }
    }
}

/// One connect → auth → first auth reply cycle
async fn handshake<T: Transport>(
    transport: &mut T,
    credentials: &Credentials,
    config: &SessionConfig,
    nonce_override: Option<&str>,
) -> SessionResult<AuthOutcome> {
    transport.connect().await?;

    let nonce = nonce_override
        .map(str::to_string)
        .unwrap_or_else(generate_nonce);
    let frame = AuthFrame::build(credentials, &nonce, config.dms, &config.filter)?;
    transport.send(&frame.to_json()?).await?;
    debug!("Auth frame sent");

    loop {
        let text = match transport.recv().await? {
            Some(text) => text,
            None => return Err(SessionError::ConnectionClosed),
        };

        let value: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                debug!("Skipping undecodable frame: {}", e);
                continue;
            }
        };

        if let Some(outcome) = AuthOutcome::classify(&value) {
            return Ok(outcome);
        }
        debug!("Skipping frame before auth reply");
    }
}
