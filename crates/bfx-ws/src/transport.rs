//! Socket plumbing for authenticated sessions
//!
//! A session handshake needs four things from a socket: open it, push the
//! auth frame, pull text frames until the auth reply shows up, and shut it
//! before a rate limited retry. [`Transport`] is exactly that surface.
//! [`WsTransport`] speaks it over tokio-tungstenite and [`MockTransport`]
//! replays a frame script.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, instrument};

/// Time allowed for the TCP, TLS and upgrade handshakes
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Socket level failures
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("could not connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("no connection to {url} after {after:?}")]
    ConnectTimeout { url: String, after: Duration },

    #[error("socket not connected")]
    NotConnected,

    /// Stream ended without a close frame
    #[error("socket dropped")]
    Dropped,

    #[error("websocket error: {0}")]
    Socket(String),

    #[error("binary frame is not UTF-8: {0}")]
    NotUtf8(String),
}

/// The socket surface a session handshake runs on
#[async_trait]
pub trait Transport: Send {
    async fn connect(&mut self) -> Result<(), TransportError>;

    /// Send one text frame
    async fn send(&mut self, message: &str) -> Result<(), TransportError>;

    /// Next text frame, or `None` once the server has closed the socket
    async fn recv(&mut self) -> Result<Option<String>, TransportError>;

    async fn close(&mut self) -> Result<(), TransportError>;

    fn is_connected(&self) -> bool;

    /// URL this transport connects to
    fn endpoint(&self) -> &str;
}

/// What an inbound message means to a session
#[derive(Debug, PartialEq)]
enum Inbound {
    Text(String),
    Closed,
    /// Ping/pong and raw frames, answered by tungstenite itself
    Control,
}

fn inbound(message: Message) -> Result<Inbound, TransportError> {
    match message {
        Message::Text(text) => Ok(Inbound::Text(text)),
        Message::Binary(data) => String::from_utf8(data)
            .map(Inbound::Text)
            .map_err(|e| TransportError::NotUtf8(e.to_string())),
        Message::Close(frame) => {
            if let Some(frame) = frame {
                debug!(code = u16::from(frame.code), reason = %frame.reason, "Server closed socket");
            }
            Ok(Inbound::Closed)
        }
        Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => Ok(Inbound::Control),
    }
}

/// tokio-tungstenite socket to a Bitfinex WebSocket root
pub struct WsTransport {
    url: String,
    socket: Option<Socket>,
}

impl WsTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            socket: None,
        }
    }

    fn socket(&mut self) -> Result<&mut Socket, TransportError> {
        self.socket.as_mut().ok_or(TransportError::NotConnected)
    }
}

#[async_trait]
impl Transport for WsTransport {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn connect(&mut self) -> Result<(), TransportError> {
        // a retry reconnects over whatever is left of the previous socket
        self.socket = None;

        let (socket, _) = tokio::time::timeout(CONNECT_TIMEOUT, connect_async(self.url.as_str()))
            .await
            .map_err(|_| TransportError::ConnectTimeout {
                url: self.url.clone(),
                after: CONNECT_TIMEOUT,
            })?
            .map_err(|e| TransportError::Connect {
                url: self.url.clone(),
                reason: e.to_string(),
            })?;

        self.socket = Some(socket);
        debug!("Socket open");
        Ok(())
    }

    async fn send(&mut self, message: &str) -> Result<(), TransportError> {
        self.socket()?
            .send(Message::Text(message.to_string()))
            .await
            .map_err(|e| TransportError::Socket(e.to_string()))
    }

    async fn recv(&mut self) -> Result<Option<String>, TransportError> {
        loop {
            let next = self.socket()?.next().await;
            let message = match next {
                Some(message) => message.map_err(|e| TransportError::Socket(e.to_string()))?,
                None => {
                    self.socket = None;
                    return Err(TransportError::Dropped);
                }
            };

            match inbound(message)? {
                Inbound::Text(text) => return Ok(Some(text)),
                Inbound::Closed => {
                    self.socket = None;
                    return Ok(None);
                }
                Inbound::Control => {}
            }
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        match self.socket.take() {
            Some(mut socket) => socket
                .close(None)
                .await
                .map_err(|e| TransportError::Socket(e.to_string())),
            None => Ok(()),
        }
    }

    fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

/// Mock transport for testing
///
/// Replays queued frames and captures sent ones. The frame queue
/// survives reconnects so a script can span several connections.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockTransport {
    url: String,
    connected: bool,
    /// Frames to return from recv()
    pub frames: std::collections::VecDeque<Result<Option<String>, TransportError>>,
    /// Frames captured from send()
    pub sent: Vec<String>,
    /// Number of successful connect() calls
    pub connects: usize,
    /// Simulate connection failure
    pub fail_connect: bool,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connected: false,
            frames: std::collections::VecDeque::new(),
            sent: Vec::new(),
            connects: 0,
            fail_connect: false,
        }
    }

    /// Queue an inbound frame
    pub fn push_frame(&mut self, frame: impl Into<String>) {
        self.frames.push_back(Ok(Some(frame.into())));
    }

    /// Queue an inbound JSON frame
    pub fn push_json(&mut self, frame: serde_json::Value) {
        self.push_frame(frame.to_string());
    }

    /// Simulate a graceful close
    pub fn push_close(&mut self) {
        self.frames.push_back(Ok(None));
    }

    /// Simulate a receive error
    pub fn push_error(&mut self, error: TransportError) {
        self.frames.push_back(Err(error));
    }

    /// Sent frames parsed as JSON
    pub fn sent_json(&self) -> Vec<serde_json::Value> {
        self.sent
            .iter()
            .filter_map(|s| serde_json::from_str(s).ok())
            .collect()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl Transport for MockTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        if self.fail_connect {
            return Err(TransportError::Connect {
                url: self.url.clone(),
                reason: "mock connection failure".into(),
            });
        }
        self.connected = true;
        self.connects += 1;
        Ok(())
    }

    async fn send(&mut self, message: &str) -> Result<(), TransportError> {
        if !self.connected {
            return Err(TransportError::NotConnected);
        }
        self.sent.push(message.to_string());
        Ok(())
    }

    async fn recv(&mut self) -> Result<Option<String>, TransportError> {
        if !self.connected {
            return Err(TransportError::NotConnected);
        }
        self.frames
            .pop_front()
            .unwrap_or(Err(TransportError::Dropped))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
    use tokio_tungstenite::tungstenite::protocol::CloseFrame;

    #[test]
    fn test_inbound_text_and_binary() {
        assert_eq!(
            inbound(Message::Text(r#"{"event":"info"}"#.to_string())).unwrap(),
            Inbound::Text(r#"{"event":"info"}"#.to_string())
        );
        assert_eq!(
            inbound(Message::Binary(b"[0,\"hb\"]".to_vec())).unwrap(),
            Inbound::Text(r#"[0,"hb"]"#.to_string())
        );
        assert!(matches!(
            inbound(Message::Binary(vec![0xff, 0xfe])),
            Err(TransportError::NotUtf8(_))
        ));
    }

    #[test]
    fn test_inbound_close_and_control() {
        let close = Message::Close(Some(CloseFrame {
            code: CloseCode::Away,
            reason: "maintenance".into(),
        }));
        assert_eq!(inbound(close).unwrap(), Inbound::Closed);
        assert_eq!(inbound(Message::Close(None)).unwrap(), Inbound::Closed);
        assert_eq!(inbound(Message::Ping(vec![1])).unwrap(), Inbound::Control);
        assert_eq!(inbound(Message::Pong(Vec::new())).unwrap(), Inbound::Control);
    }

    #[tokio::test]
    async fn test_ws_transport_requires_connect() {
        let mut transport = WsTransport::new("wss://api.bitfinex.com/ws/2");
        assert!(!transport.is_connected());
        assert!(matches!(
            transport.send("{}").await,
            Err(TransportError::NotConnected)
        ));
        assert!(matches!(
            transport.recv().await,
            Err(TransportError::NotConnected)
        ));
        assert!(transport.close().await.is_ok());
    }

    #[test]
    fn test_error_names_endpoint() {
        let err = TransportError::ConnectTimeout {
            url: "wss://api.bitfinex.com/ws/2".to_string(),
            after: CONNECT_TIMEOUT,
        };
        assert!(err.to_string().contains("wss://api.bitfinex.com/ws/2"));
    }

    #[tokio::test]
    async fn test_mock_transport_send_recv() {
        let mut transport = MockTransport::new("wss://mock.test");
        transport.push_frame(r#"{"event":"info","version":2}"#);

        transport.connect().await.unwrap();
        assert!(transport.is_connected());

        transport.send(r#"{"event":"ping"}"#).await.unwrap();
        assert_eq!(transport.sent.len(), 1);

        let frame = transport.recv().await.unwrap();
        assert!(frame.unwrap().contains("info"));
    }

    #[tokio::test]
    async fn test_mock_transport_requires_connect() {
        let mut transport = MockTransport::new("wss://mock.test");
        assert!(matches!(
            transport.send("{}").await,
            Err(TransportError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_mock_transport_reconnect_keeps_script() {
        let mut transport = MockTransport::new("wss://mock.test");
        transport.push_frame("first");
        transport.push_frame("second");

        transport.connect().await.unwrap();
        assert_eq!(transport.recv().await.unwrap().as_deref(), Some("first"));
        transport.close().await.unwrap();

        transport.connect().await.unwrap();
        assert_eq!(transport.recv().await.unwrap().as_deref(), Some("second"));
        assert_eq!(transport.connects, 2);
    }

    #[tokio::test]
    async fn test_mock_transport_connection_failure() {
        let mut transport = MockTransport::new("wss://mock.test");
        transport.fail_connect = true;

        assert!(transport.connect().await.is_err());
        assert!(!transport.is_connected());
        assert_eq!(transport.connects, 0);
    }
}
