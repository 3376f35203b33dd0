//! WebSocket transport for the Gemini Live API.
//!
//! Each [`GeminiLiveConnector::connect`] call opens a fresh connection; sessions
//! are never pooled or shared between requests. The API key travels as the
//! `key` query parameter and is never logged.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};
use tracing::{debug, info, warn};
use url::Url;

use super::config::GEMINI_LIVE_URL;
use super::messages::{ClientMessage, ServerMessage};
use crate::core::tts::base::{LiveConnector, LiveSession, TransportError};

/// Opens Gemini Live sessions over WebSocket
#[derive(Debug, Clone)]
pub struct GeminiLiveConnector {
    endpoint: String,
}

impl Default for GeminiLiveConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl GeminiLiveConnector {
    pub fn new() -> Self {
        Self::with_endpoint(GEMINI_LIVE_URL)
    }

    /// Use a different endpoint, e.g. a regional proxy or a local test server
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the WebSocket URL with the API key query parameter
    fn build_websocket_url(&self, api_key: &str) -> Result<Url, TransportError> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| TransportError::InvalidEndpoint(format!("{}: {e}", self.endpoint)))?;
        url.query_pairs_mut().append_pair("key", api_key);
        Ok(url)
    }
}

#[async_trait]
impl LiveConnector for GeminiLiveConnector {
    async fn connect(&self, api_key: &str) -> Result<Box<dyn LiveSession>, TransportError> {
        let url = self.build_websocket_url(api_key)?;

        debug!(endpoint = %self.endpoint, "Connecting to Gemini Live");
        let (stream, _) = connect_async(url.as_str())
            .await
            .map_err(|e| TransportError::WebSocket(e.to_string()))?;
        info!(endpoint = %self.endpoint, "Connected to Gemini Live");

        Ok(Box::new(GeminiLiveSession { stream }))
    }
}

/// An open Gemini Live WebSocket session
///
/// Dropping the session drops the socket, which tears the connection down.
pub struct GeminiLiveSession {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl LiveSession for GeminiLiveSession {
    async fn send(&mut self, message: &ClientMessage) -> Result<(), TransportError> {
        let json = message
            .to_json()
            .map_err(|e| TransportError::Encode(e.to_string()))?;
        self.stream
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| TransportError::WebSocket(e.to_string()))
    }

    async fn receive(&mut self) -> Result<Option<ServerMessage>, TransportError> {
        loop {
            let message = match self.stream.next().await {
                Some(Ok(message)) => message,
                Some(Err(e)) => return Err(TransportError::WebSocket(e.to_string())),
                None => return Ok(None),
            };

            match message {
                Message::Text(text) => {
                    return ServerMessage::parse(text.as_bytes())
                        .map(Some)
                        .map_err(|e| TransportError::Decode(e.to_string()));
                }
                Message::Binary(data) => {
                    return ServerMessage::parse(&data)
                        .map(Some)
                        .map_err(|e| TransportError::Decode(e.to_string()));
                }
                Message::Close(frame) => {
                    let reason = frame
                        .map(|f| format!("{} {}", u16::from(f.code), &*f.reason))
                        .unwrap_or_else(|| "no close frame".to_string());
                    return Err(TransportError::Closed(reason));
                }
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {
                    // Control frames are answered by tokio-tungstenite
                }
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            warn!("Failed to close Gemini Live session cleanly: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_websocket_url_encodes_key() {
        let connector = GeminiLiveConnector::new();
        let url = connector.build_websocket_url("abc/+=").unwrap();

        assert_eq!(url.scheme(), "wss");
        assert_eq!(url.host_str(), Some("generativelanguage.googleapis.com"));
        let key = url
            .query_pairs()
            .find(|(k, _)| k == "key")
            .map(|(_, v)| v.into_owned());
        assert_eq!(key.as_deref(), Some("abc/+="));
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let connector = GeminiLiveConnector::with_endpoint("not a url");
        assert!(matches!(
            connector.build_websocket_url("k"),
            Err(TransportError::InvalidEndpoint(_))
        ));
    }

    #[tokio::test]
    async fn test_connect_failure_reports_websocket_error() {
        // Nothing listens on port 9 locally
        let connector = GeminiLiveConnector::with_endpoint("ws://127.0.0.1:9/live");
        let result = connector.connect("k").await;
        assert!(matches!(result, Err(TransportError::WebSocket(_))));
    }
}
