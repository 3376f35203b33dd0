//! # Live synthesis seams
//!
//! A synthesis request is served by exactly one streaming session with the
//! provider. The session is reached through two traits so the orchestration
//! logic does not depend on the websocket transport:
//!
//! - [`LiveConnector`] opens a session with a caller credential
//! - [`LiveSession`] sends client messages and yields server messages in order
//!
//! Transport failures are reported as [`TransportError`]; the orchestrator
//! decides which [`SynthesisError`] they become based on the phase in which
//! they happened.

use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};

use super::gemini::messages::{ClientMessage, ServerMessage};

/// Failures of a synthesis exchange, as surfaced to the HTTP layer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthesisError {
    #[error("live connect failed: {0}")]
    UpstreamUnavailable(String),

    #[error("clientContent send failed: {0}")]
    UpstreamSendFailed(String),

    #[error("read failed: {0}")]
    UpstreamReadFailed(String),

    #[error("synthesis timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Result type for synthesis operations
pub type SynthesisResult<T> = Result<T, SynthesisError>;

/// Low-level transport errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("websocket error: {0}")]
    WebSocket(String),

    #[error("failed to encode message: {0}")]
    Encode(String),

    #[error("failed to decode message: {0}")]
    Decode(String),

    #[error("connection closed by provider: {0}")]
    Closed(String),
}

/// Raw PCM accumulated over one exchange, in arrival order
#[derive(Debug, Default)]
pub struct AudioBuffer {
    data: BytesMut,
    chunks: usize,
}

impl AudioBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one chunk as received
    pub fn append(&mut self, chunk: &[u8]) {
        self.data.extend_from_slice(chunk);
        self.chunks += 1;
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of chunks appended so far
    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Bytes {
        self.data.freeze()
    }
}

/// Opens streaming sessions with the synthesis provider
#[async_trait]
pub trait LiveConnector: Send + Sync {
    /// Open a new session authenticated with `api_key`
    async fn connect(&self, api_key: &str) -> Result<Box<dyn LiveSession>, TransportError>;
}

/// One open bidirectional session
#[async_trait]
pub trait LiveSession: Send {
    /// Send a single client message
    async fn send(&mut self, message: &ClientMessage) -> Result<(), TransportError>;

    /// Next server message, or `None` once the stream has ended
    async fn receive(&mut self) -> Result<Option<ServerMessage>, TransportError>;

    /// Release the session. Dropping a session must release it as well.
    async fn close(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_buffer_preserves_order_and_duplicates() {
        let mut buffer = AudioBuffer::new();
        buffer.append(&[1, 2]);
        buffer.append(&[3]);
        buffer.append(&[1, 2]);

        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.chunk_count(), 3);
        assert_eq!(buffer.as_bytes(), &[1, 2, 3, 1, 2]);
        assert_eq!(buffer.into_bytes().as_ref(), &[1, 2, 3, 1, 2]);
    }

    #[test]
    fn test_synthesis_error_display() {
        assert_eq!(
            SynthesisError::Timeout(Duration::from_secs(60)).to_string(),
            "synthesis timed out after 60s"
        );
        assert_eq!(
            SynthesisError::UpstreamUnavailable("refused".to_string()).to_string(),
            "live connect failed: refused"
        );
    }
}
