//! Orchestration of one text-to-speech exchange with Gemini Live.
//!
//! ```text
//! Idle ──connect──▶ Connected ──setup + user turn──▶ Sent ──▶ Receiving ──┬─▶ Complete
//!                                                                        └─▶ Failed
//! ```
//!
//! `Complete` is reached only through an explicit `turnComplete` or
//! `generationComplete` signal. A read error, a close frame or the stream
//! simply ending all lead to `Failed`, and any audio gathered so far is
//! discarded. The whole exchange runs under a single deadline.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::config::{DEFAULT_MODEL, SYNTHESIS_TIMEOUT};
use super::messages::{ClientMessage, ServerMessage};
use crate::core::tts::base::{
    AudioBuffer, LiveConnector, LiveSession, SynthesisError, SynthesisResult,
};

/// Phases of a synthesis exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Connected,
    Sent,
    Receiving,
    Complete,
    Failed,
}

/// What to synthesize
#[derive(Debug, Clone, Copy)]
pub struct SpeechInput<'a> {
    /// Normalized text
    pub text: &'a str,
    /// Catalog voice name
    pub voice: Option<&'a str>,
    /// Language hint
    pub lang: Option<&'a str>,
}

/// Runs synthesis exchanges against a [`LiveConnector`]
#[derive(Clone)]
pub struct SynthesisSession {
    connector: Arc<dyn LiveConnector>,
    model: String,
    timeout: Duration,
}

impl SynthesisSession {
    pub fn new(connector: Arc<dyn LiveConnector>) -> Self {
        Self {
            connector,
            model: DEFAULT_MODEL.to_string(),
            timeout: SYNTHESIS_TIMEOUT,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Synthesize `input` and return the raw PCM produced by the provider.
    ///
    /// Dropping the returned future (for example when the HTTP client goes
    /// away) drops the open session with it.
    pub async fn synthesize(
        &self,
        input: SpeechInput<'_>,
        api_key: &str,
    ) -> SynthesisResult<AudioBuffer> {
        match tokio::time::timeout(self.timeout, self.run(input, api_key)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "Synthesis exceeded deadline, session dropped"
                );
                Err(SynthesisError::Timeout(self.timeout))
            }
        }
    }

    async fn run(&self, input: SpeechInput<'_>, api_key: &str) -> SynthesisResult<AudioBuffer> {
        let session = self
            .connector
            .connect(api_key)
            .await
            .map_err(|e| SynthesisError::UpstreamUnavailable(e.to_string()))?;

        let mut exchange = Exchange::new(session);
        let result = exchange.run(&self.model, input).await;
        exchange.session.close().await;

        let audio = result?;
        info!(
            bytes = audio.len(),
            chunks = audio.chunk_count(),
            "Synthesis complete"
        );
        Ok(audio)
    }
}

/// State of one exchange over an open session
struct Exchange {
    session: Box<dyn LiveSession>,
    phase: SessionPhase,
}

impl Exchange {
    fn new(session: Box<dyn LiveSession>) -> Self {
        let mut exchange = Self {
            session,
            phase: SessionPhase::Idle,
        };
        exchange.advance(SessionPhase::Connected);
        exchange
    }

    fn advance(&mut self, next: SessionPhase) {
        debug!(from = ?self.phase, to = ?next, "Synthesis session phase");
        self.phase = next;
    }

    fn fail(&mut self, error: SynthesisError) -> SynthesisError {
        warn!(phase = ?self.phase, "Synthesis failed: {}", error);
        self.advance(SessionPhase::Failed);
        error
    }

    async fn run(&mut self, model: &str, input: SpeechInput<'_>) -> SynthesisResult<AudioBuffer> {
        self.send_request(model, input).await?;
        self.receive_audio().await
    }

    async fn send_request(&mut self, model: &str, input: SpeechInput<'_>) -> SynthesisResult<()> {
        let messages = [
            ClientMessage::setup(model, input.voice, input.lang),
            ClientMessage::user_turn(input.text),
        ];
        for message in &messages {
            if let Err(e) = self.session.send(message).await {
                return Err(self.fail(SynthesisError::UpstreamSendFailed(e.to_string())));
            }
        }
        self.advance(SessionPhase::Sent);
        Ok(())
    }

    async fn receive_audio(&mut self) -> SynthesisResult<AudioBuffer> {
        self.advance(SessionPhase::Receiving);
        let mut audio = AudioBuffer::new();

        loop {
            let message = match self.session.receive().await {
                Ok(Some(message)) => message,
                Ok(None) => {
                    return Err(self.fail(SynthesisError::UpstreamReadFailed(
                        "stream ended before turn completion".to_string(),
                    )));
                }
                Err(e) => return Err(self.fail(SynthesisError::UpstreamReadFailed(e.to_string()))),
            };

            if self.absorb(message, &mut audio)? {
                self.advance(SessionPhase::Complete);
                return Ok(audio);
            }
        }
    }

    /// Append any audio in `message`; returns whether it ends the turn.
    fn absorb(&mut self, message: ServerMessage, audio: &mut AudioBuffer) -> SynthesisResult<bool> {
        if message.setup_complete.is_some() {
            debug!("Gemini Live setup complete");
        }

        let Some(content) = message.server_content else {
            return Ok(false);
        };

        for blob in content.audio_blobs() {
            match blob.decode() {
                Ok(pcm) => audio.append(&pcm),
                Err(e) => {
                    return Err(self.fail(SynthesisError::UpstreamReadFailed(format!(
                        "invalid inline audio: {e}"
                    ))));
                }
            }
        }

        Ok(content.is_final())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tts::base::TransportError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    enum Step {
        Message(ServerMessage),
        Error(TransportError),
        End,
        Hang,
    }

    #[derive(Default)]
    struct Probe {
        connects: AtomicUsize,
        closed: AtomicBool,
        dropped: AtomicBool,
        sent: Mutex<Vec<ClientMessage>>,
        keys: Mutex<Vec<String>>,
    }

    struct ScriptedConnector {
        probe: Arc<Probe>,
        script: Mutex<Option<VecDeque<Step>>>,
        refuse: bool,
        fail_send: bool,
    }

    impl ScriptedConnector {
        fn new(steps: Vec<Step>) -> (Arc<Self>, Arc<Probe>) {
            let probe = Arc::new(Probe::default());
            let connector = Arc::new(Self {
                probe: probe.clone(),
                script: Mutex::new(Some(steps.into())),
                refuse: false,
                fail_send: false,
            });
            (connector, probe)
        }

        fn refusing() -> (Arc<Self>, Arc<Probe>) {
            let probe = Arc::new(Probe::default());
            let connector = Arc::new(Self {
                probe: probe.clone(),
                script: Mutex::new(None),
                refuse: true,
                fail_send: false,
            });
            (connector, probe)
        }

        fn failing_send() -> (Arc<Self>, Arc<Probe>) {
            let probe = Arc::new(Probe::default());
            let connector = Arc::new(Self {
                probe: probe.clone(),
                script: Mutex::new(Some(VecDeque::new())),
                refuse: false,
                fail_send: true,
            });
            (connector, probe)
        }
    }

    struct ScriptedSession {
        probe: Arc<Probe>,
        script: VecDeque<Step>,
        fail_send: bool,
    }

    impl Drop for ScriptedSession {
        fn drop(&mut self) {
            self.probe.dropped.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl LiveConnector for ScriptedConnector {
        async fn connect(&self, api_key: &str) -> Result<Box<dyn LiveSession>, TransportError> {
            self.probe.connects.fetch_add(1, Ordering::SeqCst);
            self.probe.keys.lock().unwrap().push(api_key.to_string());
            if self.refuse {
                return Err(TransportError::WebSocket("connection refused".to_string()));
            }
            let script = self.script.lock().unwrap().take().unwrap_or_default();
            Ok(Box::new(ScriptedSession {
                probe: self.probe.clone(),
                script,
                fail_send: self.fail_send,
            }))
        }
    }

    #[async_trait]
    impl LiveSession for ScriptedSession {
        async fn send(&mut self, message: &ClientMessage) -> Result<(), TransportError> {
            if self.fail_send {
                return Err(TransportError::WebSocket("broken pipe".to_string()));
            }
            self.probe.sent.lock().unwrap().push(message.clone());
            Ok(())
        }

        async fn receive(&mut self) -> Result<Option<ServerMessage>, TransportError> {
            match self.script.pop_front() {
                Some(Step::Message(message)) => Ok(Some(message)),
                Some(Step::Error(e)) => Err(e),
                Some(Step::End) | None => Ok(None),
                Some(Step::Hang) => {
                    std::future::pending::<()>().await;
                    unreachable!()
                }
            }
        }

        async fn close(&mut self) {
            self.probe.closed.store(true, Ordering::SeqCst);
        }
    }

    fn input(text: &str) -> SpeechInput<'_> {
        SpeechInput {
            text,
            voice: None,
            lang: None,
        }
    }

    fn setup_complete() -> ServerMessage {
        ServerMessage {
            setup_complete: Some(serde_json::json!({})),
            server_content: None,
        }
    }

    #[tokio::test]
    async fn test_accumulates_audio_in_arrival_order() {
        let (connector, probe) = ScriptedConnector::new(vec![
            Step::Message(setup_complete()),
            Step::Message(ServerMessage::audio(&[&[1, 2], &[3]], "audio/pcm")),
            Step::Message(ServerMessage::audio(&[&[1, 2]], "audio/pcm")),
            Step::Message(ServerMessage::turn_complete()),
        ]);
        let session = SynthesisSession::new(connector);

        let audio = session.synthesize(input("Hello"), "key-1").await.unwrap();

        assert_eq!(audio.as_bytes(), &[1, 2, 3, 1, 2]);
        assert_eq!(audio.chunk_count(), 3);
        assert!(probe.closed.load(Ordering::SeqCst));
        assert_eq!(probe.keys.lock().unwrap().as_slice(), ["key-1"]);
    }

    #[tokio::test]
    async fn test_sends_setup_then_single_user_turn() {
        let (connector, probe) =
            ScriptedConnector::new(vec![Step::Message(ServerMessage::turn_complete())]);
        let session = SynthesisSession::new(connector).with_model("models/custom");

        session
            .synthesize(
                SpeechInput {
                    text: "Line1\nLine2",
                    voice: Some("kore"),
                    lang: Some("en-US"),
                },
                "key",
            )
            .await
            .unwrap();

        let sent = probe.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(
            sent[0],
            ClientMessage::setup("models/custom", Some("kore"), Some("en-US"))
        );
        assert_eq!(sent[1], ClientMessage::user_turn("Line1\nLine2"));
    }

    #[tokio::test]
    async fn test_generation_complete_also_terminates() {
        let (connector, _probe) = ScriptedConnector::new(vec![
            Step::Message(ServerMessage::audio(&[&[9, 9]], "audio/pcm")),
            Step::Message(ServerMessage::generation_complete()),
            Step::Message(ServerMessage::audio(&[&[7]], "audio/pcm")),
        ]);
        let session = SynthesisSession::new(connector);

        let audio = session.synthesize(input("hi"), "key").await.unwrap();
        assert_eq!(audio.as_bytes(), &[9, 9]);
    }

    #[tokio::test]
    async fn test_audio_in_final_message_is_kept() {
        let mut last = ServerMessage::audio(&[&[5, 6]], "audio/pcm");
        if let Some(content) = last.server_content.as_mut() {
            content.turn_complete = true;
        }
        let (connector, _probe) = ScriptedConnector::new(vec![Step::Message(last)]);

        let audio = SynthesisSession::new(connector)
            .synthesize(input("hi"), "key")
            .await
            .unwrap();
        assert_eq!(audio.as_bytes(), &[5, 6]);
    }

    #[tokio::test]
    async fn test_stream_end_without_signal_is_failure() {
        let (connector, probe) = ScriptedConnector::new(vec![
            Step::Message(ServerMessage::audio(&[&[1]], "audio/pcm")),
            Step::End,
        ]);
        let session = SynthesisSession::new(connector);

        let err = session.synthesize(input("hi"), "key").await.unwrap_err();
        assert!(matches!(err, SynthesisError::UpstreamReadFailed(_)));
        assert!(probe.closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_read_error_is_failure() {
        let (connector, probe) = ScriptedConnector::new(vec![
            Step::Message(ServerMessage::audio(&[&[1]], "audio/pcm")),
            Step::Error(TransportError::Closed("1011 internal".to_string())),
        ]);
        let session = SynthesisSession::new(connector);

        let err = session.synthesize(input("hi"), "key").await.unwrap_err();
        assert_eq!(
            err,
            SynthesisError::UpstreamReadFailed(
                "connection closed by provider: 1011 internal".to_string()
            )
        );
        assert!(probe.closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_invalid_inline_audio_is_failure() {
        let mut bad = ServerMessage::audio(&[&[1]], "audio/pcm");
        if let Some(content) = bad.server_content.as_mut()
            && let Some(turn) = content.model_turn.as_mut()
            && let Some(blob) = turn.parts[0].inline_data.as_mut()
        {
            blob.data = "***".to_string();
        }
        let (connector, _probe) = ScriptedConnector::new(vec![Step::Message(bad)]);

        let err = SynthesisSession::new(connector)
            .synthesize(input("hi"), "key")
            .await
            .unwrap_err();
        assert!(matches!(err, SynthesisError::UpstreamReadFailed(_)));
    }

    #[tokio::test]
    async fn test_connect_failure_is_upstream_unavailable() {
        let (connector, probe) = ScriptedConnector::refusing();
        let session = SynthesisSession::new(connector);

        let err = session.synthesize(input("hi"), "key").await.unwrap_err();
        assert!(matches!(err, SynthesisError::UpstreamUnavailable(_)));
        assert_eq!(probe.connects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_send_failure_is_upstream_send_failed() {
        let (connector, probe) = ScriptedConnector::failing_send();
        let session = SynthesisSession::new(connector);

        let err = session.synthesize(input("hi"), "key").await.unwrap_err();
        assert!(matches!(err, SynthesisError::UpstreamSendFailed(_)));
        assert!(probe.closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_deadline_drops_session() {
        let (connector, probe) = ScriptedConnector::new(vec![
            Step::Message(ServerMessage::audio(&[&[1]], "audio/pcm")),
            Step::Hang,
        ]);
        let session = SynthesisSession::new(connector).with_timeout(Duration::from_millis(50));

        let err = session.synthesize(input("hi"), "key").await.unwrap_err();
        assert_eq!(err, SynthesisError::Timeout(Duration::from_millis(50)));
        assert!(probe.dropped.load(Ordering::SeqCst));
    }

    #[test]
    fn test_defaults() {
        let (connector, _probe) = ScriptedConnector::new(vec![]);
        let session = SynthesisSession::new(connector);
        assert_eq!(session.model(), DEFAULT_MODEL);
        assert_eq!(session.timeout, SYNTHESIS_TIMEOUT);
    }
}
