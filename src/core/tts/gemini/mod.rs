//! Gemini Live text-to-speech.
//!
//! One request maps to one Live session: connect, send the setup and a single
//! user turn, then collect inline PCM until the model signals completion.

pub mod client;
pub mod config;
pub mod messages;
pub mod session;

pub use client::{GeminiLiveConnector, GeminiLiveSession};
pub use config::{DEFAULT_MODEL, GEMINI_LIVE_URL, SYNTHESIS_TIMEOUT};
pub use messages::{ClientMessage, ServerContent, ServerMessage};
pub use session::{SessionPhase, SpeechInput, SynthesisSession};
