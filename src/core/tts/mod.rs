mod base;
pub mod gemini;

pub use base::{
    AudioBuffer, LiveConnector, LiveSession, SynthesisError, SynthesisResult, TransportError,
};
pub use gemini::{GeminiLiveConnector, SpeechInput, SynthesisSession};
