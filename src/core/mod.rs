pub mod audio;
pub mod request;
pub mod text;
pub mod tts;
pub mod voices;

// Re-export commonly used types for convenience
pub use audio::{OUTPUT_FORMAT, WavError, WavFormat, encode_wav};
pub use request::{RequestError, SynthesisRequest, parse_request};
pub use text::{MAX_TEXT_LEN, TextError, normalize_text};
pub use tts::{
    AudioBuffer, GeminiLiveConnector, LiveConnector, LiveSession, SpeechInput, SynthesisError,
    SynthesisResult, SynthesisSession, TransportError,
};
pub use voices::{CatalogError, CatalogSource, VoiceCatalog, VoiceItem};
