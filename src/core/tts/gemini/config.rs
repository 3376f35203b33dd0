//! Fixed parameters of the Gemini Live text-to-speech exchange.

use std::time::Duration;

/// Bidirectional streaming endpoint of the Gemini Live API
pub const GEMINI_LIVE_URL: &str = "wss://generativelanguage.googleapis.com/ws/google.ai.generativelanguage.v1beta.GenerativeService.BidiGenerateContent";

/// Model used when `GEMINI_MODEL` is not set
pub const DEFAULT_MODEL: &str = "models/gemini-2.5-flash-native-audio-preview-12-2025";

/// Upper bound on a whole synthesis exchange
pub const SYNTHESIS_TIMEOUT: Duration = Duration::from_secs(60);

/// Instruction that turns the conversational model into a reader
pub const SYSTEM_INSTRUCTION: &str = "You are a TTS engine. Repeat the user's text verbatim. Do not add, remove, translate, or rephrase. Output audio only.";

/// Response modality requested from the model
pub const AUDIO_MODALITY: &str = "AUDIO";

/// Pronunciation hint appended to the system instruction when a language is given
pub fn language_instruction(lang: &str) -> String {
    format!("Respond in {lang} language with appropriate pronunciation.")
}
