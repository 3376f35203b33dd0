//! WebSocket message types for the Gemini Live API.
//!
//! - **Outgoing messages**: [`ClientMessage::Setup`] configures the session
//!   (model, audio modality, system instruction, voice) and
//!   [`ClientMessage::ClientContent`] carries the user turn.
//! - **Incoming messages**: [`ServerMessage`] with optional `setupComplete`
//!   and `serverContent` parts. Audio arrives as base64 `inlineData` inside
//!   `serverContent.modelTurn.parts`.
//!
//! The server may deliver JSON in either text or binary frames; both are
//! parsed with [`ServerMessage::parse`].

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};

use super::config::{AUDIO_MODALITY, SYSTEM_INSTRUCTION, language_instruction};

// =============================================================================
// Shared content types
// =============================================================================

/// A turn or instruction made of ordered parts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn from_text(text: impl Into<String>, role: Option<&str>) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part::text(text)],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Blob>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }
}

/// Inline binary payload, base64 encoded on the wire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Blob {
    pub mime_type: String,
    pub data: String,
}

impl Blob {
    /// Decode the base64 payload
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(self.data.as_bytes())
    }
}

// =============================================================================
// Outgoing Messages (Client to Server)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    pub voice_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    pub voice_config: VoiceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<SpeechConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Setup {
    pub model: String,
    pub generation_config: GenerationConfig,
    pub system_instruction: Content,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientContent {
    pub turns: Vec<Content>,
    pub turn_complete: bool,
}

/// Messages sent from the gateway to the provider
///
/// Serialized externally tagged, e.g. `{"setup": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ClientMessage {
    Setup(Setup),
    ClientContent(ClientContent),
}

impl ClientMessage {
    /// Session setup for verbatim speech synthesis.
    ///
    /// `lang` adds a pronunciation hint to the system instruction and `voice`
    /// selects a prebuilt voice.
    pub fn setup(model: &str, voice: Option<&str>, lang: Option<&str>) -> Self {
        let mut parts = vec![Part::text(SYSTEM_INSTRUCTION)];
        if let Some(lang) = lang {
            parts.push(Part::text(language_instruction(lang)));
        }

        let speech_config = voice.map(|voice| SpeechConfig {
            voice_config: VoiceConfig {
                prebuilt_voice_config: PrebuiltVoiceConfig {
                    voice_name: voice.to_string(),
                },
            },
        });

        ClientMessage::Setup(Setup {
            model: model.to_string(),
            generation_config: GenerationConfig {
                response_modalities: vec![AUDIO_MODALITY.to_string()],
                temperature: 0.0,
                speech_config,
            },
            system_instruction: Content {
                role: None,
                parts,
            },
        })
    }

    /// A single complete user turn carrying `text`
    pub fn user_turn(text: &str) -> Self {
        ClientMessage::ClientContent(ClientContent {
            turns: vec![Content::from_text(text, Some("user"))],
            turn_complete: true,
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// =============================================================================
// Incoming Messages (Server to Client)
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerContent {
    pub model_turn: Option<Content>,
    pub turn_complete: bool,
    pub generation_complete: bool,
    pub interrupted: bool,
}

impl ServerContent {
    /// Inline audio payloads of the model turn, in part order
    pub fn audio_blobs(&self) -> impl Iterator<Item = &Blob> {
        self.model_turn
            .iter()
            .flat_map(|turn| turn.parts.iter())
            .filter_map(|part| part.inline_data.as_ref())
            .filter(|blob| !blob.data.is_empty())
    }

    /// Whether this message ends the model's response
    pub fn is_final(&self) -> bool {
        self.turn_complete || self.generation_complete
    }
}

/// Messages received from the provider
///
/// Only the fields the gateway acts on are modelled; anything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerMessage {
    pub setup_complete: Option<serde_json::Value>,
    pub server_content: Option<ServerContent>,
}

impl ServerMessage {
    pub fn parse(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }
}

#[cfg(test)]
impl ServerMessage {
    /// Message carrying one inline audio part per chunk
    pub(crate) fn audio(chunks: &[&[u8]], mime_type: &str) -> Self {
        let parts = chunks
            .iter()
            .map(|chunk| Part {
                text: None,
                inline_data: Some(Blob {
                    mime_type: mime_type.to_string(),
                    data: BASE64.encode(chunk),
                }),
            })
            .collect();
        Self {
            setup_complete: None,
            server_content: Some(ServerContent {
                model_turn: Some(Content { role: None, parts }),
                ..Default::default()
            }),
        }
    }

    pub(crate) fn turn_complete() -> Self {
        Self {
            setup_complete: None,
            server_content: Some(ServerContent {
                turn_complete: true,
                ..Default::default()
            }),
        }
    }

    pub(crate) fn generation_complete() -> Self {
        Self {
            setup_complete: None,
            server_content: Some(ServerContent {
                generation_complete: true,
                ..Default::default()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_setup_serialization_minimal() {
        let msg = ClientMessage::setup("models/test", None, None);
        let value: Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();

        assert_eq!(
            value,
            json!({
                "setup": {
                    "model": "models/test",
                    "generationConfig": {
                        "responseModalities": ["AUDIO"],
                        "temperature": 0.0
                    },
                    "systemInstruction": {
                        "parts": [{"text": SYSTEM_INSTRUCTION}]
                    }
                }
            })
        );
    }

    #[test]
    fn test_setup_with_voice_and_language() {
        let msg = ClientMessage::setup("models/test", Some("kore"), Some("zh-CN"));
        let value: Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        let setup = &value["setup"];

        assert_eq!(
            setup["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
            "kore"
        );
        let parts = setup["systemInstruction"]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(
            parts[1]["text"],
            "Respond in zh-CN language with appropriate pronunciation."
        );
    }

    #[test]
    fn test_user_turn_serialization() {
        let msg = ClientMessage::user_turn("Line1\nLine2");
        let value: Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();

        assert_eq!(
            value,
            json!({
                "clientContent": {
                    "turns": [{"role": "user", "parts": [{"text": "Line1\nLine2"}]}],
                    "turnComplete": true
                }
            })
        );
    }

    #[test]
    fn test_parse_setup_complete() {
        let msg = ServerMessage::parse(br#"{"setupComplete": {}}"#).unwrap();
        assert!(msg.setup_complete.is_some());
        assert!(msg.server_content.is_none());
    }

    #[test]
    fn test_parse_audio_content() {
        let raw = br#"{
            "serverContent": {
                "modelTurn": {
                    "parts": [
                        {"inlineData": {"mimeType": "audio/pcm;rate=24000", "data": "AQID"}},
                        {"text": "ignored"},
                        {"inlineData": {"mimeType": "audio/pcm;rate=24000", "data": "BAU="}}
                    ]
                }
            }
        }"#;
        let msg = ServerMessage::parse(raw).unwrap();
        let content = msg.server_content.unwrap();

        let decoded: Vec<Vec<u8>> = content.audio_blobs().map(|b| b.decode().unwrap()).collect();
        assert_eq!(decoded, vec![vec![1, 2, 3], vec![4, 5]]);
        assert!(!content.is_final());
    }

    #[test]
    fn test_parse_completion_flags() {
        let msg = ServerMessage::parse(br#"{"serverContent": {"turnComplete": true}}"#).unwrap();
        assert!(msg.server_content.unwrap().is_final());

        let msg =
            ServerMessage::parse(br#"{"serverContent": {"generationComplete": true}}"#).unwrap();
        assert!(msg.server_content.unwrap().is_final());
    }

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let msg = ServerMessage::parse(br#"{"usageMetadata": {"totalTokenCount": 3}}"#).unwrap();
        assert_eq!(msg, ServerMessage::default());
    }

    #[test]
    fn test_audio_constructor_matches_wire_format() {
        let msg = ServerMessage::audio(&[&[1, 2, 3]], "audio/pcm");
        let blobs: Vec<&Blob> = msg.server_content.as_ref().unwrap().audio_blobs().collect();
        assert_eq!(blobs[0].data, "AQID");
    }

    #[test]
    fn test_completion_constructors_match_wire_format() {
        let turn = ServerMessage::parse(br#"{"serverContent": {"turnComplete": true}}"#).unwrap();
        assert_eq!(turn, ServerMessage::turn_complete());

        let generation =
            ServerMessage::parse(br#"{"serverContent": {"generationComplete": true}}"#).unwrap();
        assert_eq!(generation, ServerMessage::generation_complete());
    }
}
