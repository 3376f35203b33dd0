//! Decoding of `/tts` request bodies.
//!
//! Clients send `text` either as a single string or as an array of strings
//! (one entry per line). `voice` and `lang` are optional.

use serde_json::{Map, Value};

/// Canonical synthesis request decoded from a request body
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SynthesisRequest {
    /// Text to speak, not yet normalized
    pub text: String,
    /// Requested voice identifier, matched case-insensitively
    pub voice: Option<String>,
    /// Free-form language tag used as a pronunciation hint
    pub lang: Option<String>,
}

/// Request decoding errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("invalid json: {0}")]
    Malformed(String),

    #[error("text is required")]
    MissingText,

    #[error("invalid text: {0}")]
    InvalidText(String),
}

/// Decode a request body into a [`SynthesisRequest`].
pub fn parse_request(body: &[u8]) -> Result<SynthesisRequest, RequestError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| RequestError::Malformed(e.to_string()))?;

    let Value::Object(fields) = value else {
        return Err(RequestError::Malformed(
            "request body must be a JSON object".to_string(),
        ));
    };

    let voice = optional_string(&fields, "voice")?;
    let lang = optional_string(&fields, "lang")?;

    let text = match fields.get("text") {
        None | Some(Value::Null) => return Err(RequestError::MissingText),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(items)) => join_lines(items)?,
        Some(_) => {
            return Err(RequestError::InvalidText(
                "text must be a string or an array of strings".to_string(),
            ));
        }
    };

    Ok(SynthesisRequest { text, voice, lang })
}

fn optional_string(fields: &Map<String, Value>, key: &str) -> Result<Option<String>, RequestError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(RequestError::Malformed(format!("{key} must be a string"))),
    }
}

fn join_lines(items: &[Value]) -> Result<String, RequestError> {
    let parts = items
        .iter()
        .map(|item| match item {
            Value::String(line) => Ok(line.as_str()),
            _ => Err(RequestError::InvalidText(
                "text array must contain strings only".to_string(),
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(parts.join("\n"))
}
