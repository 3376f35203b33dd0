use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::auth::resolve_api_key;
use crate::core::audio::encode_wav;
use crate::core::request::parse_request;
use crate::core::text::normalize_text;
use crate::core::tts::SpeechInput;
use crate::errors::app_error::{AppError, AppResult};
use crate::state::AppState;

/// Handler for `POST /tts`
///
/// Parses and normalizes the text, checks the voice against the catalog,
/// resolves the caller's API key and runs one Gemini Live exchange. The
/// collected PCM is returned as a WAV file.
pub async fn synthesize(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Response> {
    let request = parse_request(&body)?;
    let text = normalize_text(&request.text)?;

    let voice = match request.voice.as_deref().map(str::trim) {
        Some(voice) if !voice.is_empty() => Some(resolve_voice(&state, voice)?),
        _ => None,
    };
    let lang = request
        .lang
        .as_deref()
        .map(str::trim)
        .filter(|lang| !lang.is_empty());

    // Checked after validation so bad input never reaches the provider
    let api_key = resolve_api_key(&headers, state.config.fallback_api_key())
        .ok_or(AppError::MissingCredential)?;

    info!(
        voice = voice.as_deref().unwrap_or("default"),
        lang = lang.unwrap_or("auto"),
        text_len = text.len(),
        "TTS request accepted"
    );

    let audio = state
        .synthesizer
        .synthesize(
            SpeechInput {
                text: &text,
                voice: voice.as_deref(),
                lang,
            },
            &api_key,
        )
        .await?;

    let wav = encode_wav(audio.as_bytes())?;
    info!(
        pcm_bytes = audio.len(),
        wav_bytes = wav.len(),
        "TTS response ready"
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("audio/wav")),
            (header::CONTENT_LENGTH, HeaderValue::from(wav.len())),
        ],
        wav,
    )
        .into_response())
}

/// Lowercased catalog name for `voice`, or the unsupported-voice error
fn resolve_voice(state: &AppState, voice: &str) -> AppResult<String> {
    match state.voices.canonical_name(voice) {
        Some(name) => Ok(name.to_string()),
        None => Err(AppError::UnsupportedVoice {
            voice: voice.to_lowercase(),
            supported: state.voices.names().into_iter().map(String::from).collect(),
        }),
    }
}

/// Fallback for methods a route does not serve
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
