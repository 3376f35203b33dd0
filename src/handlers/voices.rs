use axum::{extract::State, response::Json};
use std::sync::Arc;

use crate::core::voices::VoiceItem;
use crate::state::AppState;

/// Handler for `GET /voices`
///
/// Lists the catalog sorted by name.
pub async fn list_voices(State(state): State<Arc<AppState>>) -> Json<Vec<VoiceItem>> {
    Json(state.voices.items())
}
