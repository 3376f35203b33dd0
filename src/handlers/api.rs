use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::state::AppState;

const READY_MESSAGE: &str = "Voxlattice TTS service ready with custom voice support";

/// Body of `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: String,
    /// Voice name to description
    pub voices: BTreeMap<String, String>,
    pub message: &'static str,
}

/// Health check handler
///
/// Reports the configured model and the loaded voice catalog.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        model: state.config.model().to_string(),
        voices: state.voices.voices().clone(),
        message: READY_MESSAGE,
    })
}
