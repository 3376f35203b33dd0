use axum::{
    Router,
    body::Body,
    http::{Method, StatusCode, header},
    middleware::map_response,
    response::Response,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{api, tts, voices};
use crate::state::AppState;
use std::sync::Arc;

pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/health",
            get(api::health_check).fallback(tts::method_not_allowed),
        )
        .route(
            "/voices",
            get(voices::list_voices).fallback(tts::method_not_allowed),
        )
        .route(
            "/tts",
            post(tts::synthesize).fallback(tts::method_not_allowed),
        )
        .layer(cors_layer())
        // Outside the CORS layer so its preflight answers are remapped too
        .layer(map_response(options_no_content))
        .layer(TraceLayer::new_for_http())
}

/// Browsers may call the gateway from any origin
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::HeaderName::from_static("x-api-key"),
            header::HeaderName::from_static("x-gemini-api-key"),
        ])
}

/// Successful `OPTIONS` answers are `204` with no body
async fn options_no_content(method: Method, mut response: Response) -> Response {
    if method == Method::OPTIONS && response.status().is_success() {
        *response.status_mut() = StatusCode::NO_CONTENT;
        *response.body_mut() = Body::empty();
    }
    response
}
