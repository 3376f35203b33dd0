use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::core::{RequestError, SynthesisError, TextError, WavError};

/// Error codes for structured error responses
pub mod error_codes {
    pub const MALFORMED_INPUT: &str = "malformed_input";
    pub const EMPTY_TEXT: &str = "empty_text";
    pub const TEXT_TOO_LONG: &str = "text_too_long";
    pub const UNSUPPORTED_VOICE: &str = "unsupported_voice";
    pub const MISSING_CREDENTIAL: &str = "missing_credential";
    pub const METHOD_NOT_ALLOWED: &str = "method_not_allowed";
    pub const UPSTREAM_FAILURE: &str = "upstream_failure";
    pub const ENCODING_FAILED: &str = "encoding_failed";
}

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Body is not valid JSON or has the wrong shape
    #[error("{0}")]
    MalformedInput(String),

    #[error("text is empty after normalization")]
    EmptyText,

    #[error("text too long: {len} > {max}")]
    TextTooLong { len: usize, max: usize },

    /// Requested voice is not in the catalog
    #[error("unsupported voice: {voice}, supported voices: [{}]", .supported.join(" "))]
    UnsupportedVoice {
        voice: String,
        supported: Vec<String>,
    },

    /// No usable API key in the request headers or configuration
    #[error("missing api key")]
    MissingCredential,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Upstream(#[from] SynthesisError),

    #[error("wav encode failed: {0}")]
    EncodingFailed(String),
}

impl AppError {
    /// Get the error code for structured error responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::MalformedInput(_) => error_codes::MALFORMED_INPUT,
            AppError::EmptyText => error_codes::EMPTY_TEXT,
            AppError::TextTooLong { .. } => error_codes::TEXT_TOO_LONG,
            AppError::UnsupportedVoice { .. } => error_codes::UNSUPPORTED_VOICE,
            AppError::MissingCredential => error_codes::MISSING_CREDENTIAL,
            AppError::MethodNotAllowed => error_codes::METHOD_NOT_ALLOWED,
            AppError::Upstream(_) => error_codes::UPSTREAM_FAILURE,
            AppError::EncodingFailed(_) => error_codes::ENCODING_FAILED,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MalformedInput(_)
            | AppError::EmptyText
            | AppError::TextTooLong { .. }
            | AppError::UnsupportedVoice { .. } => StatusCode::BAD_REQUEST,
            AppError::MissingCredential => StatusCode::UNAUTHORIZED,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::EncodingFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        match &self {
            AppError::Upstream(e) => tracing::error!("Upstream synthesis failure: {}", e),
            AppError::EncodingFailed(_) => tracing::error!("Encoding failure: {}", message),
            AppError::MissingCredential => tracing::warn!("Rejected request without api key"),
            _ => tracing::warn!("Bad request: {}", message),
        }

        let mut body = json!({
            "error": message,
            "code": self.error_code(),
            "status": status.as_u16()
        });
        if let AppError::UnsupportedVoice { supported, .. } = &self {
            body["supported_voices"] = json!(supported);
        }

        (status, Json(body)).into_response()
    }
}

impl From<RequestError> for AppError {
    fn from(err: RequestError) -> Self {
        AppError::MalformedInput(err.to_string())
    }
}

impl From<TextError> for AppError {
    fn from(err: TextError) -> Self {
        match err {
            TextError::Empty => AppError::EmptyText,
            TextError::TooLong { len, max } => AppError::TextTooLong { len, max },
        }
    }
}

impl From<WavError> for AppError {
    fn from(err: WavError) -> Self {
        AppError::EncodingFailed(err.to_string())
    }
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
