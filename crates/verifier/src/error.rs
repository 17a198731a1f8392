use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

pub type Result<T> = std::result::Result<T, VerifierError>;

#[derive(Error, Debug)]
pub enum VerifierError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("LLM API error: {body}")]
    UpstreamError { status: u16, body: String },

    #[error("GEMINI_API_KEY not configured")]
    MissingApiKey,

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),
}

impl IntoResponse for VerifierError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            Self::UpstreamError { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            Self::RequestError(_) | Self::ParseError(_) | Self::IoError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status_code.is_server_error() {
            tracing::error!("Verification failed: {}", self);
        }

        (status_code, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
