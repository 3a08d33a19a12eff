// Engine client errors and their mapping onto the HTTP envelope

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::models::ApiResponse;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Non-2xx response from the Engine API.
    #[error("Engine API {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Engine API request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Engine API returned an unexpected payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid Engine API URL: {0}")]
    InvalidUrl(String),
    /// Error reported inside a streamed (200 OK) response, e.g. a failed image pull.
    #[error("Engine API stream error: {0}")]
    Stream(String),
}

impl EngineError {
    /// HTTP status reported by the Engine, if the failure was an API response.
    pub fn status(&self) -> Option<u16> {
        match self {
            EngineError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failure of an HTTP handler; rendered as `{ success: false, error }`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Engine(e) => e
                .status()
                .filter(|s| (400..500).contains(s))
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();
        tracing::error!(status = status.as_u16(), error = %message, "request failed");
        (status, Json(ApiResponse::<()>::failure(message))).into_response()
    }
}
