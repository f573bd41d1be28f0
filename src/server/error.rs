//! HTTP error responses
//!
//! Every handler returns `Result<T, ApiError>`, which renders as a JSON body
//! `{"error": "<message>"}` with a status picked from the underlying
//! `ReflogError`. Internal failures are logged with their full chain; the
//! client only sees the outermost context message.

use crate::error::ReflogError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors surfaced by the HTTP layer
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed body or invalid request state
    #[error("{0}")]
    BadRequest(String),

    /// Missing or unknown bearer token
    #[error("unauthorized")]
    Unauthorized,

    /// Session missing or not owned by the caller
    #[error("{0}")]
    NotFound(String),

    /// Anything else; the message is safe to show
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Status code this error renders with
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        match e.downcast_ref::<ReflogError>() {
            Some(ReflogError::InvalidInput(m)) => ApiError::BadRequest(m.clone()),
            Some(ReflogError::Unauthenticated) => ApiError::Unauthorized,
            Some(ReflogError::SessionNotFound(_)) => {
                ApiError::NotFound("session not found".to_string())
            }
            Some(ReflogError::SessionClosed(_)) => {
                ApiError::BadRequest("session is already closed".to_string())
            }
            _ => {
                error!(error = ?e, "request failed");
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
