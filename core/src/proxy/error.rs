//! Error types for the proxy handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Invalid target url: {0}")]
    InvalidTarget(String),

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            ProxyError::InvalidTarget(_) => {
                let body = ErrorResponse {
                    error: ErrorBody {
                        code: "INVALID_TARGET_URL",
                        message,
                    },
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ProxyError::Upstream(e) => {
                tracing::error!(error = %e.without_url(), "Upstream request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

pub type ProxyResult<T> = Result<T, ProxyError>;
