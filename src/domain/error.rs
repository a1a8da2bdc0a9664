use axum::http::StatusCode;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorPayload,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

pub type ApiError = (StatusCode, ErrorEnvelope);

pub fn err(code: &str, message: &str) -> ErrorEnvelope {
    ErrorEnvelope {
        error: ErrorPayload {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
        },
    }
}

pub fn api_err(status: StatusCode, code: &str, message: &str) -> ApiError {
    (status, err(code, message))
}

pub fn internal(e: anyhow::Error) -> ApiError {
    tracing::error!("internal error: {:#}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        err("INTERNAL_ERROR", "internal error"),
    )
}

pub fn not_found(what: &str) -> ApiError {
    api_err(StatusCode::NOT_FOUND, "NOT_FOUND", &format!("{} not found", what))
}
