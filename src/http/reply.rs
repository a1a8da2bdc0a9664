use crate::domain::error::ApiError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

pub fn reply<T: Serialize>(ok: StatusCode, result: Result<T, ApiError>) -> Response {
    match result {
        Ok(body) => (ok, Json(body)).into_response(),
        Err((status, body)) => (status, Json(body)).into_response(),
    }
}
