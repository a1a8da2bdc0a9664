use crate::service::seller_service::unauthorized;
use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

pub const INTERNAL_API_KEY_HEADER: &str = "X-Internal-Api-Key";

pub async fn require_internal_api_key(
    State(expected): State<String>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(INTERNAL_API_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");

    if expected.is_empty() || provided != expected {
        let (status, body) = unauthorized();
        return (status, Json(body)).into_response();
    }

    next.run(request).await
}
