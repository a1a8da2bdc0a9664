use crate::service::seller_service::{unauthorized, SellerService};
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

fn bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub async fn require_seller(
    State(sellers): State<SellerService>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&request).map(ToString::to_string) else {
        let (status, body) = unauthorized();
        return (status, Json(body)).into_response();
    };

    match sellers.authenticate(&token).await {
        Ok(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Err((status, body)) => (status, Json(body)).into_response(),
    }
}
