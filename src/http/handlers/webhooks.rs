use crate::domain::seller::SellerSession;
use crate::http::reply::reply;
use crate::service::gateway_events::SIGNATURE_HEADER;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::Extension;
use uuid::Uuid;

pub async fn gateway_webhook(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let signature = headers.get(SIGNATURE_HEADER).and_then(|h| h.to_str().ok());
    reply(
        StatusCode::OK,
        state.gateway_events.handle_webhook(signature, &body).await,
    )
}

pub async fn sync_order(
    State(state): State<AppState>,
    Extension(session): Extension<SellerSession>,
    Path(order_id): Path<Uuid>,
) -> Response {
    reply(
        StatusCode::OK,
        state.gateway_events.sync_order(session.seller_id(), order_id).await,
    )
}
