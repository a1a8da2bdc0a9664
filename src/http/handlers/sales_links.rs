use crate::domain::product::CreateSalesLinkRequest;
use crate::domain::seller::SellerSession;
use crate::http::reply::reply;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::{Extension, Json};
use uuid::Uuid;

pub async fn list_links(
    State(state): State<AppState>,
    Extension(session): Extension<SellerSession>,
    Path(product_id): Path<Uuid>,
) -> Response {
    reply(StatusCode::OK, state.catalog.list_links(&session, product_id).await)
}

pub async fn create_link(
    State(state): State<AppState>,
    Extension(session): Extension<SellerSession>,
    Path(product_id): Path<Uuid>,
    Json(req): Json<CreateSalesLinkRequest>,
) -> Response {
    reply(
        StatusCode::CREATED,
        state.catalog.create_link(&session, product_id, req).await,
    )
}

pub async fn delete_link(
    State(state): State<AppState>,
    Extension(session): Extension<SellerSession>,
    Path((product_id, link_id)): Path<(Uuid, Uuid)>,
) -> Response {
    reply(
        StatusCode::OK,
        state.catalog.delete_link(&session, product_id, link_id).await,
    )
}
