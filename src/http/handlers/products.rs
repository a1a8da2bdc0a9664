use crate::domain::product::{CreateProductRequest, UpdateProductRequest};
use crate::domain::seller::SellerSession;
use crate::http::reply::reply;
use crate::service::catalog_service::InviteCollaboratorRequest;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::{Extension, Json};
use uuid::Uuid;

pub async fn list_products(
    State(state): State<AppState>,
    Extension(session): Extension<SellerSession>,
) -> Response {
    reply(StatusCode::OK, state.catalog.list_products(&session).await)
}

pub async fn create_product(
    State(state): State<AppState>,
    Extension(session): Extension<SellerSession>,
    Json(req): Json<CreateProductRequest>,
) -> Response {
    reply(StatusCode::CREATED, state.catalog.create_product(&session, req).await)
}

pub async fn update_product(
    State(state): State<AppState>,
    Extension(session): Extension<SellerSession>,
    Path(product_id): Path<Uuid>,
    Json(req): Json<UpdateProductRequest>,
) -> Response {
    reply(
        StatusCode::OK,
        state.catalog.update_product(&session, product_id, req).await,
    )
}

pub async fn delete_product(
    State(state): State<AppState>,
    Extension(session): Extension<SellerSession>,
    Path(product_id): Path<Uuid>,
) -> Response {
    reply(StatusCode::OK, state.catalog.delete_product(&session, product_id).await)
}

pub async fn invite_collaborator(
    State(state): State<AppState>,
    Extension(session): Extension<SellerSession>,
    Path(product_id): Path<Uuid>,
    Json(req): Json<InviteCollaboratorRequest>,
) -> Response {
    reply(
        StatusCode::CREATED,
        state.catalog.invite_collaborator(&session, product_id, req).await,
    )
}
