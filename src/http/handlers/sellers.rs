use crate::domain::seller::{KycDecisionRequest, RegisterSellerRequest, SellerSession, VerifyEmailRequest};
use crate::http::reply::reply;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use uuid::Uuid;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterSellerRequest>,
) -> Response {
    reply(StatusCode::CREATED, state.sellers.register(req).await)
}

pub async fn me(Extension(session): Extension<SellerSession>) -> Response {
    (StatusCode::OK, Json(session.seller)).into_response()
}

pub async fn verify_email(
    State(state): State<AppState>,
    Extension(session): Extension<SellerSession>,
    Json(req): Json<VerifyEmailRequest>,
) -> Response {
    reply(StatusCode::OK, state.sellers.verify_email(&session, &req.code).await)
}

pub async fn set_kyc_status(
    State(state): State<AppState>,
    Path(seller_id): Path<Uuid>,
    Json(req): Json<KycDecisionRequest>,
) -> Response {
    reply(StatusCode::OK, state.sellers.set_kyc_status(seller_id, req.status).await)
}
