use crate::domain::seller::SellerSession;
use crate::domain::withdrawal::WithdrawalRequest;
use crate::http::reply::reply;
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::{Extension, Json};

pub async fn sales(State(state): State<AppState>, Extension(session): Extension<SellerSession>) -> Response {
    reply(StatusCode::OK, state.reports.sales(&session).await)
}

pub async fn customers(
    State(state): State<AppState>,
    Extension(session): Extension<SellerSession>,
) -> Response {
    reply(StatusCode::OK, state.reports.customers(&session).await)
}

pub async fn withdrawals(
    State(state): State<AppState>,
    Extension(session): Extension<SellerSession>,
) -> Response {
    reply(StatusCode::OK, state.reports.withdrawals(&session).await)
}

pub async fn request_withdrawal(
    State(state): State<AppState>,
    Extension(session): Extension<SellerSession>,
    Json(req): Json<WithdrawalRequest>,
) -> Response {
    reply(
        StatusCode::CREATED,
        state.reports.request_withdrawal(&session, req).await,
    )
}
