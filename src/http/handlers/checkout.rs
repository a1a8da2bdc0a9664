use crate::checkout::card_input::CardInput;
use crate::checkout::session::OpenSessionRequest;
use crate::domain::product::CheckoutLookup;
use crate::http::reply::reply;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    pub amount: Decimal,
    pub installments: Option<u8>,
}

pub async fn quote(State(state): State<AppState>, Query(q): Query<QuoteQuery>) -> Response {
    reply(StatusCode::OK, state.checkout.quote(q.amount, q.installments.unwrap_or(1)))
}

pub async fn preview_link(State(state): State<AppState>, Path(token): Path<String>) -> Response {
    reply(StatusCode::OK, state.checkout.preview(CheckoutLookup::LinkToken(token)).await)
}

pub async fn preview_slug(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    reply(StatusCode::OK, state.checkout.preview(CheckoutLookup::Slug(slug)).await)
}

pub async fn open_session(
    State(state): State<AppState>,
    Json(req): Json<OpenSessionRequest>,
) -> Response {
    reply(StatusCode::CREATED, state.checkout.open(req).await)
}

pub async fn get_session(State(state): State<AppState>, Path(session_id): Path<Uuid>) -> Response {
    reply(StatusCode::OK, state.checkout.get(session_id).await)
}

pub async fn confirm_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(card): Json<CardInput>,
) -> Response {
    reply(StatusCode::OK, state.checkout.confirm(session_id, card).await)
}

pub async fn abandon_session(State(state): State<AppState>, Path(session_id): Path<Uuid>) -> Response {
    match state.checkout.abandon(session_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err((status, body)) => (status, Json(body)).into_response(),
    }
}
