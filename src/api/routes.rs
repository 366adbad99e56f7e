//! API route handlers.
//!
//! Thin codec layer: decode JSON, call the service, encode JSON. Every
//! service error maps to a 400 with the error message; error kinds are
//! not distinguished at the status level.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::service::BetService;
use crate::types::LedgerError;

pub type AppState = Arc<BetService>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PlaceBetRequest {
    pub user_id: String,
    pub event_id: String,
    pub odds: f64,
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct SettleBetRequest {
    pub event_id: String,
    /// "win" or "lose".
    pub result: String,
}

#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaceBetResponse {
    pub bet_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettleBetResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceResponse {
    pub balance: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(err: LedgerError) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse { error: err.to_string() }),
    )
}

// Axum's bare `Json` extractor answers 422 for a well-formed body with a
// missing or ill-typed field (and 415 for a missing content type). The
// contract is 400 for every bad body, so handlers take the rejection and
// map it themselves.
fn invalid_body(rejection: JsonRejection) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: format!("invalid request body: {rejection}"),
        }),
    )
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// POST /api/bets/place
pub async fn place_bet(
    State(state): State<AppState>,
    payload: Result<Json<PlaceBetRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PlaceBetResponse>), ApiError> {
    let Json(req) = payload.map_err(invalid_body)?;
    let bet_id = state
        .place_bet(&req.user_id, &req.event_id, req.odds, req.amount)
        .await
        .map_err(bad_request)?;

    Ok((StatusCode::CREATED, Json(PlaceBetResponse { bet_id })))
}

/// POST /api/bets/settle
pub async fn settle_bets(
    State(state): State<AppState>,
    payload: Result<Json<SettleBetRequest>, JsonRejection>,
) -> Result<Json<SettleBetResponse>, ApiError> {
    let Json(req) = payload.map_err(invalid_body)?;
    state
        .settle_event(&req.event_id, &req.result)
        .await
        .map_err(bad_request)?;

    Ok(Json(SettleBetResponse {
        message: format!("event {} settled", req.event_id),
    }))
}

/// GET /api/balance?user_id=...
pub async fn get_balance(
    State(state): State<AppState>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let user_id = query.user_id.ok_or_else(|| {
        bad_request(LedgerError::InvalidInput("missing user_id parameter".into()))
    })?;

    let balance = state.balance(&user_id).await.map_err(bad_request)?;
    Ok(Json(BalanceResponse { balance }))
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
