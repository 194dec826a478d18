//! Wallet HTTP handlers.
//!
//! - GET /api/v1/wallets/{id} - Full wallet row
//! - GET /api/v1/wallets/{id}/balance - Current balance
//! - POST /api/v1/wallets/{id}/deposit - Add money
//! - POST /api/v1/wallets/{id}/withdraw - Remove money

use crate::{
    app::AppState,
    error::WalletError,
    models::wallet::{AdjustmentRequest, BalanceResponse, Wallet},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

/// Get a wallet by ID.
///
/// # Response
///
/// - **Success (200 OK)**: `{ "id": "...", "balance": 10000, "updatedAt": "..." }`
/// - **Error (404)**: Wallet not found
pub async fn get_wallet(
    State(state): State<AppState>,
    Path(wallet_id): Path<Uuid>,
) -> Result<Json<Wallet>, WalletError> {
    let wallet = state.service.store().get_wallet(wallet_id).await?;
    Ok(Json(wallet))
}

/// Get the current balance of a wallet.
pub async fn get_balance(
    State(state): State<AppState>,
    Path(wallet_id): Path<Uuid>,
) -> Result<Json<BalanceResponse>, WalletError> {
    let balance = state.service.get_balance(wallet_id).await?;

    Ok(Json(BalanceResponse { wallet_id, balance }))
}

/// Deposit into a wallet.
///
/// # Request Body
///
/// ```json
/// { "amount": 2500 }
/// ```
///
/// # Response
///
/// - **Success (204 No Content)**: balance durably updated
/// - **Error (400)**: amount is not positive
/// - **Error (404)**: wallet not found
pub async fn deposit(
    State(state): State<AppState>,
    Path(wallet_id): Path<Uuid>,
    Json(request): Json<AdjustmentRequest>,
) -> Result<StatusCode, WalletError> {
    state.service.deposit(wallet_id, request.amount).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Withdraw from a wallet.
///
/// # Response
///
/// - **Success (204 No Content)**: balance durably updated
/// - **Error (400)**: amount is not positive
/// - **Error (404)**: wallet not found
/// - **Error (422)**: insufficient funds, balance unchanged
pub async fn withdraw(
    State(state): State<AppState>,
    Path(wallet_id): Path<Uuid>,
    Json(request): Json<AdjustmentRequest>,
) -> Result<StatusCode, WalletError> {
    state.service.withdraw(wallet_id, request.amount).await?;
    Ok(StatusCode::NO_CONTENT)
}
