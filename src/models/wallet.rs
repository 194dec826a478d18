//! Wallet data models and API request/response types.
//!
//! This module defines:
//! - `Wallet`: database entity for a single balance
//! - `AdjustmentRequest`: request body for deposits and withdrawals
//! - `BalanceResponse`: response body for balance reads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a wallet row from the database.
///
/// # Database Table
///
/// Maps to the `wallets` table. Rows are provisioned elsewhere; this service
/// only reads and adjusts them.
///
/// # Balance Storage
///
/// Balances are `i64` in the smallest currency unit and never negative
/// (enforced by the store and by a `CHECK` constraint).
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: Uuid,

    pub balance: i64,

    /// Timestamp of the last successful balance update, set by the store.
    pub updated_at: DateTime<Utc>,
}

/// Request body for deposit and withdrawal endpoints.
///
/// # JSON Example
///
/// ```json
/// { "amount": 2500 }
/// ```
///
/// The amount must be positive; the direction comes from the endpoint.
#[derive(Debug, Deserialize)]
pub struct AdjustmentRequest {
    pub amount: i64,
}

/// Response body for `GET /api/v1/wallets/{id}/balance`.
///
/// # JSON Example
///
/// ```json
/// {
///   "walletId": "550e8400-e29b-41d4-a716-446655440000",
///   "balance": 10000
/// }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub wallet_id: Uuid,
    pub balance: i64,
}
