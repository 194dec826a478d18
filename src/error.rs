//! Error types and HTTP error response handling.
//!
//! Every balance operation fails with one of the `WalletError` kinds below.
//! A returned error always means the stored balance is exactly what it was
//! before the call.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;

/// Closed set of failures for wallet balance operations.
///
/// # Error Categories
///
/// - **Validation**: `InvalidAmount`, raised before storage is touched, and
///   `BalanceOverflow`
/// - **Resource**: `WalletNotFound`
/// - **Invariant**: `InsufficientFunds`, the adjustment was rolled back
/// - **Storage**: `StoreUnavailable` and `TimedOut`
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// The amount was zero or negative.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("amount must be greater than zero")]
    InvalidAmount,

    /// No wallet row exists for the identifier.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("wallet {0} not found")]
    WalletNotFound(Uuid),

    /// Applying the adjustment would overflow the balance.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("adjustment {amount} would overflow balance {balance} of wallet {wallet_id}")]
    BalanceOverflow {
        wallet_id: Uuid,
        balance: i64,
        amount: i64,
    },

    /// Applying the adjustment would make the balance negative.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    #[error("insufficient funds: wallet {wallet_id} has {balance}, adjustment {amount}")]
    InsufficientFunds {
        wallet_id: Uuid,
        balance: i64,
        amount: i64,
    },

    /// Connection, query or commit failure in the underlying store.
    ///
    /// Returns HTTP 500 Internal Server Error (details hidden from the client).
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),

    /// The update could not lock and stage its write before the deadline and
    /// was rolled back.
    ///
    /// Returns HTTP 503 Service Unavailable.
    #[error("balance update timed out")]
    TimedOut,
}

impl WalletError {
    /// Stable machine-readable code used in error response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            WalletError::InvalidAmount => "invalid_amount",
            WalletError::BalanceOverflow { .. } => "balance_overflow",
            WalletError::WalletNotFound(_) => "wallet_not_found",
            WalletError::InsufficientFunds { .. } => "insufficient_funds",
            WalletError::StoreUnavailable(_) => "internal_error",
            WalletError::TimedOut => "timed_out",
        }
    }
}

/// Convert WalletError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "insufficient_funds",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
impl IntoResponse for WalletError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            WalletError::InvalidAmount => (StatusCode::BAD_REQUEST, self.to_string()),
            WalletError::BalanceOverflow { .. } => (StatusCode::BAD_REQUEST, self.to_string()),
            WalletError::WalletNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            WalletError::InsufficientFunds { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "insufficient funds".to_string())
            }
            WalletError::TimedOut => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            WalletError::StoreUnavailable(ref e) => {
                tracing::error!("store failure: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
