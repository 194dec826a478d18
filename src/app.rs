//! Router assembly and shared handler state.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{handlers, service::BalanceService, store::PgWalletStore};

/// State shared with every handler via `State` extraction.
#[derive(Clone)]
pub struct AppState {
    pub service: BalanceService<PgWalletStore>,
}

/// Build the HTTP router with all routes and middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/v1/wallets/{id}",
            get(handlers::wallets::get_wallet),
        )
        .route(
            "/api/v1/wallets/{id}/balance",
            get(handlers::wallets::get_balance),
        )
        .route(
            "/api/v1/wallets/{id}/deposit",
            post(handlers::wallets::deposit),
        )
        .route(
            "/api/v1/wallets/{id}/withdraw",
            post(handlers::wallets::withdraw),
        )
        // Request/response tracing
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
