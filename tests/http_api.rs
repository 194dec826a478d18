//! HTTP surface checks that never reach the database.
//!
//! The pool is created lazily, so any request that touched storage would fail
//! with a 500 instead of the statuses asserted here.

use std::{sync::Arc, time::Duration};

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;
use wallet_service::{
    BalanceService, PgWalletStore, UpdateSerialization,
    app::{AppState, router},
};

fn app() -> axum::Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://postgres@127.0.0.1:1/unused")
        .unwrap();
    let store = PgWalletStore::new(pool, UpdateSerialization::PerRow, Duration::from_secs(1));
    router(AppState {
        service: BalanceService::new(Arc::new(store)),
    })
}

fn post(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn non_positive_amounts_are_bad_requests() {
    let id = Uuid::new_v4();

    for (path, body) in [
        ("deposit", r#"{"amount":0}"#),
        ("deposit", r#"{"amount":-5}"#),
        ("withdraw", r#"{"amount":0}"#),
        ("withdraw", r#"{"amount":-5}"#),
    ] {
        let response = app()
            .oneshot(post(&format!("/api/v1/wallets/{id}/{path}"), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{path} {body}");
    }
}

#[tokio::test]
async fn malformed_wallet_id_is_rejected() {
    let response = app()
        .oneshot(post("/api/v1/wallets/not-a-uuid/deposit", r#"{"amount":5}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_amount_is_rejected() {
    let id = Uuid::new_v4();
    let response = app()
        .oneshot(post(&format!("/api/v1/wallets/{id}/withdraw"), r#"{}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
