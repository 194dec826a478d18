//! HTTP request handlers (route handlers).
//!
//! Handlers extract path and body data, call the balance service, and map
//! results onto HTTP responses. Errors convert through `WalletError`.

/// Health check endpoint
pub mod health;
/// Wallet balance endpoints
pub mod wallets;
