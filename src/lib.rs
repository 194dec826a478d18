//! Wallet balance service.
//!
//! Maintains per-wallet balances in PostgreSQL and applies deposits and
//! withdrawals so that a balance never goes negative and concurrent updates
//! to the same wallet never lose each other's effects.
//!
//! # Architecture
//!
//! - `service`: validates intents and turns them into signed adjustments
//! - `store`: locked read-modify-write against the `wallets` table
//! - `app` / `handlers`: thin HTTP adapter (Axum)

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod service;
pub mod store;

pub use error::WalletError;
pub use service::BalanceService;
pub use store::{MemoryWalletStore, PgWalletStore, UpdateSerialization, WalletStore};
