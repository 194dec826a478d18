//! Data models representing database entities and API bodies.

/// Wallet entity and balance request/response types
pub mod wallet;
