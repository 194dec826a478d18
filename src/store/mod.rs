//! Balance storage.
//!
//! The store owns the read-modify-write sequence against a wallet row:
//!
//! 1. Begin a transaction
//! 2. Read the balance with a row lock (`SELECT ... FOR UPDATE`)
//! 3. Reject unknown wallets and adjustments that would go negative
//! 4. Write the new balance and `updated_at`
//! 5. Commit (or roll back on any error)
//!
//! # Atomicity Guarantees
//!
//! Either the whole sequence commits or nothing is visible. Dropping an
//! update before its commit rolls its transaction back. Deadlines apply to
//! lock waits and the read-check-write, never to the commit itself.

use async_trait::async_trait;
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::error::WalletError;

pub mod memory;
pub mod postgres;

pub use memory::MemoryWalletStore;
pub use postgres::PgWalletStore;

/// Storage capability the balance service depends on.
#[async_trait]
pub trait WalletStore: Send + Sync {
    /// Point-in-time read of the current balance.
    ///
    /// # Errors
    ///
    /// - `WalletNotFound`: no row for the identifier
    /// - `StoreUnavailable`: storage failure
    async fn get_balance(&self, wallet_id: Uuid) -> Result<i64, WalletError>;

    /// Atomically apply a signed adjustment to the balance.
    ///
    /// Positive amounts credit, negative amounts debit, zero is accepted.
    ///
    /// # Errors
    ///
    /// - `WalletNotFound`: no row for the identifier
    /// - `InsufficientFunds`: the balance would become negative
    /// - `BalanceOverflow`: the new balance would overflow `i64`
    /// - `StoreUnavailable` / `TimedOut`: storage failure, nothing applied
    async fn update_balance(&self, wallet_id: Uuid, amount: i64) -> Result<(), WalletError>;
}

/// How balance updates are serialized inside the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateSerialization {
    /// Only the row lock serializes updates, and only for the same wallet.
    #[default]
    PerRow,

    /// Every update in the process additionally takes one shared mutex, so
    /// unrelated wallets are updated one at a time too. Throughput is bounded
    /// by a single in-flight update.
    Global,
}

/// Process-wide section entered before each update when
/// `UpdateSerialization::Global` is selected.
#[derive(Debug, Default)]
pub(crate) struct UpdateGate {
    global: Option<Mutex<()>>,
}

impl UpdateGate {
    pub(crate) fn new(serialization: UpdateSerialization) -> Self {
        let global = match serialization {
            UpdateSerialization::PerRow => None,
            UpdateSerialization::Global => Some(Mutex::new(())),
        };
        Self { global }
    }

    /// Held for the whole update; `None` when updates are only row-locked.
    pub(crate) async fn enter(&self) -> Option<MutexGuard<'_, ()>> {
        match self.global {
            Some(ref lock) => Some(lock.lock().await),
            None => None,
        }
    }
}

/// Compute the balance after applying `amount`, enforcing the non-negative invariant.
pub(crate) fn adjusted_balance(
    wallet_id: Uuid,
    balance: i64,
    amount: i64,
) -> Result<i64, WalletError> {
    let new_balance = balance
        .checked_add(amount)
        .ok_or(WalletError::BalanceOverflow {
            wallet_id,
            balance,
            amount,
        })?;

    if new_balance < 0 {
        return Err(WalletError::InsufficientFunds {
            wallet_id,
            balance,
            amount,
        });
    }

    Ok(new_balance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_and_debit_within_balance() {
        let id = Uuid::new_v4();
        assert_eq!(adjusted_balance(id, 100, 50).unwrap(), 150);
        assert_eq!(adjusted_balance(id, 150, -150).unwrap(), 0);
        assert_eq!(adjusted_balance(id, 0, 0).unwrap(), 0);
    }

    #[test]
    fn negative_result_is_insufficient_funds() {
        let id = Uuid::new_v4();
        let err = adjusted_balance(id, 100, -150).unwrap_err();

        assert!(matches!(
            err,
            WalletError::InsufficientFunds {
                wallet_id,
                balance: 100,
                amount: -150,
            } if wallet_id == id
        ));
    }

    #[test]
    fn overflow_is_rejected() {
        let err = adjusted_balance(Uuid::new_v4(), 1, i64::MAX).unwrap_err();
        assert!(matches!(
            err,
            WalletError::BalanceOverflow {
                balance: 1,
                amount: i64::MAX,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn per_row_gate_never_blocks() {
        let gate = UpdateGate::new(UpdateSerialization::PerRow);
        let first = gate.enter().await;
        let second = gate.enter().await;
        assert!(first.is_none() && second.is_none());
    }

    #[tokio::test]
    async fn global_gate_admits_one_update_at_a_time() {
        let gate = UpdateGate::new(UpdateSerialization::Global);
        let held = gate.enter().await;
        assert!(held.is_some());

        let global = gate.global.as_ref().unwrap();
        assert!(global.try_lock().is_err());

        drop(held);
        assert!(global.try_lock().is_ok());
    }
}
