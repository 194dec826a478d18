//! Balance service - deposit and withdrawal intents.
//!
//! The service validates amounts and turns intents into signed adjustments.
//! It never pre-checks sufficiency: the store's locked invariant check is the
//! only thing that prevents an overdraft.

use std::sync::Arc;

use uuid::Uuid;

use crate::{error::WalletError, store::WalletStore};

pub struct BalanceService<S> {
    store: Arc<S>,
}

impl<S> Clone for BalanceService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: WalletStore> BalanceService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The injected store, for capabilities beyond balance adjustments.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Credit `amount` to the wallet.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount`: amount is zero or negative (storage is not contacted)
    /// - any error from `WalletStore::update_balance`
    pub async fn deposit(&self, wallet_id: Uuid, amount: i64) -> Result<(), WalletError> {
        ensure_positive(amount)?;
        self.store.update_balance(wallet_id, amount).await
    }

    /// Debit `amount` from the wallet.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount`: amount is zero or negative (storage is not contacted)
    /// - `InsufficientFunds`: the balance is lower than `amount`
    /// - any other error from `WalletStore::update_balance`
    pub async fn withdraw(&self, wallet_id: Uuid, amount: i64) -> Result<(), WalletError> {
        ensure_positive(amount)?;
        self.store.update_balance(wallet_id, -amount).await
    }

    pub async fn get_balance(&self, wallet_id: Uuid) -> Result<i64, WalletError> {
        self.store.get_balance(wallet_id).await
    }
}

fn ensure_positive(amount: i64) -> Result<(), WalletError> {
    if amount <= 0 {
        return Err(WalletError::InvalidAmount);
    }
    Ok(())
}
