//! PostgreSQL-backed wallet store.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::{UpdateGate, UpdateSerialization, WalletStore, adjusted_balance};
use crate::{db::DbPool, error::WalletError, models::wallet::Wallet};

/// Wallet store over the `wallets` table.
///
/// Updates to the same wallet are serialized by the row lock taken with
/// `SELECT ... FOR UPDATE`. With `UpdateSerialization::Global` every update
/// in the process also waits on one shared mutex.
#[derive(Debug)]
pub struct PgWalletStore {
    pool: DbPool,
    gate: UpdateGate,
    update_timeout: Duration,
}

impl PgWalletStore {
    pub fn new(pool: DbPool, serialization: UpdateSerialization, update_timeout: Duration) -> Self {
        Self {
            pool,
            gate: UpdateGate::new(serialization),
            update_timeout,
        }
    }

    /// Read the full wallet row.
    pub async fn get_wallet(&self, wallet_id: Uuid) -> Result<Wallet, WalletError> {
        let wallet =
            sqlx::query_as::<_, Wallet>("SELECT id, balance, updated_at FROM wallets WHERE id = $1")
                .bind(wallet_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or(WalletError::WalletNotFound(wallet_id))?;

        Ok(wallet)
    }

    /// Verify database connectivity with a trivial query.
    pub async fn ping(&self) -> Result<(), WalletError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Locked read-check-write of one wallet row.
    ///
    /// Returns the still-open transaction holding the row lock together with
    /// the balance it wrote; the caller decides when to commit.
    async fn stage_adjustment(
        &self,
        wallet_id: Uuid,
        amount: i64,
    ) -> Result<(Transaction<'static, Postgres>, i64), WalletError> {
        let mut tx = self.pool.begin().await?;

        // FOR UPDATE blocks other locking reads of this row until we commit or roll back
        let balance: Option<i64> =
            sqlx::query_scalar("SELECT balance FROM wallets WHERE id = $1 FOR UPDATE")
                .bind(wallet_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(balance) = balance else {
            abandon(tx, wallet_id).await;
            return Err(WalletError::WalletNotFound(wallet_id));
        };

        let new_balance = match adjusted_balance(wallet_id, balance, amount) {
            Ok(new_balance) => new_balance,
            Err(e) => {
                tracing::warn!(%wallet_id, balance, amount, "balance adjustment rejected: {}", e);
                abandon(tx, wallet_id).await;
                return Err(e);
            }
        };

        sqlx::query("UPDATE wallets SET balance = $1, updated_at = NOW() WHERE id = $2")
            .bind(new_balance)
            .bind(wallet_id)
            .execute(&mut *tx)
            .await?;

        Ok((tx, new_balance))
    }
}

/// Roll back a transaction whose outcome is already decided.
///
/// A failed rollback still leaves the row untouched (the server discards the
/// transaction with the connection), so the domain error wins over it.
async fn abandon(tx: Transaction<'static, Postgres>, wallet_id: Uuid) {
    if let Err(e) = tx.rollback().await {
        tracing::warn!(%wallet_id, "rollback failed: {:?}", e);
    }
}

fn store_failure(wallet_id: Uuid, e: WalletError) -> WalletError {
    if let WalletError::StoreUnavailable(ref source) = e {
        tracing::error!(%wallet_id, "balance update failed: {:?}", source);
    }
    e
}

#[async_trait]
impl WalletStore for PgWalletStore {
    async fn get_balance(&self, wallet_id: Uuid) -> Result<i64, WalletError> {
        let balance: i64 = sqlx::query_scalar("SELECT balance FROM wallets WHERE id = $1")
            .bind(wallet_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(WalletError::WalletNotFound(wallet_id))?;

        Ok(balance)
    }

    async fn update_balance(&self, wallet_id: Uuid, amount: i64) -> Result<(), WalletError> {
        // The deadline covers lock waits and the read-check-write only. On
        // expiry the staged transaction is dropped, which rolls it back.
        let staged = tokio::time::timeout(self.update_timeout, async {
            let serialized = self.gate.enter().await;
            let (tx, new_balance) = self.stage_adjustment(wallet_id, amount).await?;
            Ok::<_, WalletError>((serialized, tx, new_balance))
        })
        .await;

        let (_serialized, tx, new_balance) = match staged {
            Ok(Ok(staged)) => staged,
            Ok(Err(e)) => return Err(store_failure(wallet_id, e)),
            Err(_) => {
                tracing::warn!(%wallet_id, timeout = ?self.update_timeout, "balance update timed out");
                return Err(WalletError::TimedOut);
            }
        };

        // Once COMMIT is sent the server may apply it, so it is never cut
        // short by the deadline: the caller gets the real outcome.
        tx.commit()
            .await
            .map_err(|e| store_failure(wallet_id, e.into()))?;

        tracing::debug!(%wallet_id, amount, new_balance, "balance updated");
        Ok(())
    }
}
