//! In-process wallet store.
//!
//! Mirrors the Postgres locking discipline: each row has its own async lock
//! held across read-check-write, and the committed balance is only replaced
//! once every check has passed. Reads take no row lock.

use std::{
    collections::HashMap,
    io,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::{UpdateGate, UpdateSerialization, WalletStore, adjusted_balance};
use crate::{error::WalletError, models::wallet::Wallet};

#[derive(Debug)]
struct Row {
    /// Equivalent of the `FOR UPDATE` row lock.
    update_lock: Mutex<()>,
    committed: RwLock<Wallet>,
}

#[derive(Debug, Default)]
pub struct MemoryWalletStore {
    rows: RwLock<HashMap<Uuid, Arc<Row>>>,
    gate: UpdateGate,
    fail_next_commit: AtomicBool,
}

impl MemoryWalletStore {
    pub fn new(serialization: UpdateSerialization) -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            gate: UpdateGate::new(serialization),
            fail_next_commit: AtomicBool::new(false),
        }
    }

    /// Provision a wallet row, replacing any existing one with the same id.
    pub async fn insert(&self, wallet_id: Uuid, balance: i64) {
        let row = Row {
            update_lock: Mutex::new(()),
            committed: RwLock::new(Wallet {
                id: wallet_id,
                balance,
                updated_at: Utc::now(),
            }),
        };
        self.rows.write().await.insert(wallet_id, Arc::new(row));
    }

    pub async fn get_wallet(&self, wallet_id: Uuid) -> Result<Wallet, WalletError> {
        let row = self.row(wallet_id).await?;
        let wallet = row.committed.read().await.clone();
        Ok(wallet)
    }

    /// Make the next update fail at commit time, after its new balance has
    /// been computed and validated.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    async fn row(&self, wallet_id: Uuid) -> Result<Arc<Row>, WalletError> {
        self.rows
            .read()
            .await
            .get(&wallet_id)
            .cloned()
            .ok_or(WalletError::WalletNotFound(wallet_id))
    }
}

#[async_trait]
impl WalletStore for MemoryWalletStore {
    async fn get_balance(&self, wallet_id: Uuid) -> Result<i64, WalletError> {
        let row = self.row(wallet_id).await?;
        let balance = row.committed.read().await.balance;
        Ok(balance)
    }

    async fn update_balance(&self, wallet_id: Uuid, amount: i64) -> Result<(), WalletError> {
        let _serialized = self.gate.enter().await;

        let row = self.row(wallet_id).await?;
        let _locked = row.update_lock.lock().await;

        let balance = row.committed.read().await.balance;
        let new_balance = adjusted_balance(wallet_id, balance, amount)?;

        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(WalletError::StoreUnavailable(sqlx::Error::Io(io::Error::other(
                "injected commit failure",
            ))));
        }

        let mut committed = row.committed.write().await;
        committed.balance = new_balance;
        committed.updated_at = Utc::now();

        tracing::debug!(%wallet_id, amount, new_balance, "balance updated");
        Ok(())
    }
}
