//! Repository factory over a single SQLite database
//!
//! Owns the connection pool, applies the schema on open, and hands out one
//! lazily built store per entity type. Stores are created at most once and
//! shared thereafter.

use crate::entity::{TransactionRecord, UserRecord, WalletRecord};
use crate::error::Result;
use crate::store::{apply_schema, EntityStore};
use once_cell::sync::OnceCell;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Factory handing out typed entity stores over one shared pool.
#[derive(Debug)]
pub struct RepositoryFactory {
    pool: SqlitePool,
    users: OnceCell<EntityStore<UserRecord>>,
    wallets: OnceCell<EntityStore<WalletRecord>>,
    transactions: OnceCell<EntityStore<TransactionRecord>>,
}

impl RepositoryFactory {
    /// Open (creating if needed) the database file and apply the schema.
    pub async fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(db_path.as_ref())
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options).await?;
        apply_schema(&pool).await?;

        info!(path = %db_path.as_ref().display(), "opened wallet database");
        Ok(Self::with_pool(pool))
    }

    /// Wrap an already connected pool. The schema must already exist.
    pub fn with_pool(pool: SqlitePool) -> Self {
        Self {
            pool,
            users: OnceCell::new(),
            wallets: OnceCell::new(),
            transactions: OnceCell::new(),
        }
    }

    /// Store for user records.
    pub fn users(&self) -> &EntityStore<UserRecord> {
        self.users
            .get_or_init(|| EntityStore::new(self.pool.clone()))
    }

    /// Store for wallet records.
    pub fn wallets(&self) -> &EntityStore<WalletRecord> {
        self.wallets
            .get_or_init(|| EntityStore::new(self.pool.clone()))
    }

    /// Store for transaction records.
    pub fn transactions(&self) -> &EntityStore<TransactionRecord> {
        self.transactions
            .get_or_init(|| EntityStore::new(self.pool.clone()))
    }

    /// Whether the database answers a trivial query.
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await.is_ok()
    }

    /// Close the underlying pool. Safe to call more than once.
    pub async fn close_connections(&self) {
        if !self.pool.is_closed() {
            self.pool.close().await;
            info!("closed wallet database");
        }
    }
}
