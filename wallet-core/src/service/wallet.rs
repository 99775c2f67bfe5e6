//! Wallet lifecycle and balance mutation

use crate::config::LedgerRules;
use crate::entity::WalletRecord;
use crate::error::{Error, Result};
use crate::repository::RepositoryFactory;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Wallet operations over the shared repository.
#[derive(Clone)]
pub struct WalletService {
    repo: Arc<RepositoryFactory>,
    rules: LedgerRules,
}

impl WalletService {
    /// Create the service.
    pub fn new(repo: Arc<RepositoryFactory>, rules: LedgerRules) -> Self {
        Self { repo, rules }
    }

    /// Create a wallet for the given user, funded with the configured
    /// starting balance. Fails once the user owns the maximum number of
    /// wallets.
    pub async fn create_wallet(&self, api_key: &str) -> Result<WalletRecord> {
        let mut user =
            self.repo
                .users()
                .read(api_key)
                .await?
                .ok_or_else(|| Error::UserNotFound {
                    api_key: api_key.to_string(),
                })?;

        // The wallets table is authoritative; wallet_count on the user is
        // bookkeeping only.
        let owned = self
            .repo
            .wallets()
            .count_by_field("owner_api_key", api_key)
            .await?;
        if owned >= i64::from(self.rules.max_wallets_per_user) {
            return Err(Error::WalletLimitExceeded {
                api_key: api_key.to_string(),
            });
        }

        let wallet = WalletRecord {
            address: Uuid::new_v4().to_string(),
            owner_api_key: api_key.to_string(),
            balance: self.rules.initial_wallet_balance,
            creation_time: Utc::now(),
        };
        self.repo.wallets().create(&wallet).await?;

        user.wallet_count = owned + 1;
        self.repo.users().update(&user).await?;

        info!(address = %wallet.address, "created wallet");
        Ok(wallet)
    }

    /// Fetch a wallet record, failing if the address is unknown.
    pub async fn get_wallet(&self, address: &str) -> Result<WalletRecord> {
        self.repo
            .wallets()
            .read(address)
            .await?
            .ok_or_else(|| Error::WalletNotFound {
                address: address.to_string(),
            })
    }

    /// Owner api key of a wallet.
    pub async fn get_owner_api_key(&self, address: &str) -> Result<String> {
        Ok(self.get_wallet(address).await?.owner_api_key)
    }

    /// Whether the given user owns the given wallet. Unknown wallets are
    /// reported as not owned.
    pub async fn has_user_wallet(&self, api_key: &str, address: &str) -> Result<bool> {
        match self.repo.wallets().read(address).await? {
            Some(wallet) => Ok(wallet.owner_api_key == api_key),
            None => Ok(false),
        }
    }

    /// All wallets owned by a user.
    pub async fn get_user_wallets(&self, api_key: &str) -> Result<Vec<WalletRecord>> {
        self.repo
            .wallets()
            .get_by_field("owner_api_key", api_key)
            .await
    }

    /// Balance of a wallet in satoshi, with ownership enforced.
    pub async fn get_wallet_balance(&self, api_key: &str, address: &str) -> Result<i64> {
        let wallet = self.get_wallet(address).await?;
        if wallet.owner_api_key != api_key {
            return Err(Error::NoRightOnWallet {
                api_key: api_key.to_string(),
                address: address.to_string(),
            });
        }
        Ok(wallet.balance)
    }

    /// Debit an owned wallet. Ownership is checked before the amount and
    /// the amount before balance sufficiency.
    pub async fn withdraw(&self, api_key: &str, address: &str, amount: i64) -> Result<()> {
        let mut wallet = self.get_wallet(address).await?;
        if wallet.owner_api_key != api_key {
            return Err(Error::NoRightOnWallet {
                api_key: api_key.to_string(),
                address: address.to_string(),
            });
        }
        if amount < 0 {
            return Err(Error::InvalidAmount { amount });
        }
        if wallet.balance < amount {
            return Err(Error::NotEnoughBalance {
                address: address.to_string(),
            });
        }
        wallet.balance -= amount;
        self.repo.wallets().update(&wallet).await
    }

    /// Credit a wallet. The amount must be non-negative.
    pub async fn deposit(&self, address: &str, amount: i64) -> Result<()> {
        let mut wallet = self.get_wallet(address).await?;
        if amount < 0 {
            return Err(Error::InvalidAmount { amount });
        }
        wallet.balance += amount;
        self.repo.wallets().update(&wallet).await
    }
}
