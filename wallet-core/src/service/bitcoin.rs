//! Platform orchestrator
//!
//! Composes the user, wallet, and transaction services with the external
//! rate source into the operations the HTTP boundary exposes. All amount
//! parameters and USD figures on this surface are denominated in BTC and
//! dollars; satoshi stay internal.

use crate::config::LedgerRules;
use crate::error::{Error, Result};
use crate::model::{NewWallet, Statistics, TransactionSummary, WalletBalance};
use crate::rates::RateSource;
use crate::service::{TransactionService, UserService, WalletService};
use crate::units::{btc_to_satoshi, satoshi_to_btc, transfer_fee};
use std::sync::Arc;
use tracing::info;

/// Public platform surface.
pub struct BitcoinService {
    users: UserService,
    wallets: WalletService,
    transactions: TransactionService,
    rates: Arc<dyn RateSource>,
    rules: LedgerRules,
    admin_api_key: String,
    // Serializes the debit/credit/log sequence of a transfer.
    transfer_lock: tokio::sync::Mutex<()>,
}

impl BitcoinService {
    /// Wire the orchestrator together.
    pub fn new(
        users: UserService,
        wallets: WalletService,
        transactions: TransactionService,
        rates: Arc<dyn RateSource>,
        rules: LedgerRules,
        admin_api_key: String,
    ) -> Self {
        Self {
            users,
            wallets,
            transactions,
            rates,
            rules,
            admin_api_key,
            transfer_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Register a new user, returning their api key.
    pub async fn create_user(&self) -> Result<String> {
        self.users.create_user().await
    }

    /// Whether an api key belongs to a registered user.
    pub async fn user_valid(&self, api_key: &str) -> Result<bool> {
        self.users.user_valid(api_key).await
    }

    /// Whether the given key is the administrator credential.
    pub fn admin_valid(&self, admin_api_key: &str) -> bool {
        admin_api_key == self.admin_api_key
    }

    /// Create a wallet for the user, reporting its funded balance in BTC
    /// and USD.
    pub async fn create_wallet(&self, api_key: &str) -> Result<NewWallet> {
        let wallet = self.wallets.create_wallet(api_key).await?;
        let rate = self.rates.btc_usd().await?;

        let balance_btc = satoshi_to_btc(wallet.balance);
        Ok(NewWallet {
            wallet_address: wallet.address,
            balance_btc,
            balance_usd: balance_btc * rate,
        })
    }

    /// Balance of an owned wallet in BTC and USD.
    pub async fn get_wallet_balance(&self, api_key: &str, address: &str) -> Result<WalletBalance> {
        self.users.get_user(api_key).await?;
        let balance = self.wallets.get_wallet_balance(api_key, address).await?;
        let rate = self.rates.btc_usd().await?;

        let btc_balance = satoshi_to_btc(balance);
        Ok(WalletBalance {
            btc_balance,
            usd_balance: btc_balance * rate,
        })
    }

    /// Transfer `amount_btc` from one wallet to another.
    ///
    /// Transfers between wallets of the same user are free; transfers
    /// across users pay the platform fee on top of the debited amount.
    /// Returns the new transaction id and its summary, denominated in BTC.
    pub async fn send_transaction(
        &self,
        api_key: &str,
        from_addr: &str,
        to_addr: &str,
        amount_btc: f64,
    ) -> Result<(String, TransactionSummary)> {
        if !self.users.user_valid(api_key).await? {
            return Err(Error::UserNotFound {
                api_key: api_key.to_string(),
            });
        }
        if !self.wallets.has_user_wallet(api_key, from_addr).await? {
            // Distinguish a missing source wallet from a foreign one.
            self.wallets.get_wallet(from_addr).await?;
            return Err(Error::NoRightOnWallet {
                api_key: api_key.to_string(),
                address: from_addr.to_string(),
            });
        }
        let to_owner = self.wallets.get_owner_api_key(to_addr).await?;

        let amount = btc_to_satoshi(amount_btc);
        if amount < 0 {
            return Err(Error::InvalidAmount { amount });
        }

        let fee = if to_owner == api_key {
            0
        } else {
            transfer_fee(amount, self.rules.fee_percent)
        };

        // The saturated satoshi range still has to fit a single debit.
        let total = amount
            .checked_add(fee)
            .ok_or(Error::InvalidAmount { amount })?;

        let record = {
            let _guard = self.transfer_lock.lock().await;
            self.wallets.withdraw(api_key, from_addr, total).await?;
            self.wallets.deposit(to_addr, amount).await?;
            self.transactions
                .create_transaction(from_addr, to_addr, amount, fee)
                .await?
        };

        info!(
            from = %from_addr,
            to = %to_addr,
            amount,
            fee,
            "transfer completed"
        );

        let transaction_id = record.id.clone();
        Ok((transaction_id, Self::summarize(record)))
    }

    /// History of one owned wallet.
    pub async fn get_addr_transactions(
        &self,
        api_key: &str,
        address: &str,
    ) -> Result<Vec<TransactionSummary>> {
        self.users.get_user(api_key).await?;
        self.wallets.get_wallet(address).await?;
        if !self.wallets.has_user_wallet(api_key, address).await? {
            return Err(Error::NoRightOnWallet {
                api_key: api_key.to_string(),
                address: address.to_string(),
            });
        }

        let records = self.transactions.get_addr_transactions(address).await?;
        Ok(records.into_iter().map(Self::summarize).collect())
    }

    /// History across every wallet of the user.
    pub async fn get_transactions(&self, api_key: &str) -> Result<Vec<TransactionSummary>> {
        self.users.get_user(api_key).await?;

        let addresses: Vec<String> = self
            .wallets
            .get_user_wallets(api_key)
            .await?
            .into_iter()
            .map(|w| w.address)
            .collect();

        let records = self.transactions.get_transactions(&addresses).await?;
        Ok(records.into_iter().map(Self::summarize).collect())
    }

    /// Platform totals. Requires the administrator credential.
    pub async fn get_statistics(&self, admin_api_key: &str) -> Result<Statistics> {
        if !self.admin_valid(admin_api_key) {
            return Err(Error::InvalidAdminKey);
        }

        let (transactions_num, profit_sat) = self.transactions.get_statistics().await?;
        Ok(Statistics {
            transactions_num,
            platform_profit: satoshi_to_btc(profit_sat),
        })
    }

    fn summarize(record: crate::entity::TransactionRecord) -> TransactionSummary {
        TransactionSummary {
            from_wallet_address: record.from_addr,
            to_wallet_address: record.to_addr,
            amount: satoshi_to_btc(record.amount),
            fee: satoshi_to_btc(record.fee_cost),
            transaction_time: record.transaction_time,
        }
    }
}
