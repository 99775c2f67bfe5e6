//! Public ledger views returned by the orchestrator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One transfer as shown to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    /// Source wallet address
    pub from_wallet_address: String,
    /// Destination wallet address
    pub to_wallet_address: String,
    /// Transferred principal in BTC
    pub amount: f64,
    /// Platform fee in BTC
    pub fee: f64,
    /// When the transfer was recorded
    pub transaction_time: DateTime<Utc>,
}

/// A wallet balance in both denominations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletBalance {
    /// Balance in BTC
    pub btc_balance: f64,
    /// Balance converted at the current BTC/USD rate
    pub usd_balance: f64,
}

/// A freshly created wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWallet {
    /// Address of the new wallet
    pub wallet_address: String,
    /// Starting balance in BTC
    pub balance_btc: f64,
    /// Starting balance converted at the current BTC/USD rate
    pub balance_usd: f64,
}

/// Platform-wide totals for administrators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Total number of recorded transfers
    pub transactions_num: u64,
    /// Accumulated fees, in BTC
    pub platform_profit: f64,
}
