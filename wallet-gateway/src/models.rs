// Wire models of the wallet gateway

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wallet_core::TransactionSummary;

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub api_key: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateWalletResponse {
    pub wallet_address: String,
    pub balance_btc: f64,
    pub balance_usd: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WalletBalanceResponse {
    pub btc_balance: f64,
    pub usd_balance: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub from_wallet_address: String,
    pub to_wallet_address: String,
    /// Amount to transfer, in BTC
    pub amount: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionModel {
    pub from_wallet_address: String,
    pub to_wallet_address: String,
    /// Transferred principal, in BTC
    pub amount: f64,
    /// Platform fee, in BTC
    pub fee: f64,
    pub transaction_time: DateTime<Utc>,
}

impl From<TransactionSummary> for TransactionModel {
    fn from(summary: TransactionSummary) -> Self {
        Self {
            from_wallet_address: summary.from_wallet_address,
            to_wallet_address: summary.to_wallet_address,
            amount: summary.amount,
            fee: summary.fee,
            transaction_time: summary.transaction_time,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTransactionResponse {
    pub transaction_id: String,
    pub transaction: TransactionModel,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListTransactionsResponse {
    pub transactions: Vec<TransactionModel>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub transactions_num: u64,
    /// Accumulated platform fees, in BTC
    pub platform_profit: f64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub db_connected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_request_shape() {
        let body = r#"{
            "from_wallet_address": "a",
            "to_wallet_address": "b",
            "amount": 0.2
        }"#;
        let request: CreateTransactionRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.from_wallet_address, "a");
        assert_eq!(request.amount, 0.2);
    }

    #[test]
    fn test_statistics_serialization() {
        let response = StatisticsResponse {
            transactions_num: 2,
            platform_profit: 0.003,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["transactions_num"], 2);
        assert_eq!(json["platform_profit"], 0.003);
    }
}
