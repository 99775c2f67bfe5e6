//! Transfer history bookkeeping
//!
//! This service only appends to and reads from the transaction log; it
//! never touches balances. Balance movement and the transfer log are tied
//! together by the orchestrator.

use crate::entity::TransactionRecord;
use crate::error::Result;
use crate::query::{Condition, Logical, Operator, Query};
use crate::repository::RepositoryFactory;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Transaction log over the shared repository.
#[derive(Clone)]
pub struct TransactionService {
    repo: Arc<RepositoryFactory>,
}

impl TransactionService {
    /// Create the service.
    pub fn new(repo: Arc<RepositoryFactory>) -> Self {
        Self { repo }
    }

    /// Append a transfer record.
    pub async fn create_transaction(
        &self,
        from_addr: &str,
        to_addr: &str,
        amount: i64,
        fee_cost: i64,
    ) -> Result<TransactionRecord> {
        let record = TransactionRecord {
            id: Uuid::new_v4().to_string(),
            from_addr: from_addr.to_string(),
            to_addr: to_addr.to_string(),
            amount,
            fee_cost,
            transaction_time: Utc::now(),
        };
        self.repo.transactions().create(&record).await?;
        Ok(record)
    }

    /// Every transfer touching a wallet, as source or destination.
    pub async fn get_addr_transactions(&self, address: &str) -> Result<Vec<TransactionRecord>> {
        let query = Query::filter(vec![
            Condition::pred("to_addr", Operator::Equals, address),
            Condition::Connector(Logical::Or),
            Condition::pred("from_addr", Operator::Equals, address),
        ]);
        self.repo.transactions().query(&query).await
    }

    /// Every transfer touching any of the given wallets, concatenated per
    /// wallet. A transfer between two of the wallets appears once per
    /// side.
    pub async fn get_transactions(&self, addresses: &[String]) -> Result<Vec<TransactionRecord>> {
        let mut all = Vec::new();
        for address in addresses {
            all.extend(self.get_addr_transactions(address).await?);
        }
        Ok(all)
    }

    /// Platform totals: number of transfers and accumulated fees in
    /// satoshi.
    pub async fn get_statistics(&self) -> Result<(u64, i64)> {
        let records = self.repo.transactions().query(&Query::all()).await?;
        let profit = records.iter().map(|r| r.fee_cost).sum();
        Ok((records.len() as u64, profit))
    }
}
