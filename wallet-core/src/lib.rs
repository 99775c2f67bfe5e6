//! SatsLedger Core
//!
//! Custodial bitcoin wallet ledger: users, wallets, and satoshi transfers
//! over a single SQLite database.
//!
//! # Architecture
//!
//! - **Entity store**: one generic SQLite store per record type, driven by
//!   static schema descriptors
//! - **Repository factory**: one shared pool, lazily built typed stores
//! - **Services**: user, wallet, and transaction services composed by the
//!   [`BitcoinService`] orchestrator
//! - **Rates**: external BTC/USD source behind a trait, cached with a TTL
//!
//! # Invariants
//!
//! - Balances never go negative; a debit checks funds first
//! - The transaction log is append-only
//! - A transfer debits `amount + fee` and credits `amount`; the fee is the
//!   platform's profit
//! - Transfers between wallets of the same user are fee-free

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod config;
pub mod entity;
pub mod error;
pub mod model;
pub mod query;
pub mod rates;
pub mod repository;
pub mod service;
pub mod store;
pub mod units;

// Re-exports
pub use config::{Config, LedgerRules, RateSourceConfig};
pub use entity::{Entity, SqlValue, TransactionRecord, UserRecord, WalletRecord};
pub use error::{Error, ErrorKind, Result};
pub use model::{NewWallet, Statistics, TransactionSummary, WalletBalance};
pub use rates::{CoinGeckoClient, FixedRate, RateSource};
pub use repository::RepositoryFactory;
pub use service::{BitcoinService, TransactionService, UserService, WalletService};
pub use store::EntityStore;
