//! Entity records and their table schemas
//!
//! Each persisted record type carries an explicit, static schema
//! descriptor: table name, primary-key column, ordered column list, and
//! ordered value serialization. The store layer drives all SQL off these
//! descriptors, so there is no runtime type inspection anywhere.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// A single bindable SQL value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// TEXT column value
    Text(String),
    /// INTEGER column value
    Integer(i64),
    /// Timestamp, stored as RFC 3339 TEXT
    Timestamp(DateTime<Utc>),
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(v)
    }
}

/// A record type mapped to exactly one relational table.
///
/// `COLUMNS` and `values()` must agree in order; the primary key is one of
/// the columns. `from_row` rebuilds the record from a full-row select.
pub trait Entity: Sized + Send + Sync {
    /// Table this entity persists to
    const TABLE: &'static str;

    /// Primary-key column name
    const PRIMARY_KEY: &'static str;

    /// All column names, in persistence order
    const COLUMNS: &'static [&'static str];

    /// Primary-key value of this record
    fn primary_key(&self) -> SqlValue;

    /// Column values, in `COLUMNS` order
    fn values(&self) -> Vec<SqlValue>;

    /// Rebuild the record from a row selected with all `COLUMNS`
    fn from_row(row: &SqliteRow) -> Result<Self>;
}

/// A platform user, identified by an opaque api key.
///
/// `wallet_count` is informational bookkeeping; the authoritative wallet
/// limit check re-queries the wallets table.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    /// Opaque unique credential, primary key
    pub api_key: String,
    /// Informational count of owned wallets
    pub wallet_count: i64,
}

impl Entity for UserRecord {
    const TABLE: &'static str = "users";
    const PRIMARY_KEY: &'static str = "api_key";
    const COLUMNS: &'static [&'static str] = &["api_key", "wallet_count"];

    fn primary_key(&self) -> SqlValue {
        SqlValue::Text(self.api_key.clone())
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.api_key.clone()),
            SqlValue::Integer(self.wallet_count),
        ]
    }

    fn from_row(row: &SqliteRow) -> Result<Self> {
        Ok(Self {
            api_key: row.try_get("api_key").map_err(Error::from)?,
            wallet_count: row.try_get("wallet_count").map_err(Error::from)?,
        })
    }
}

/// A balance-holding wallet owned by exactly one user.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletRecord {
    /// Opaque unique address, primary key
    pub address: String,
    /// Owning user's api key, immutable after creation
    pub owner_api_key: String,
    /// Balance in satoshi, never negative
    pub balance: i64,
    /// Set once at creation
    pub creation_time: DateTime<Utc>,
}

impl Entity for WalletRecord {
    const TABLE: &'static str = "wallets";
    const PRIMARY_KEY: &'static str = "address";
    const COLUMNS: &'static [&'static str] =
        &["address", "owner_api_key", "balance", "creation_time"];

    fn primary_key(&self) -> SqlValue {
        SqlValue::Text(self.address.clone())
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.address.clone()),
            SqlValue::Text(self.owner_api_key.clone()),
            SqlValue::Integer(self.balance),
            SqlValue::Timestamp(self.creation_time),
        ]
    }

    fn from_row(row: &SqliteRow) -> Result<Self> {
        Ok(Self {
            address: row.try_get("address").map_err(Error::from)?,
            owner_api_key: row.try_get("owner_api_key").map_err(Error::from)?,
            balance: row.try_get("balance").map_err(Error::from)?,
            creation_time: row.try_get("creation_time").map_err(Error::from)?,
        })
    }
}

/// An immutable transfer record.
///
/// `amount` is the transferred principal; `fee_cost` is the platform
/// revenue. `amount + fee_cost` equals the total debited from the source
/// wallet.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    /// Opaque unique id, primary key
    pub id: String,
    /// Source wallet address
    pub from_addr: String,
    /// Destination wallet address
    pub to_addr: String,
    /// Transferred principal in satoshi, fee excluded
    pub amount: i64,
    /// Platform fee in satoshi
    pub fee_cost: i64,
    /// Set once at creation
    pub transaction_time: DateTime<Utc>,
}

impl Entity for TransactionRecord {
    const TABLE: &'static str = "transactions";
    const PRIMARY_KEY: &'static str = "id";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "from_addr",
        "to_addr",
        "amount",
        "fee_cost",
        "transaction_time",
    ];

    fn primary_key(&self) -> SqlValue {
        SqlValue::Text(self.id.clone())
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.id.clone()),
            SqlValue::Text(self.from_addr.clone()),
            SqlValue::Text(self.to_addr.clone()),
            SqlValue::Integer(self.amount),
            SqlValue::Integer(self.fee_cost),
            SqlValue::Timestamp(self.transaction_time),
        ]
    }

    fn from_row(row: &SqliteRow) -> Result<Self> {
        Ok(Self {
            id: row.try_get("id").map_err(Error::from)?,
            from_addr: row.try_get("from_addr").map_err(Error::from)?,
            to_addr: row.try_get("to_addr").map_err(Error::from)?,
            amount: row.try_get("amount").map_err(Error::from)?,
            fee_cost: row.try_get("fee_cost").map_err(Error::from)?,
            transaction_time: row.try_get("transaction_time").map_err(Error::from)?,
        })
    }
}
