//! Generic SQLite-backed entity store
//!
//! One store instance serves one entity type. All SQL is derived from the
//! entity's static schema descriptor, so adding a new persisted type means
//! implementing [`Entity`] and adding its table to [`apply_schema`].

use crate::entity::{Entity, SqlValue};
use crate::error::{Error, Result};
use crate::query::Query;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use std::marker::PhantomData;
use tracing::debug;

/// Typed store over a shared connection pool.
#[derive(Debug, Clone)]
pub struct EntityStore<E: Entity> {
    pool: SqlitePool,
    _marker: PhantomData<fn() -> E>,
}

fn bind_all<'q>(
    query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    values: &'q [SqlValue],
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    let mut q = query;
    for value in values {
        q = match value {
            SqlValue::Text(v) => q.bind(v.clone()),
            SqlValue::Integer(v) => q.bind(*v),
            SqlValue::Timestamp(v) => q.bind(*v),
        };
    }
    q
}

impl<E: Entity> EntityStore<E> {
    /// Create a store over an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    /// Insert a new record. Fails if the primary key already exists.
    pub async fn create(&self, entity: &E) -> Result<()> {
        let columns = E::COLUMNS.join(", ");
        let placeholders = vec!["?"; E::COLUMNS.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            E::TABLE,
            columns,
            placeholders
        );

        let values = entity.values();
        bind_all(sqlx::query(&sql), &values)
            .execute(&self.pool)
            .await?;

        debug!(table = E::TABLE, "created record");
        Ok(())
    }

    /// Fetch a record by primary key, `None` when absent.
    pub async fn read(&self, key: impl Into<SqlValue>) -> Result<Option<E>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?",
            E::COLUMNS.join(", "),
            E::TABLE,
            E::PRIMARY_KEY
        );

        let values = [key.into()];
        let row = bind_all(sqlx::query(&sql), &values)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(E::from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Rewrite every column of an existing record, addressed by its
    /// primary key. Updating a missing record is an error.
    pub async fn update(&self, entity: &E) -> Result<()> {
        let assignments = E::COLUMNS
            .iter()
            .map(|c| format!("{} = ?", c))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?",
            E::TABLE,
            assignments,
            E::PRIMARY_KEY
        );

        let mut values = entity.values();
        values.push(entity.primary_key());
        let result = bind_all(sqlx::query(&sql), &values)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::Storage(format!(
                "update of missing record in {}",
                E::TABLE
            )));
        }
        Ok(())
    }

    /// Delete a record by primary key. Deleting an absent key is a no-op.
    pub async fn delete(&self, key: impl Into<SqlValue>) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE {} = ?", E::TABLE, E::PRIMARY_KEY);

        let values = [key.into()];
        bind_all(sqlx::query(&sql), &values)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Fetch every record whose `field` equals `value`.
    pub async fn get_by_field(
        &self,
        field: &str,
        value: impl Into<SqlValue>,
    ) -> Result<Vec<E>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?",
            E::COLUMNS.join(", "),
            E::TABLE,
            field
        );

        let values = [value.into()];
        let rows = bind_all(sqlx::query(&sql), &values)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(E::from_row).collect()
    }

    /// Fetch every record matching a compiled filter.
    pub async fn query(&self, query: &Query) -> Result<Vec<E>> {
        let (clause, binds) = query.to_sql();
        let sql = format!(
            "SELECT {} FROM {}{}",
            E::COLUMNS.join(", "),
            E::TABLE,
            clause
        );

        let rows = bind_all(sqlx::query(&sql), &binds)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(E::from_row).collect()
    }

    /// Count records whose `field` equals `value`.
    pub async fn count_by_field(&self, field: &str, value: impl Into<SqlValue>) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) AS n FROM {} WHERE {} = ?", E::TABLE, field);

        let values = [value.into()];
        let row = bind_all(sqlx::query(&sql), &values)
            .fetch_one(&self.pool)
            .await?;

        row.try_get("n").map_err(Error::from)
    }
}

/// Create all ledger tables if they do not already exist.
pub async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            api_key TEXT PRIMARY KEY,
            wallet_count INTEGER NOT NULL DEFAULT 0
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS wallets (
            address TEXT PRIMARY KEY,
            owner_api_key TEXT NOT NULL REFERENCES users(api_key),
            balance INTEGER NOT NULL,
            creation_time TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS transactions (
            id TEXT PRIMARY KEY,
            from_addr TEXT NOT NULL REFERENCES wallets(address),
            to_addr TEXT NOT NULL REFERENCES wallets(address),
            amount INTEGER NOT NULL,
            fee_cost INTEGER NOT NULL,
            transaction_time TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    debug!("schema applied");
    Ok(())
}
