//! Transaction and order repository.
//!
//! Everything written here is immutable after checkout commits; the only
//! inserts happen inside the checkout transaction.

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool};

use greenbasket_core::{Price, ProductId, TransactionId, UserId};

use super::RepositoryError;
use crate::models::order::HistoryEntry;

/// Raw row shape for the flattened purchase history.
#[derive(sqlx::FromRow)]
struct HistoryRow {
    transaction_id: TransactionId,
    created_at: DateTime<Utc>,
    product_name: String,
    quantity: i64,
    price: String,
}

impl HistoryRow {
    fn into_entry(self) -> Result<HistoryEntry, RepositoryError> {
        let price = Price::parse(&self.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price in database: {e}"))
        })?;

        Ok(HistoryEntry {
            transaction_id: self.transaction_id,
            created_at: self.created_at,
            product_name: self.product_name,
            quantity: self.quantity,
            price,
        })
    }
}

/// Repository for purchase history.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// A user's full order history, one entry per order line, ordered by
    /// transaction and then storage order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn history(&self, user_id: UserId) -> Result<Vec<HistoryEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            "SELECT t.id AS transaction_id, t.created_at,
                    o.product_name, o.quantity, o.price
             FROM transactions t
             JOIN orders o ON o.transaction_id = t.id
             WHERE t.user_id = ?1
             ORDER BY t.id, o.id",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(HistoryRow::into_entry).collect()
    }

    /// Insert a new transaction inside the checkout transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn insert_transaction(
        tx: &mut sqlx::Transaction<'_, Sqlite>,
        user_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Result<TransactionId, RepositoryError> {
        let (id,): (TransactionId,) = sqlx::query_as(
            "INSERT INTO transactions (user_id, created_at) VALUES (?1, ?2) RETURNING id",
        )
        .bind(user_id)
        .bind(created_at)
        .fetch_one(&mut **tx)
        .await?;
        Ok(id)
    }

    /// Insert one order line inside the checkout transaction, snapshotting
    /// the product's name and current unit price.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn insert_order(
        tx: &mut sqlx::Transaction<'_, Sqlite>,
        transaction_id: TransactionId,
        product_id: ProductId,
        product_name: &str,
        quantity: i64,
        price: Price,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO orders (transaction_id, product_id, product_name, quantity, price)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(transaction_id)
        .bind(product_id)
        .bind(product_name)
        .bind(quantity)
        .bind(price.to_string())
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
