//! Cart repository.

use sqlx::{Sqlite, SqlitePool};

use greenbasket_core::{CartLineId, Price, ProductId, UserId};

use super::RepositoryError;
use crate::models::cart::{CartLine, CartLineDetail};

/// Cart line joined with product data, as stored.
#[derive(sqlx::FromRow)]
struct DetailRow {
    id: CartLineId,
    product_id: ProductId,
    product_name: String,
    quantity: i64,
    unit_price: String,
    available: i64,
}

impl DetailRow {
    fn into_detail(self) -> Result<CartLineDetail, RepositoryError> {
        let unit_price = Price::parse(&self.unit_price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price in database: {e}"))
        })?;

        Ok(CartLineDetail {
            id: self.id,
            product_id: self.product_id,
            product_name: self.product_name,
            quantity: self.quantity,
            unit_price,
            available: self.available,
        })
    }
}

const DETAIL_QUERY: &str = "SELECT cl.id, cl.product_id, p.name AS product_name,
        cl.quantity, p.price AS unit_price, p.quantity AS available
 FROM cart_lines cl
 JOIN products p ON p.id = cl.product_id
 WHERE cl.user_id = ?1
 ORDER BY cl.id";

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Find the user's line for a product, if one exists.
    ///
    /// The (user, product) pair is unique, so at most one line can match.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_line(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Option<CartLine>, RepositoryError> {
        let row = sqlx::query_as::<_, CartLine>(
            "SELECT id, user_id, product_id, quantity
             FROM cart_lines WHERE user_id = ?1 AND product_id = ?2",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// Get a cart line by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_line(&self, id: CartLineId) -> Result<Option<CartLine>, RepositoryError> {
        let row = sqlx::query_as::<_, CartLine>(
            "SELECT id, user_id, product_id, quantity FROM cart_lines WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// Insert a new cart line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a line for this (user, product)
    /// pair already exists; callers merge via [`Self::increment_line`] instead.
    pub async fn insert_line(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<CartLine, RepositoryError> {
        let row = sqlx::query_as::<_, CartLine>(
            "INSERT INTO cart_lines (user_id, product_id, quantity)
             VALUES (?1, ?2, ?3)
             RETURNING id, user_id, product_id, quantity",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(
                    "cart line already exists for this product".to_owned(),
                );
            }
            RepositoryError::Database(e)
        })?;
        Ok(row)
    }

    /// Add to an existing line's quantity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn increment_line(
        &self,
        id: CartLineId,
        amount: i64,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE cart_lines SET quantity = quantity + ?1 WHERE id = ?2")
            .bind(amount)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// All of a user's cart lines joined with current product data.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn list_detailed(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CartLineDetail>, RepositoryError> {
        let rows = sqlx::query_as::<_, DetailRow>(DETAIL_QUERY)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(DetailRow::into_detail).collect()
    }

    /// Same as [`Self::list_detailed`] but inside a checkout transaction,
    /// so validation and decrement see one consistent snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn list_detailed_tx(
        tx: &mut sqlx::Transaction<'_, Sqlite>,
        user_id: UserId,
    ) -> Result<Vec<CartLineDetail>, RepositoryError> {
        let rows = sqlx::query_as::<_, DetailRow>(DETAIL_QUERY)
            .bind(user_id)
            .fetch_all(&mut **tx)
            .await?;

        rows.into_iter().map(DetailRow::into_detail).collect()
    }

    /// Delete a cart line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete_line(&self, id: CartLineId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_lines WHERE id = ?1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete all of a user's cart lines inside a checkout transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear_tx(
        tx: &mut sqlx::Transaction<'_, Sqlite>,
        user_id: UserId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_lines WHERE user_id = ?1")
            .bind(user_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
