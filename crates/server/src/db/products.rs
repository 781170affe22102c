//! Product repository.
//!
//! Prices live in SQLite as canonical decimal strings; rows are parsed into
//! [`Price`] on read and a failure to parse is reported as data corruption,
//! never a panic.

use chrono::NaiveDate;
use sqlx::{Sqlite, SqlitePool};

use greenbasket_core::{CategoryId, Price, ProductId};

use super::RepositoryError;
use crate::models::catalog::Product;

/// Raw row shape for the `products` table.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    category_id: CategoryId,
    name: String,
    price: String,
    quantity: i64,
    man_date: NaiveDate,
}

impl ProductRow {
    fn into_product(self) -> Result<Product, RepositoryError> {
        let price = Price::parse(&self.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price in database: {e}"))
        })?;

        Ok(Product {
            id: self.id,
            category_id: self.category_id,
            name: self.name,
            price,
            quantity: self.quantity,
            man_date: self.man_date,
        })
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored price is invalid.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, category_id, name, price, quantity, man_date
             FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }

    /// List all products in a category, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn list_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, category_id, name, price, quantity, man_date
             FROM products WHERE category_id = ?1 ORDER BY id",
        )
        .bind(category_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails (including a
    /// foreign-key failure for a vanished category).
    pub async fn create(
        &self,
        category_id: CategoryId,
        name: &str,
        price: Price,
        quantity: i64,
        man_date: NaiveDate,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "INSERT INTO products (category_id, name, price, quantity, man_date)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, category_id, name, price, quantity, man_date",
        )
        .bind(category_id)
        .bind(name)
        .bind(price.to_string())
        .bind(quantity)
        .bind(man_date)
        .fetch_one(self.pool)
        .await?;

        row.into_product()
    }

    /// Update every editable field of a product.
    ///
    /// This is the admin edit path; it races checkout's decrement only at
    /// the whole-row level, and both sides run in single write transactions.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        category_id: CategoryId,
        name: &str,
        price: Price,
        quantity: i64,
        man_date: NaiveDate,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE products
             SET category_id = ?1, name = ?2, price = ?3, quantity = ?4, man_date = ?5
             WHERE id = ?6",
        )
        .bind(category_id)
        .bind(name)
        .bind(price.to_string())
        .bind(quantity)
        .bind(man_date)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a product.
    ///
    /// Cart lines referencing it are dropped by the schema; orders keep
    /// their name/price snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Conditionally decrement stock inside a checkout transaction.
    ///
    /// Returns `true` if the decrement applied, `false` if stock was
    /// insufficient at write time (the caller must roll back).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn decrement_stock(
        tx: &mut sqlx::Transaction<'_, Sqlite>,
        id: ProductId,
        amount: i64,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE products SET quantity = quantity - ?1
             WHERE id = ?2 AND quantity >= ?1",
        )
        .bind(amount)
        .bind(id)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
