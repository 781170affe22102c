//! Category repository.

use sqlx::SqlitePool;

use greenbasket_core::CategoryId;

use super::RepositoryError;
use crate::models::catalog::{Category, CategoryWithCount};

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all categories in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// List all categories, each annotated with its product count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryWithCount>(
            "SELECT c.id, c.name, COUNT(p.id) AS product_count
             FROM categories c
             LEFT JOIN products p ON p.category_id = c.id
             GROUP BY c.id, c.name
             ORDER BY c.id",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Case-insensitive substring search on category name.
    ///
    /// SQLite's `LIKE` is case-insensitive for ASCII, which matches the
    /// catalog's search semantics. An empty pattern matches everything.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, name_pattern: &str) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, Category>(
            "SELECT id, name FROM categories
             WHERE name LIKE '%' || ?1 || '%'
             ORDER BY id",
        )
        .bind(name_pattern)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Get a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// Create a new category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, name: &str) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES (?1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(self.pool)
        .await?;
        Ok(row)
    }

    /// Rename a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn rename(&self, id: CategoryId, name: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE categories SET name = ?1 WHERE id = ?2")
            .bind(name)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Number of products referencing this category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_count(&self, id: CategoryId) -> Result<i64, RepositoryError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM products WHERE category_id = ?1")
                .bind(id)
                .fetch_one(self.pool)
                .await?;
        Ok(count)
    }

    /// Delete a category.
    ///
    /// The referential guard (no associated products) is enforced by the
    /// admin service before this is called; the foreign key also backs it up.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
