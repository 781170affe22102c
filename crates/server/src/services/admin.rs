//! Admin management: category and product CRUD with validation.
//!
//! Product fields arrive as raw form strings and are parsed here; malformed
//! input becomes a validation error naming the offending field rather than
//! a propagated parse failure.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use thiserror::Error;

use greenbasket_core::{CategoryId, Price, ProductId};

use crate::db::RepositoryError;
use crate::db::categories::CategoryRepository;
use crate::db::products::ProductRepository;
use crate::models::catalog::{Category, Product};

/// Errors from admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Missing or malformed input, naming the offending field.
    #[error("{0}")]
    Validation(String),

    /// Referenced category does not exist.
    #[error("category does not exist")]
    CategoryNotFound,

    /// Referenced product does not exist.
    #[error("product does not exist")]
    ProductNotFound,

    /// Category still has associated products.
    #[error("category has associated products")]
    CategoryHasProducts,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Validated product fields, parsed from raw form input.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub price: Price,
    pub quantity: i64,
    pub man_date: NaiveDate,
}

impl ProductInput {
    /// Parse and validate raw form strings.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` naming the first offending field:
    /// blank name, non-positive or unparseable price/quantity, or a
    /// manufacture date that is malformed or in the future.
    pub fn parse(
        name: &str,
        price: &str,
        quantity: &str,
        man_date: &str,
    ) -> Result<Self, AdminError> {
        if name.is_empty() || price.is_empty() || quantity.is_empty() || man_date.is_empty() {
            return Err(AdminError::Validation(
                "Please fill out all fields".to_owned(),
            ));
        }

        let price = Price::parse(price)
            .map_err(|e| AdminError::Validation(format!("Invalid price: {e}")))?;

        let quantity: i64 = quantity
            .trim()
            .parse()
            .map_err(|_| AdminError::Validation("Invalid quantity".to_owned()))?;
        if quantity <= 0 {
            return Err(AdminError::Validation(
                "Quantity must be a positive number".to_owned(),
            ));
        }

        let man_date = NaiveDate::parse_from_str(man_date.trim(), "%Y-%m-%d")
            .map_err(|_| AdminError::Validation("Invalid manufacturing date".to_owned()))?;
        if man_date > Utc::now().date_naive() {
            return Err(AdminError::Validation(
                "Manufacturing date cannot be in the future".to_owned(),
            ));
        }

        Ok(Self {
            name: name.to_owned(),
            price,
            quantity,
            man_date,
        })
    }
}

/// Admin management service.
pub struct AdminService<'a> {
    categories: CategoryRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> AdminService<'a> {
    /// Create a new admin service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            categories: CategoryRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` if the name is blank.
    pub async fn create_category(&self, name: &str) -> Result<Category, AdminError> {
        if name.is_empty() {
            return Err(AdminError::Validation(
                "Please fill out all fields".to_owned(),
            ));
        }
        Ok(self.categories.create(name).await?)
    }

    /// Rename a category.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` if the name is blank.
    /// Returns `AdminError::CategoryNotFound` if the category is absent.
    pub async fn rename_category(&self, id: CategoryId, name: &str) -> Result<(), AdminError> {
        if name.is_empty() {
            return Err(AdminError::Validation(
                "Please fill out all fields".to_owned(),
            ));
        }
        self.categories.rename(id, name).await.map_err(|e| match e {
            RepositoryError::NotFound => AdminError::CategoryNotFound,
            other => AdminError::Repository(other),
        })
    }

    /// Delete a category, guarded against orphaning products.
    ///
    /// The schema's foreign key would also reject the delete, but the guard
    /// is checked explicitly so the failure is a clean conflict rather than
    /// a surfaced database error.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::CategoryNotFound` if the category is absent.
    /// Returns `AdminError::CategoryHasProducts` if any product references it.
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), AdminError> {
        if self.categories.get(id).await?.is_none() {
            return Err(AdminError::CategoryNotFound);
        }

        if self.categories.product_count(id).await? > 0 {
            return Err(AdminError::CategoryHasProducts);
        }

        self.categories.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => AdminError::CategoryNotFound,
            other => AdminError::Repository(other),
        })
    }

    /// Create a product in a category.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::CategoryNotFound` if the category is absent.
    pub async fn create_product(
        &self,
        category_id: CategoryId,
        input: ProductInput,
    ) -> Result<Product, AdminError> {
        if self.categories.get(category_id).await?.is_none() {
            return Err(AdminError::CategoryNotFound);
        }

        Ok(self
            .products
            .create(
                category_id,
                &input.name,
                input.price,
                input.quantity,
                input.man_date,
            )
            .await?)
    }

    /// Update a product, possibly moving it to another category.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::CategoryNotFound` if the target category is absent.
    /// Returns `AdminError::ProductNotFound` if the product is absent.
    pub async fn update_product(
        &self,
        id: ProductId,
        category_id: CategoryId,
        input: ProductInput,
    ) -> Result<(), AdminError> {
        if self.categories.get(category_id).await?.is_none() {
            return Err(AdminError::CategoryNotFound);
        }

        self.products
            .update(
                id,
                category_id,
                &input.name,
                input.price,
                input.quantity,
                input.man_date,
            )
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AdminError::ProductNotFound,
                other => AdminError::Repository(other),
            })
    }

    /// Delete a product unconditionally.
    ///
    /// Order history is unaffected: orders snapshot name and price, and the
    /// schema nulls their product reference.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::ProductNotFound` if the product is absent.
    pub async fn delete_product(&self, id: ProductId) -> Result<(), AdminError> {
        self.products.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => AdminError::ProductNotFound,
            other => AdminError::Repository(other),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_product_input_valid() {
        let input = ProductInput::parse("Apples", "2.50", "10", "2024-01-15").expect("valid input");
        assert_eq!(input.name, "Apples");
        assert_eq!(input.quantity, 10);
        assert_eq!(input.price.to_string(), "2.50");
    }

    #[test]
    fn test_product_input_blank_fields() {
        assert!(matches!(
            ProductInput::parse("", "2.50", "10", "2024-01-15"),
            Err(AdminError::Validation(_))
        ));
    }

    #[test]
    fn test_product_input_bad_numbers() {
        assert!(matches!(
            ProductInput::parse("Apples", "cheap", "10", "2024-01-15"),
            Err(AdminError::Validation(_))
        ));
        assert!(matches!(
            ProductInput::parse("Apples", "2.50", "-1", "2024-01-15"),
            Err(AdminError::Validation(_))
        ));
        assert!(matches!(
            ProductInput::parse("Apples", "0", "10", "2024-01-15"),
            Err(AdminError::Validation(_))
        ));
    }

    #[test]
    fn test_product_input_future_date_rejected() {
        let tomorrow = (Utc::now().date_naive() + Duration::days(1))
            .format("%Y-%m-%d")
            .to_string();
        assert!(matches!(
            ProductInput::parse("Apples", "2.50", "10", &tomorrow),
            Err(AdminError::Validation(_))
        ));
    }

    #[test]
    fn test_product_input_today_accepted() {
        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        assert!(ProductInput::parse("Apples", "2.50", "10", &today).is_ok());
    }
}
