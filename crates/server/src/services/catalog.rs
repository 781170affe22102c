//! Catalog service: category/product listing, search, and point lookups.

use rust_decimal::Decimal;
use sqlx::SqlitePool;
use thiserror::Error;

use greenbasket_core::{CategoryId, ProductId};

use crate::db::RepositoryError;
use crate::db::categories::CategoryRepository;
use crate::db::products::ProductRepository;
use crate::models::catalog::{Category, CategoryProducts, CategoryWithCount, Product};

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Referenced category does not exist.
    #[error("category does not exist")]
    CategoryNotFound,

    /// Referenced product does not exist.
    #[error("product does not exist")]
    ProductNotFound,

    /// A filter value was malformed.
    #[error("{0}")]
    InvalidFilter(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Catalog service.
pub struct CatalogService<'a> {
    categories: CategoryRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            categories: CategoryRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// All categories with their product counts, for the admin dashboard.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<CategoryWithCount>, CatalogError> {
        Ok(self.categories.list_with_counts().await?)
    }

    /// Case-insensitive substring search on category names.
    ///
    /// An empty pattern matches all categories.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn search_categories(&self, pattern: &str) -> Result<Vec<Category>, CatalogError> {
        Ok(self.categories.search(pattern).await?)
    }

    /// Categories with their products for the browse page.
    ///
    /// `category_name_filter`, when present, narrows categories by
    /// case-insensitive substring; product-level filters (name substring,
    /// max price) are applied by the presentation layer over this result.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if a query fails.
    pub async fn list_for_display(
        &self,
        category_name_filter: Option<&str>,
    ) -> Result<Vec<CategoryProducts>, CatalogError> {
        let categories = match category_name_filter {
            Some(pattern) => self.categories.search(pattern).await?,
            None => self.categories.list().await?,
        };

        let mut out = Vec::with_capacity(categories.len());
        for category in categories {
            let products = self.products.list_by_category(category.id).await?;
            out.push(CategoryProducts { category, products });
        }
        Ok(out)
    }

    /// Parse and validate a max-price filter value.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidFilter` if the value is not a positive
    /// number.
    pub fn parse_max_price(raw: &str) -> Result<Decimal, CatalogError> {
        let value: Decimal = raw
            .trim()
            .parse()
            .map_err(|_| CatalogError::InvalidFilter("Invalid price filter".to_owned()))?;

        if value <= Decimal::ZERO {
            return Err(CatalogError::InvalidFilter(
                "Price filter must be positive".to_owned(),
            ));
        }
        Ok(value)
    }

    /// Point lookup for a category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CategoryNotFound` if absent.
    pub async fn get_category(&self, id: CategoryId) -> Result<Category, CatalogError> {
        self.categories
            .get(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound)
    }

    /// Point lookup for a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if absent.
    pub async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.products
            .get(id)
            .await?
            .ok_or(CatalogError::ProductNotFound)
    }

    /// Products of one category (admin category page).
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn products_in_category(
        &self,
        id: CategoryId,
    ) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.list_by_category(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_price_accepts_positive_numbers() {
        assert_eq!(
            CatalogService::parse_max_price(" 12.50 ").expect("should parse"),
            Decimal::new(1250, 2)
        );
    }

    #[test]
    fn test_max_price_rejects_garbage_and_non_positive() {
        assert!(matches!(
            CatalogService::parse_max_price("cheap"),
            Err(CatalogError::InvalidFilter(_))
        ));
        assert!(matches!(
            CatalogService::parse_max_price("0"),
            Err(CatalogError::InvalidFilter(_))
        ));
        assert!(matches!(
            CatalogService::parse_max_price("-3"),
            Err(CatalogError::InvalidFilter(_))
        ));
    }
}
