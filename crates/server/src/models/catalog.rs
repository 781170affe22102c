//! Catalog models: categories and products.

use chrono::NaiveDate;
use greenbasket_core::{CategoryId, Price, ProductId};

/// A named grouping of products. Names need not be unique.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// A category annotated with its product count (admin dashboard).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryWithCount {
    pub id: CategoryId,
    pub name: String,
    pub product_count: i64,
}

/// A product in the catalog.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub name: String,
    pub price: Price,
    /// On-hand quantity; the authoritative ceiling for cart and checkout.
    pub quantity: i64,
    pub man_date: NaiveDate,
}

/// A category with its fully-loaded products, for the browse page.
#[derive(Debug, Clone)]
pub struct CategoryProducts {
    pub category: Category,
    pub products: Vec<Product>,
}
