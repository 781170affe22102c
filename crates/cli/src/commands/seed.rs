//! Seed the database with a small sample catalog.
//!
//! Intended for local development. Refuses to run against a database that
//! already has categories so it cannot double-insert.
//!
//! # Usage
//!
//! ```bash
//! gb-cli seed
//! ```

use chrono::NaiveDate;
use thiserror::Error;

use greenbasket_core::{Price, PriceError};
use greenbasket_server::db::RepositoryError;
use greenbasket_server::db::categories::CategoryRepository;
use greenbasket_server::db::products::ProductRepository;

use super::CommandError;

/// Errors that can occur during seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Shared command failure (env, connection, migration).
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Database already contains catalog data.
    #[error("Database already has {0} categories, refusing to seed")]
    AlreadySeeded(usize),

    /// A seed price literal is malformed.
    #[error("Invalid seed price: {0}")]
    Price(#[from] PriceError),

    /// Database error.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),
}

const SEED_DATA: &[(&str, &[(&str, &str, i64, &str)])] = &[
    (
        "Fruits",
        &[
            ("Apples", "2.50", 120, "2026-08-01"),
            ("Bananas", "1.20", 200, "2026-08-10"),
            ("Oranges", "3.00", 80, "2026-08-05"),
        ],
    ),
    (
        "Vegetables",
        &[
            ("Carrots", "1.80", 150, "2026-08-03"),
            ("Spinach", "2.20", 60, "2026-08-12"),
        ],
    ),
    (
        "Dairy",
        &[
            ("Milk 1L", "1.50", 90, "2026-08-15"),
            ("Cheddar 200g", "4.75", 40, "2026-07-20"),
        ],
    ),
];

/// Seed the catalog.
///
/// # Errors
///
/// Returns `SeedError::AlreadySeeded` if any categories exist.
pub async fn run() -> Result<(), SeedError> {
    let pool = super::connect().await?;

    let categories = CategoryRepository::new(&pool);
    let products = ProductRepository::new(&pool);

    let existing = categories.list().await?;
    if !existing.is_empty() {
        return Err(SeedError::AlreadySeeded(existing.len()));
    }

    tracing::info!("Seeding sample catalog...");

    let mut product_count = 0;
    for (category_name, items) in SEED_DATA {
        let category = categories.create(category_name).await?;
        for (name, price, quantity, man_date) in *items {
            let price = Price::parse(price)?;
            let man_date = NaiveDate::parse_from_str(man_date, "%Y-%m-%d")
                .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;
            products
                .create(category.id, name, price, *quantity, man_date)
                .await?;
            product_count += 1;
        }
        tracing::info!("  {} ({} products)", category.name, items.len());
    }

    tracing::info!(
        "Seeding complete! {} categories, {} products",
        SEED_DATA.len(),
        product_count
    );
    Ok(())
}
