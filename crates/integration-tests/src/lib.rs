//! Integration test support for Greenbasket.
//!
//! Tests run against an in-memory `SQLite` database with the real schema
//! applied, exercising the service layer (and, for route tests, the full
//! axum router) without a running server.

use std::str::FromStr;

use chrono::NaiveDate;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use greenbasket_core::{CategoryId, Price, ProductId, UserId, Username};
use greenbasket_server::db::categories::CategoryRepository;
use greenbasket_server::db::products::ProductRepository;
use greenbasket_server::db::users::UserRepository;
use greenbasket_server::models::catalog::{Category, Product};
use greenbasket_server::services::auth::hash_password_for_new_user;

/// Create a migrated in-memory database pool.
///
/// A single connection keeps the in-memory database alive and shared for
/// the duration of the test.
///
/// # Panics
///
/// Panics if the pool cannot be created or migrations fail.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid connection string")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("failed to create test pool");

    greenbasket_server::db::MIGRATOR
        .run(&pool)
        .await
        .expect("failed to run migrations");

    pool
}

/// Create a user directly in the database and return its ID.
///
/// # Panics
///
/// Panics on any database or hashing failure.
pub async fn create_user(pool: &SqlitePool, username: &str, password: &str) -> UserId {
    create_account(pool, username, password, false).await
}

/// Create an admin user directly in the database and return its ID.
///
/// # Panics
///
/// Panics on any database or hashing failure.
pub async fn create_admin(pool: &SqlitePool, username: &str, password: &str) -> UserId {
    create_account(pool, username, password, true).await
}

async fn create_account(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    is_admin: bool,
) -> UserId {
    let username = Username::parse(username).expect("valid fixture username");
    let hash = hash_password_for_new_user(password).expect("hashing failed");

    let user = UserRepository::new(pool)
        .create(&username, &hash, "Test User", is_admin)
        .await
        .expect("failed to create fixture user");
    user.id
}

/// Create a category fixture.
///
/// # Panics
///
/// Panics on any database failure.
pub async fn create_category(pool: &SqlitePool, name: &str) -> Category {
    CategoryRepository::new(pool)
        .create(name)
        .await
        .expect("failed to create fixture category")
}

/// Create a product fixture with a past manufacture date.
///
/// # Panics
///
/// Panics on any database failure or invalid price literal.
pub async fn create_product(
    pool: &SqlitePool,
    category_id: CategoryId,
    name: &str,
    price: &str,
    quantity: i64,
) -> Product {
    let price = Price::parse(price).expect("valid fixture price");
    let man_date = NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date");

    ProductRepository::new(pool)
        .create(category_id, name, price, quantity, man_date)
        .await
        .expect("failed to create fixture product")
}

/// Fetch a product's current stock level.
///
/// # Panics
///
/// Panics if the product does not exist.
pub async fn stock_of(pool: &SqlitePool, product_id: ProductId) -> i64 {
    ProductRepository::new(pool)
        .get(product_id)
        .await
        .expect("query failed")
        .expect("product missing")
        .quantity
}
