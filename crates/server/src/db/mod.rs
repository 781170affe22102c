//! Database operations for the GreenBasket SQLite store.
//!
//! ## Tables
//!
//! - `users` - Accounts and the administrator flag
//! - `categories` / `products` - The catalog
//! - `cart_lines` - Pending purchase intents, one per (user, product)
//! - `transactions` / `orders` - Immutable purchase history
//! - `tower_sessions` - Session storage (created by the session store)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p greenbasket-cli -- migrate
//! ```

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub mod cart;
pub mod categories;
pub mod orders;
pub mod products;
pub mod users;

/// Embedded migrations for the GreenBasket schema.
///
/// Exposed so the CLI and the integration-test harness can apply the same
/// migrations the server expects.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a SQLite connection pool with sensible defaults.
///
/// Foreign keys are enforced on every connection and the database file is
/// created if missing.
///
/// # Arguments
///
/// * `database_url` - SQLite connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be
/// established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}
