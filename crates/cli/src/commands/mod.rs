//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::SqlitePool;
use thiserror::Error;

/// Errors shared by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Connect to the database named by `GREENBASKET_DATABASE_URL`
/// (or `DATABASE_URL`).
pub(crate) async fn connect() -> Result<SqlitePool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("GREENBASKET_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("GREENBASKET_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    Ok(greenbasket_server::db::create_pool(&database_url).await?)
}
