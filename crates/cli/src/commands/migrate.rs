//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! gb-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `GREENBASKET_DATABASE_URL` - `SQLite` connection string

use super::{CommandError, connect};

/// Run database migrations.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    greenbasket_server::db::MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
