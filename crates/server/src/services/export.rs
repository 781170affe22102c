//! Order-history CSV export.

use sqlx::SqlitePool;
use thiserror::Error;

use greenbasket_core::UserId;

use crate::db::RepositoryError;
use crate::db::orders::OrderRepository;

/// Errors from export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Export service.
pub struct ExportService<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> ExportService<'a> {
    /// Create a new export service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }

    /// Render the user's order history as CSV bytes.
    ///
    /// One row per order, ordered by transaction then order ID. A user with
    /// no orders gets a header-only document.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Repository` if the history query fails, or
    /// `ExportError::Csv` if serialization fails.
    pub async fn order_history_csv(&self, user_id: UserId) -> Result<Vec<u8>, ExportError> {
        let entries = self.orders.history(user_id).await?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["transaction_id", "datetime", "product_name", "quantity", "price"])?;

        for entry in &entries {
            writer.write_record([
                entry.transaction_id.to_string(),
                entry.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                entry.product_name.clone(),
                entry.quantity.to_string(),
                entry.price.to_string(),
            ])?;
        }

        writer
            .into_inner()
            .map_err(|e| ExportError::Csv(e.into_error().into()))
    }
}
