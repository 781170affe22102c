//! Purchase history models.
//!
//! Transactions and orders are immutable after checkout. Orders carry a
//! snapshot of product name and unit price, decoupled from later catalog
//! edits or product deletion.

use chrono::{DateTime, Utc};
use greenbasket_core::{Price, TransactionId};

/// One order line of a user's purchase history, flattened for display
/// and CSV export. Rows are ordered by transaction, then storage order.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub transaction_id: TransactionId,
    pub created_at: DateTime<Utc>,
    pub product_name: String,
    pub quantity: i64,
    /// Unit price at time of purchase.
    pub price: Price,
}
