//! Checkout engine.
//!
//! Converts a user's cart into a durable transaction + order set while
//! decrementing stock. Everything happens inside a single sqlx transaction:
//! all lines are validated against current stock before any mutation, and
//! the conditional decrement guards against a quantity that changed between
//! read and write. Any failure rolls the whole thing back, leaving cart and
//! stock untouched.

use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;

use greenbasket_core::{TransactionId, UserId};

use crate::db::RepositoryError;
use crate::db::cart::CartRepository;
use crate::db::orders::OrderRepository;
use crate::db::products::ProductRepository;

/// Errors from checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The user's cart has no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart line's quantity exceeds the product's on-hand stock.
    #[error("insufficient stock for {product}, only {available} available")]
    InsufficientStock {
        /// Name of the offending product.
        product: String,
        /// The product's current on-hand quantity.
        available: i64,
    },

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Checkout service.
pub struct CheckoutService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Convert the user's cart into a transaction with one order per line.
    ///
    /// On success the cart is empty, stock is decremented, and the new
    /// transaction's ID is returned. On any failure nothing is retained:
    /// no partial orders, no partial decrements.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the cart has no lines.
    /// Returns `CheckoutError::InsufficientStock` naming the first product
    /// whose stock cannot cover its cart line.
    pub async fn checkout(&self, user_id: UserId) -> Result<TransactionId, CheckoutError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let lines = CartRepository::list_detailed_tx(&mut tx, user_id).await?;
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        // Validate every line before touching anything.
        for line in &lines {
            if line.quantity > line.available {
                return Err(CheckoutError::InsufficientStock {
                    product: line.product_name.clone(),
                    available: line.available,
                });
            }
        }

        let transaction_id =
            OrderRepository::insert_transaction(&mut tx, user_id, Utc::now()).await?;

        for line in &lines {
            OrderRepository::insert_order(
                &mut tx,
                transaction_id,
                line.product_id,
                &line.product_name,
                line.quantity,
                line.unit_price,
            )
            .await?;

            // The decrement re-checks stock at write time; a concurrent
            // admin edit between our read and this write shows up here.
            let applied =
                ProductRepository::decrement_stock(&mut tx, line.product_id, line.quantity)
                    .await?;
            if !applied {
                return Err(CheckoutError::InsufficientStock {
                    product: line.product_name.clone(),
                    available: line.available,
                });
            }
        }

        CartRepository::clear_tx(&mut tx, user_id).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        tracing::info!(user_id = %user_id, transaction_id = %transaction_id, "checkout committed");

        Ok(transaction_id)
    }
}
