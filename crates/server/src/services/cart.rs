//! Cart service: add/merge, list with total, and owner-checked removal.
//!
//! Stock checks here are advisory; checkout re-validates inside its own
//! transaction and is the authoritative gate.

use sqlx::SqlitePool;
use thiserror::Error;

use greenbasket_core::{CartLineId, ProductId, UserId};

use crate::db::RepositoryError;
use crate::db::cart::CartRepository;
use crate::db::products::ProductRepository;
use crate::models::cart::CartSummary;

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Referenced product does not exist.
    #[error("product does not exist")]
    ProductNotFound,

    /// Quantity was not a positive integer.
    #[error("{0}")]
    InvalidQuantity(String),

    /// Requested quantity exceeds the product's on-hand stock.
    #[error("invalid quantity for {product}, should be between 1 and {available}")]
    InsufficientStock {
        /// Name of the offending product.
        product: String,
        /// The product's current on-hand quantity.
        available: i64,
    },

    /// Cart line does not exist.
    #[error("cart line does not exist")]
    LineNotFound,

    /// Cart line belongs to a different user.
    #[error("cart line belongs to another user")]
    NotLineOwner,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Cart service.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            carts: CartRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// Add `quantity` of a product to the user's cart.
    ///
    /// If a line for this (user, product) pair already exists, the quantity
    /// merges into it; two lines for the same product never coexist. The
    /// effect is durable immediately.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if the product is absent.
    /// Returns `CartError::InvalidQuantity` if `quantity` is not positive.
    /// Returns `CartError::InsufficientStock` if the (merged) quantity would
    /// exceed the product's current on-hand stock.
    pub async fn add_to_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<(), CartError> {
        let product = self
            .products
            .get(product_id)
            .await?
            .ok_or(CartError::ProductNotFound)?;

        if quantity <= 0 {
            return Err(CartError::InvalidQuantity(
                "Quantity must be a positive number".to_owned(),
            ));
        }

        if quantity > product.quantity {
            return Err(CartError::InsufficientStock {
                product: product.name,
                available: product.quantity,
            });
        }

        match self.carts.find_line(user_id, product_id).await? {
            Some(line) => {
                if line.quantity + quantity > product.quantity {
                    return Err(CartError::InsufficientStock {
                        product: product.name,
                        available: product.quantity,
                    });
                }
                self.carts.increment_line(line.id, quantity).await?;
            }
            None => {
                self.carts.insert_line(user_id, product_id, quantity).await?;
            }
        }

        Ok(())
    }

    /// The user's cart lines plus the computed total at current prices.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the query fails.
    pub async fn list_cart(&self, user_id: UserId) -> Result<CartSummary, CartError> {
        let lines = self.carts.list_detailed(user_id).await?;
        Ok(CartSummary::new(lines))
    }

    /// Remove a cart line, enforcing ownership.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineNotFound` if the line doesn't exist.
    /// Returns `CartError::NotLineOwner` if it belongs to a different user.
    pub async fn remove_line(
        &self,
        line_id: CartLineId,
        user_id: UserId,
    ) -> Result<(), CartError> {
        let line = self
            .carts
            .get_line(line_id)
            .await?
            .ok_or(CartError::LineNotFound)?;

        if line.user_id != user_id {
            return Err(CartError::NotLineOwner);
        }

        self.carts.delete_line(line_id).await?;
        Ok(())
    }
}
