//! Cart models.

use greenbasket_core::{CartLineId, Price, ProductId, UserId};
use rust_decimal::Decimal;

/// A pending purchase intent for one product at one quantity.
///
/// At most one line exists per (user, product) pair; adding the same
/// product again merges into the existing line.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartLine {
    pub id: CartLineId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i64,
}

/// A cart line joined with the product it references.
///
/// `unit_price` and `available` reflect the product's *current* state; the
/// permanent snapshot is only taken at checkout.
#[derive(Debug, Clone)]
pub struct CartLineDetail {
    pub id: CartLineId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Price,
    /// Product's current on-hand quantity.
    pub available: i64,
}

impl CartLineDetail {
    /// Line total at the current price.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.total(self.quantity)
    }
}

/// A user's cart with its computed total.
#[derive(Debug, Clone)]
pub struct CartSummary {
    pub lines: Vec<CartLineDetail>,
    pub total: Decimal,
}

impl CartSummary {
    /// Build a summary from detailed lines, summing line totals.
    #[must_use]
    pub fn new(lines: Vec<CartLineDetail>) -> Self {
        let total = lines.iter().map(CartLineDetail::line_total).sum();
        Self { lines, total }
    }
}
