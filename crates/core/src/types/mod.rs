//! Newtype wrappers for domain primitives.

pub mod id;
pub mod price;
pub mod username;

pub use id::{CartLineId, CategoryId, OrderId, ProductId, TransactionId, UserId};
pub use price::{Price, PriceError};
pub use username::{Username, UsernameError};
