//! Domain models for the storefront.
//!
//! Repositories return these fully-materialized models; nothing in the
//! request path relies on lazy relationship traversal.

pub mod cart;
pub mod catalog;
pub mod order;
pub mod session;
pub mod user;

pub use cart::{CartLine, CartLineDetail, CartSummary};
pub use catalog::{Category, CategoryProducts, CategoryWithCount, Product};
pub use order::HistoryEntry;
pub use session::{CurrentUser, session_keys};
pub use user::User;
