//! Business services for the storefront.
//!
//! Each service wraps one or more repositories and owns the business rules
//! for its slice of the system; route handlers translate service errors
//! into redirects and never touch SQL directly.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod export;
