//! User account model.

use greenbasket_core::{UserId, Username};

/// A registered account.
///
/// The password hash deliberately lives outside this struct; repositories
/// only hand it out through the dedicated credential lookup.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    /// Display name, may be empty.
    pub name: String,
    /// Administrator flag; admins manage the catalog instead of shopping.
    pub is_admin: bool,
}
