//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid username format.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] greenbasket_core::UsernameError),

    /// Missing or malformed form input.
    #[error("{0}")]
    Validation(String),

    /// Username not registered.
    #[error("username does not exist")]
    UserNotFound,

    /// Password did not verify against the stored hash.
    #[error("incorrect password")]
    IncorrectPassword,

    /// Username already registered (or collides on profile update).
    #[error("username already exists")]
    UsernameTaken,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
