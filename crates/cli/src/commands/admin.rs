//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! gb-cli admin create -u admin -p changeit -n "Store Admin"
//! ```
//!
//! # Environment Variables
//!
//! - `GREENBASKET_DATABASE_URL` - `SQLite` connection string

use thiserror::Error;

use greenbasket_core::{Username, UsernameError};
use greenbasket_server::db::RepositoryError;
use greenbasket_server::db::users::UserRepository;
use greenbasket_server::services::auth::hash_password_for_new_user;

use super::CommandError;

/// Errors that can occur during admin account creation.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Shared command failure (env, connection, migration).
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Username is malformed.
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// Password is empty.
    #[error("Password must not be empty")]
    EmptyPassword,

    /// Password hashing failed.
    #[error("Failed to hash password")]
    PasswordHash,

    /// Username is already registered.
    #[error("A user already exists with username: {0}")]
    UserExists(String),

    /// Database error.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Create a new admin user.
///
/// # Errors
///
/// Returns `AdminError::UserExists` if the username is taken, or validation
/// errors for a malformed username or empty password.
pub async fn create_user(username: &str, password: &str, name: &str) -> Result<(), AdminError> {
    let username = Username::parse(username)?;

    if password.is_empty() {
        return Err(AdminError::EmptyPassword);
    }

    let password_hash =
        hash_password_for_new_user(password).map_err(|_| AdminError::PasswordHash)?;

    let pool = super::connect().await?;

    tracing::info!("Creating admin user: {}", username);

    let users = UserRepository::new(&pool);
    let user = users
        .create(&username, &password_hash, name, true)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AdminError::UserExists(username.to_string()),
            other => AdminError::Repository(other),
        })?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Username: {}",
        user.id,
        user.username
    );

    Ok(())
}
