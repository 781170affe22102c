//! Authentication service.
//!
//! Handles registration, login, and profile updates. Passwords are hashed
//! with Argon2id; verification treats the stored hash as opaque.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;

use greenbasket_core::{UserId, Username};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::User;

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new (non-admin) user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if a required field is blank or the
    /// passwords don't match.
    /// Returns `AuthError::InvalidUsername` if the username is malformed.
    /// Returns `AuthError::UsernameTaken` if the username is already registered.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        confirm_password: &str,
        name: &str,
    ) -> Result<User, AuthError> {
        if username.is_empty() || password.is_empty() || confirm_password.is_empty() {
            return Err(AuthError::Validation(
                "Please fill out all fields".to_owned(),
            ));
        }

        if password != confirm_password {
            return Err(AuthError::Validation("Passwords do not match".to_owned()));
        }

        let username = Username::parse(username)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(&username, &password_hash, name, false)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UsernameTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if a field is blank.
    /// Returns `AuthError::UserNotFound` if the username is unknown.
    /// Returns `AuthError::IncorrectPassword` if the password doesn't verify.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "Please fill out all fields".to_owned(),
            ));
        }

        let (user, password_hash) = self
            .users
            .get_with_password_hash(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Update a user's username, password, and display name.
    ///
    /// The current password must verify before anything changes; the
    /// username may collide only with the user themselves.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if a required field is blank.
    /// Returns `AuthError::IncorrectPassword` if `current_password` doesn't verify.
    /// Returns `AuthError::UsernameTaken` on a collision with another user.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        username: &str,
        current_password: &str,
        new_password: &str,
        name: &str,
    ) -> Result<User, AuthError> {
        if username.is_empty() || current_password.is_empty() || new_password.is_empty() {
            return Err(AuthError::Validation(
                "Please fill out all the required fields".to_owned(),
            ));
        }

        let username = Username::parse(username)?;

        let stored_hash = self.users.get_password_hash(user_id).await?;
        verify_password(current_password, &stored_hash)?;

        let new_hash = hash_password(new_password)?;

        self.users
            .update_profile(user_id, &username, &new_hash, name)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UsernameTaken,
                other => AuthError::Repository(other),
            })?;

        self.get_user(user_id).await
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::IncorrectPassword)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::IncorrectPassword)
}

/// Hash a password for out-of-band account creation (CLI, seeding).
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password_for_new_user(password: &str) -> Result<String, AuthError> {
    hash_password(password)
}
