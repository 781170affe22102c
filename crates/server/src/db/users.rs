//! User repository for database operations.
//!
//! Queries are runtime-checked sqlx queries against SQLite; rows are
//! converted into domain models here so nothing above this layer sees raw
//! database shapes.

use sqlx::SqlitePool;

use greenbasket_core::{UserId, Username};

use super::RepositoryError;
use crate::models::user::User;

/// Raw row shape for the `users` table.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    username: String,
    name: String,
    is_admin: bool,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let username = Username::parse(&self.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;

        Ok(User {
            id: self.id,
            username,
            name: self.name,
            is_admin: self.is_admin,
        })
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored username is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, name, is_admin FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Get a user by their username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, name, is_admin FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Get a user together with their password hash, by username.
    ///
    /// Returns `None` if the username is unknown.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct CredentialRow {
            id: UserId,
            username: String,
            name: String,
            is_admin: bool,
            password_hash: String,
        }

        let row = sqlx::query_as::<_, CredentialRow>(
            "SELECT id, username, name, is_admin, password_hash
             FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        let Some(r) = row else {
            return Ok(None);
        };

        let hash = r.password_hash;
        let user = UserRow {
            id: r.id,
            username: r.username,
            name: r.name,
            is_admin: r.is_admin,
        }
        .into_user()?;

        Ok(Some((user, hash)))
    }

    /// Get a user's password hash by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(&self, id: UserId) -> Result<String, RepositoryError> {
        let hash: Option<(String,)> =
            sqlx::query_as("SELECT password_hash FROM users WHERE id = ?1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        hash.map(|(h,)| h).ok_or(RepositoryError::NotFound)
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        username: &Username,
        password_hash: &str,
        name: &str,
        is_admin: bool,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (username, password_hash, name, is_admin)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, username, name, is_admin",
        )
        .bind(username.as_str())
        .bind(password_hash)
        .bind(name)
        .bind(is_admin)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.into_user()
    }

    /// Update a user's username, password hash, and display name in one statement.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the new username collides with
    /// another user.
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn update_profile(
        &self,
        id: UserId,
        username: &Username,
        password_hash: &str,
        name: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET username = ?1, password_hash = ?2, name = ?3 WHERE id = ?4",
        )
        .bind(username.as_str())
        .bind(password_hash)
        .bind(name)
        .bind(id)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
