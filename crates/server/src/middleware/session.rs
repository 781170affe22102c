//! Session middleware configuration.
//!
//! Sets up `SQLite`-backed sessions using tower-sessions. The session table
//! lives in the application database and is created on startup via
//! `SqliteStore::migrate`.

use sqlx::SqlitePool;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::ServerConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "greenbasket_session";

/// Session expiry time in seconds (7 days of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with a `SQLite` store.
///
/// # Errors
///
/// Returns a `sqlx` error if the session table migration fails.
pub async fn create_session_layer(
    pool: &SqlitePool,
    config: &ServerConfig,
) -> Result<SessionManagerLayer<SqliteStore>, sqlx::Error> {
    let store = SqliteStore::new(pool.clone());
    store.migrate().await?;

    let is_secure = config
        .base_url
        .as_deref()
        .is_some_and(|url| url.starts_with("https://"));

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/"))
}
