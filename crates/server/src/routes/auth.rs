//! Authentication route handlers.
//!
//! Login, registration, logout, and profile updates. Validation failures
//! are sent back to the originating page as `?error=` flash messages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::AppError;
use crate::middleware::auth::{RequireUser, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::models::user::User;
use crate::routes::{MessageQuery, redirect_with_error, redirect_with_success};
use crate::services::auth::AuthService;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub name: String,
}

/// Profile update form data.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub username: String,
    pub current_password: String,
    pub new_password: String,
    #[serde(default)]
    pub name: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/profile.html")]
pub struct ProfileTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
    pub username: String,
    pub name: String,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error,
        success: query.success,
    }
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth = AuthService::new(state.pool());

    match auth.login(&form.username, &form.password).await {
        Ok(user) => {
            let is_admin = user.is_admin;
            if let Err(e) = set_current_user(&session, &current_user(&user)).await {
                tracing::error!("Failed to set session: {}", e);
                return redirect_with_error("/login", "Session error, please try again")
                    .into_response();
            }

            if is_admin {
                Redirect::to("/admin").into_response()
            } else {
                Redirect::to("/").into_response()
            }
        }
        Err(e) => {
            tracing::warn!("Login failed: {}", e);
            redirect_with_error("/login", &login_error_message(&e)).into_response()
        }
    }
}

/// Handle logout.
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    clear_current_user(&session).await?;
    Ok(redirect_with_success("/login", "You have been logged out"))
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate { error: query.error }
}

/// Handle registration form submission.
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    let auth = AuthService::new(state.pool());

    match auth
        .register(
            &form.username,
            &form.password,
            &form.confirm_password,
            &form.name,
        )
        .await
    {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "New user registered");
            redirect_with_success("/login", "Account created, please log in").into_response()
        }
        Err(e) => redirect_with_error("/register", &e.to_string()).into_response(),
    }
}

// =============================================================================
// Profile Routes
// =============================================================================

/// Display the profile page.
pub async fn profile_page(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Query(query): Query<MessageQuery>,
) -> Result<ProfileTemplate, AppError> {
    let auth = AuthService::new(state.pool());
    let user = auth.get_user(current.id).await?;

    Ok(ProfileTemplate {
        error: query.error,
        success: query.success,
        username: user.username.to_string(),
        name: user.name,
    })
}

/// Handle profile update form submission.
pub async fn update_profile(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> Result<Response, AppError> {
    let auth = AuthService::new(state.pool());

    match auth
        .update_profile(
            current.id,
            &form.username,
            &form.current_password,
            &form.new_password,
            &form.name,
        )
        .await
    {
        Ok(user) => {
            // The session snapshot must track the new username
            set_current_user(&session, &current_user(&user)).await?;
            Ok(redirect_with_success("/profile", "Profile updated").into_response())
        }
        Err(e) => Ok(redirect_with_error("/profile", &e.to_string()).into_response()),
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn current_user(user: &User) -> CurrentUser {
    CurrentUser {
        id: user.id,
        username: user.username.to_string(),
        is_admin: user.is_admin,
    }
}

fn login_error_message(error: &crate::services::auth::AuthError) -> String {
    use crate::services::auth::AuthError;
    match error {
        AuthError::UserNotFound | AuthError::IncorrectPassword => {
            "Invalid username or password".to_string()
        }
        AuthError::Validation(msg) => msg.clone(),
        _ => "Login failed, please try again".to_string(),
    }
}
