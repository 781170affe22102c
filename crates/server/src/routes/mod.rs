//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Browse catalog (filterable)
//! GET  /health                 - Health check
//!
//! # Auth
//! GET  /login                  - Login page
//! POST /login                  - Login action
//! GET  /register               - Register page
//! POST /register               - Register action
//! GET  /logout                 - Logout action
//! GET  /profile                - Profile page (requires auth)
//! POST /profile                - Profile update action
//!
//! # Cart (requires auth)
//! POST /add_to_cart/{id}       - Add product to cart
//! GET  /cart                   - Cart page
//! POST /cart/{id}/delete       - Remove a cart line
//! POST /checkout               - Convert cart into an order
//!
//! # Orders (requires auth)
//! GET  /orders                 - Order history
//! GET  /export_csv             - Order history as CSV download
//!
//! # Admin (requires admin)
//! GET  /admin                  - Dashboard (categories with counts)
//! GET  /admin/category/new     - Category add form
//! POST /admin/category/new     - Create category
//! GET  /admin/category/{id}    - Category detail (products)
//! GET  /admin/category/{id}/edit    - Category edit form
//! POST /admin/category/{id}/edit    - Rename category
//! GET  /admin/category/{id}/delete  - Category delete confirmation
//! POST /admin/category/{id}/delete  - Delete category
//! GET  /admin/category/{id}/product/new  - Product add form
//! POST /admin/category/{id}/product/new  - Create product
//! GET  /admin/product/{id}/edit     - Product edit form
//! POST /admin/product/{id}/edit     - Update product
//! GET  /admin/product/{id}/delete   - Product delete confirmation
//! POST /admin/product/{id}/delete   - Delete product
//!
//! # API (no auth)
//! GET  /api/category           - Category name search as JSON
//! ```

pub mod admin;
pub mod api;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod orders;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use serde::Deserialize;

use crate::state::AppState;

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Redirect to `path` with a percent-encoded `?error=` message.
fn redirect_with_error(path: &str, message: &str) -> Redirect {
    Redirect::to(&format!("{path}?error={}", urlencoding::encode(message)))
}

/// Redirect to `path` with a percent-encoded `?success=` message.
fn redirect_with_success(path: &str, message: &str) -> Redirect {
    Redirect::to(&format!("{path}?success={}", urlencoding::encode(message)))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", get(auth::logout))
        .route("/profile", get(auth::profile_page).post(auth::update_profile))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add_to_cart/{id}", post(cart::add_to_cart))
        .route("/cart", get(cart::show))
        .route("/cart/{id}/delete", post(cart::remove_line))
        .route("/checkout", post(cart::checkout))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(orders::history))
        .route("/export_csv", get(orders::export_csv))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::dashboard))
        .route(
            "/category/new",
            get(admin::category_new_page).post(admin::category_create),
        )
        .route("/category/{id}", get(admin::category_show))
        .route(
            "/category/{id}/edit",
            get(admin::category_edit_page).post(admin::category_rename),
        )
        .route(
            "/category/{id}/delete",
            get(admin::category_delete_page).post(admin::category_delete),
        )
        .route(
            "/category/{id}/product/new",
            get(admin::product_new_page).post(admin::product_create),
        )
        .route(
            "/product/{id}/edit",
            get(admin::product_edit_page).post(admin::product_update),
        )
        .route(
            "/product/{id}/delete",
            get(admin::product_delete_page).post(admin::product_delete),
        )
}

/// Create all routes for the server.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Browse page
        .route("/", get(catalog::browse))
        // Auth routes
        .merge(auth_routes())
        // Cart routes
        .merge(cart_routes())
        // Order routes
        .merge(order_routes())
        // Admin routes
        .nest("/admin", admin_routes())
        // JSON API
        .route("/api/category", get(api::category_search))
}
