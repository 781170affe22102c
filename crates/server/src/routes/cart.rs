//! Cart and checkout route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use greenbasket_core::{CartLineId, ProductId};

use crate::error::AppError;
use crate::middleware::auth::RequireUser;
use crate::routes::{MessageQuery, redirect_with_error, redirect_with_success};
use crate::services::cart::{CartError, CartService};
use crate::services::checkout::{CheckoutError, CheckoutService};
use crate::state::AppState;

/// Add-to-cart form data.
///
/// Quantity arrives as raw text so a malformed value becomes a flash
/// message rather than a form rejection.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub quantity: String,
}

/// A cart line prepared for display.
pub struct CartLineView {
    pub id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: String,
    pub line_total: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartTemplate {
    pub username: String,
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Handle add-to-cart form submission.
pub async fn add_to_cart(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(product_id): Path<i64>,
    Form(form): Form<AddToCartForm>,
) -> Result<Response, AppError> {
    let Ok(quantity) = form.quantity.trim().parse::<i64>() else {
        return Ok(redirect_with_error("/", "Invalid quantity").into_response());
    };

    let carts = CartService::new(state.pool());

    match carts
        .add_to_cart(user.id, ProductId::new(product_id), quantity)
        .await
    {
        Ok(()) => Ok(redirect_with_success("/", "Product added to cart").into_response()),
        Err(CartError::ProductNotFound) => {
            Ok(redirect_with_error("/", "Product does not exist").into_response())
        }
        Err(e @ (CartError::InvalidQuantity(_) | CartError::InsufficientStock { .. })) => {
            Ok(redirect_with_error("/", &e.to_string()).into_response())
        }
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}

/// Display the cart page.
pub async fn show(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<MessageQuery>,
) -> Result<CartTemplate, AppError> {
    let carts = CartService::new(state.pool());
    let summary = carts
        .list_cart(user.id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let lines = summary
        .lines
        .iter()
        .map(|line| CartLineView {
            id: line.id.as_i64(),
            product_name: line.product_name.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price.to_string(),
            line_total: line.line_total().to_string(),
        })
        .collect();

    Ok(CartTemplate {
        username: user.username,
        lines,
        total: summary.total.to_string(),
        error: query.error,
        success: query.success,
    })
}

/// Handle cart line removal.
pub async fn remove_line(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(line_id): Path<i64>,
) -> Result<Response, AppError> {
    let carts = CartService::new(state.pool());

    match carts.remove_line(CartLineId::new(line_id), user.id).await {
        Ok(()) => Ok(redirect_with_success("/cart", "Item removed").into_response()),
        Err(CartError::LineNotFound) => {
            Ok(redirect_with_error("/cart", "Item is no longer in your cart").into_response())
        }
        Err(CartError::NotLineOwner) => Err(AppError::Forbidden(
            "Cart item belongs to another user".to_string(),
        )),
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}

/// Handle checkout: convert the cart into an order.
pub async fn checkout(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Response, AppError> {
    let service = CheckoutService::new(state.pool());

    match service.checkout(user.id).await {
        Ok(_) => Ok(redirect_with_success("/orders", "Order placed successfully").into_response()),
        Err(CheckoutError::EmptyCart) => {
            Ok(redirect_with_error("/cart", "Your cart is empty").into_response())
        }
        Err(e @ CheckoutError::InsufficientStock { .. }) => {
            Ok(redirect_with_error("/cart", &e.to_string()).into_response())
        }
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}
