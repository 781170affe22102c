//! Catalog browse page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::AppError;
use crate::middleware::auth::RequireUser;
use crate::models::catalog::Product;
use crate::routes::redirect_with_error;
use crate::services::catalog::{CatalogError, CatalogService};
use crate::state::AppState;

/// Query parameters for the browse page: optional filters plus flash
/// messages.
#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    /// Category name substring filter.
    pub cname: Option<String>,
    /// Product name substring filter.
    pub pname: Option<String>,
    /// Maximum price filter.
    pub price: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// A product prepared for display.
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub price: String,
    pub quantity: i64,
    pub man_date: String,
}

impl ProductView {
    fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            price: product.price.to_string(),
            quantity: product.quantity,
            man_date: product.man_date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// A category with its (filtered) products, prepared for display.
pub struct CategorySection {
    pub id: i64,
    pub name: String,
    pub products: Vec<ProductView>,
}

/// Browse page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct BrowseTemplate {
    pub username: String,
    pub sections: Vec<CategorySection>,
    pub cname: String,
    pub pname: String,
    pub price: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the catalog, optionally filtered by category name, product name,
/// and maximum price. Admins are sent to their dashboard instead.
pub async fn browse(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<BrowseQuery>,
) -> Result<Response, AppError> {
    if user.is_admin {
        return Ok(Redirect::to("/admin").into_response());
    }

    let cname = query.cname.unwrap_or_default();
    let pname = query.pname.unwrap_or_default();
    let price = query.price.unwrap_or_default();

    let max_price = if price.trim().is_empty() {
        None
    } else {
        match CatalogService::parse_max_price(&price) {
            Ok(value) => Some(value),
            Err(CatalogError::InvalidFilter(msg)) => {
                return Ok(redirect_with_error("/", &msg).into_response());
            }
            Err(e) => return Err(AppError::Internal(e.to_string())),
        }
    };

    let catalog = CatalogService::new(state.pool());
    let category_filter = (!cname.trim().is_empty()).then(|| cname.trim());
    let groups = catalog
        .list_for_display(category_filter)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let product_filters_active = !pname.trim().is_empty() || max_price.is_some();
    let pname_lower = pname.trim().to_lowercase();

    let mut sections = Vec::with_capacity(groups.len());
    for group in &groups {
        let products: Vec<ProductView> = group
            .products
            .iter()
            .filter(|p| matches_filters(p, &pname_lower, max_price))
            .map(ProductView::from_product)
            .collect();

        // Filtered-out categories would just be empty headers
        if product_filters_active && products.is_empty() {
            continue;
        }

        sections.push(CategorySection {
            id: group.category.id.as_i64(),
            name: group.category.name.clone(),
            products,
        });
    }

    Ok(BrowseTemplate {
        username: user.username,
        sections,
        cname,
        pname,
        price,
        error: query.error,
        success: query.success,
    }
    .into_response())
}

fn matches_filters(product: &Product, pname_lower: &str, max_price: Option<Decimal>) -> bool {
    if !pname_lower.is_empty() && !product.name.to_lowercase().contains(pname_lower) {
        return false;
    }
    if let Some(max) = max_price
        && product.price.amount() > max
    {
        return false;
    }
    true
}
