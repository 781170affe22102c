//! Admin route handlers: category and product management.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use greenbasket_core::{CategoryId, ProductId};

use crate::error::AppError;
use crate::middleware::auth::RequireAdmin;
use crate::models::catalog::Product;
use crate::routes::{MessageQuery, redirect_with_error, redirect_with_success};
use crate::services::admin::{AdminError, AdminService, ProductInput};
use crate::services::catalog::{CatalogError, CatalogService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Category create/rename form data.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    pub name: String,
}

/// Product create/update form data. All fields arrive as raw strings and
/// are validated by the admin service.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub quantity: String,
    pub man_date: String,
    pub category_id: i64,
}

/// Query parameters for the dashboard: optional category search plus
/// flash messages.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub q: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// View Types
// =============================================================================

/// A category row on the dashboard.
pub struct CategoryCountView {
    pub id: i64,
    pub name: String,
    pub product_count: i64,
}

/// A product row on the category detail page.
pub struct ProductRowView {
    pub id: i64,
    pub name: String,
    pub price: String,
    pub quantity: i64,
    pub man_date: String,
}

impl ProductRowView {
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

/// A category option in the product form's select.
pub struct CategoryOption {
    pub id: i64,
    pub name: String,
    pub selected: bool,
}

// =============================================================================
// Templates
// =============================================================================

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub username: String,
    pub categories: Vec<CategoryCountView>,
    pub q: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Category add/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/category_form.html")]
pub struct CategoryFormTemplate {
    pub username: String,
    pub action: String,
    pub name: String,
    pub editing: bool,
    pub error: Option<String>,
}

/// Category detail template (products in the category).
#[derive(Template, WebTemplate)]
#[template(path = "admin/category_show.html")]
pub struct CategoryShowTemplate {
    pub username: String,
    pub id: i64,
    pub name: String,
    pub products: Vec<ProductRowView>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Category delete confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/category_delete.html")]
pub struct CategoryDeleteTemplate {
    pub username: String,
    pub id: i64,
    pub name: String,
    pub product_count: i64,
}

/// Product add/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/product_form.html")]
pub struct ProductFormTemplate {
    pub username: String,
    pub action: String,
    pub editing: bool,
    pub name: String,
    pub price: String,
    pub quantity: String,
    pub man_date: String,
    pub categories: Vec<CategoryOption>,
    pub error: Option<String>,
}

/// Product delete confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/product_delete.html")]
pub struct ProductDeleteTemplate {
    pub username: String,
    pub id: i64,
    pub name: String,
}

// =============================================================================
// Dashboard
// =============================================================================

/// Display the admin dashboard: all categories with product counts,
/// optionally narrowed by a name substring.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<DashboardQuery>,
) -> Result<DashboardTemplate, AppError> {
    let catalog = CatalogService::new(state.pool());
    let all = catalog
        .list_categories()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let q = query.q.unwrap_or_default();
    let q_lower = q.trim().to_lowercase();

    let categories = all
        .iter()
        .filter(|c| q_lower.is_empty() || c.name.to_lowercase().contains(&q_lower))
        .map(|c| CategoryCountView {
            id: c.id.as_i64(),
            name: c.name.clone(),
            product_count: c.product_count,
        })
        .collect();

    Ok(DashboardTemplate {
        username: admin.username,
        categories,
        q,
        error: query.error,
        success: query.success,
    })
}

// =============================================================================
// Categories
// =============================================================================

/// Display the category add form.
pub async fn category_new_page(
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    CategoryFormTemplate {
        username: admin.username,
        action: "/admin/category/new".to_string(),
        name: String::new(),
        editing: false,
        error: query.error,
    }
}

/// Handle category creation.
pub async fn category_create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Form(form): Form<CategoryForm>,
) -> Result<Response, AppError> {
    let admin = AdminService::new(state.pool());

    match admin.create_category(form.name.trim()).await {
        Ok(_) => Ok(redirect_with_success("/admin", "Category added").into_response()),
        Err(AdminError::Validation(msg)) => {
            Ok(redirect_with_error("/admin/category/new", &msg).into_response())
        }
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}

/// Display a category's products.
pub async fn category_show(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Query(query): Query<MessageQuery>,
) -> Result<CategoryShowTemplate, AppError> {
    let catalog = CatalogService::new(state.pool());
    let id = CategoryId::new(id);

    let category = get_category(&catalog, id).await?;
    let products = catalog
        .products_in_category(id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(CategoryShowTemplate {
        username: admin.username,
        id: category.id.as_i64(),
        name: category.name,
        products: products.iter().map(ProductRowView::from_product).collect(),
        error: query.error,
        success: query.success,
    })
}

/// Display the category edit form.
pub async fn category_edit_page(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Query(query): Query<MessageQuery>,
) -> Result<CategoryFormTemplate, AppError> {
    let catalog = CatalogService::new(state.pool());
    let category = get_category(&catalog, CategoryId::new(id)).await?;

    Ok(CategoryFormTemplate {
        username: admin.username,
        action: format!("/admin/category/{id}/edit"),
        name: category.name,
        editing: true,
        error: query.error,
    })
}

/// Handle category rename.
pub async fn category_rename(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
    Form(form): Form<CategoryForm>,
) -> Result<Response, AppError> {
    let admin = AdminService::new(state.pool());

    match admin
        .rename_category(CategoryId::new(id), form.name.trim())
        .await
    {
        Ok(()) => Ok(redirect_with_success("/admin", "Category updated").into_response()),
        Err(AdminError::Validation(msg)) => {
            Ok(redirect_with_error(&format!("/admin/category/{id}/edit"), &msg).into_response())
        }
        Err(AdminError::CategoryNotFound) => {
            Err(AppError::NotFound(format!("category {id}")))
        }
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}

/// Display the category delete confirmation page.
pub async fn category_delete_page(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<CategoryDeleteTemplate, AppError> {
    let catalog = CatalogService::new(state.pool());
    let category_id = CategoryId::new(id);
    let category = get_category(&catalog, category_id).await?;

    let product_count = crate::db::categories::CategoryRepository::new(state.pool())
        .product_count(category_id)
        .await?;

    Ok(CategoryDeleteTemplate {
        username: admin.username,
        id,
        name: category.name,
        product_count,
    })
}

/// Handle category deletion.
pub async fn category_delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let admin = AdminService::new(state.pool());

    match admin.delete_category(CategoryId::new(id)).await {
        Ok(()) => Ok(redirect_with_success("/admin", "Category deleted").into_response()),
        Err(AdminError::CategoryHasProducts) => Ok(redirect_with_error(
            "/admin",
            "Cannot delete a category that still has products",
        )
        .into_response()),
        Err(AdminError::CategoryNotFound) => Err(AppError::NotFound(format!("category {id}"))),
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}

// =============================================================================
// Products
// =============================================================================

/// Display the product add form for a category.
pub async fn product_new_page(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(category_id): Path<i64>,
    Query(query): Query<MessageQuery>,
) -> Result<ProductFormTemplate, AppError> {
    let catalog = CatalogService::new(state.pool());
    let id = CategoryId::new(category_id);
    get_category(&catalog, id).await?;

    let categories = category_options(&catalog, id).await?;

    Ok(ProductFormTemplate {
        username: admin.username,
        action: format!("/admin/category/{category_id}/product/new"),
        editing: false,
        name: String::new(),
        price: String::new(),
        quantity: String::new(),
        man_date: String::new(),
        categories,
        error: query.error,
    })
}

/// Handle product creation.
pub async fn product_create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(category_id): Path<i64>,
    Form(form): Form<ProductForm>,
) -> Result<Response, AppError> {
    let admin = AdminService::new(state.pool());
    let form_page = format!("/admin/category/{category_id}/product/new");

    let input = match parse_product_form(&form) {
        Ok(input) => input,
        Err(msg) => return Ok(redirect_with_error(&form_page, &msg).into_response()),
    };

    match admin
        .create_product(CategoryId::new(form.category_id), input)
        .await
    {
        Ok(_) => Ok(redirect_with_success(
            &format!("/admin/category/{}", form.category_id),
            "Product added",
        )
        .into_response()),
        Err(AdminError::CategoryNotFound) => Err(AppError::NotFound(format!(
            "category {}",
            form.category_id
        ))),
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}

/// Display the product edit form.
pub async fn product_edit_page(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Query(query): Query<MessageQuery>,
) -> Result<ProductFormTemplate, AppError> {
    let catalog = CatalogService::new(state.pool());
    let product = get_product(&catalog, ProductId::new(id)).await?;

    let categories = category_options(&catalog, product.category_id).await?;

    Ok(ProductFormTemplate {
        username: admin.username,
        action: format!("/admin/product/{id}/edit"),
        editing: true,
        name: product.name,
        price: product.price.to_string(),
        quantity: product.quantity.to_string(),
        man_date: product.man_date.format("%Y-%m-%d").to_string(),
        categories,
        error: query.error,
    })
}

/// Handle product update.
pub async fn product_update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
    Form(form): Form<ProductForm>,
) -> Result<Response, AppError> {
    let admin = AdminService::new(state.pool());
    let form_page = format!("/admin/product/{id}/edit");

    let input = match parse_product_form(&form) {
        Ok(input) => input,
        Err(msg) => return Ok(redirect_with_error(&form_page, &msg).into_response()),
    };

    match admin
        .update_product(
            ProductId::new(id),
            CategoryId::new(form.category_id),
            input,
        )
        .await
    {
        Ok(()) => Ok(redirect_with_success(
            &format!("/admin/category/{}", form.category_id),
            "Product updated",
        )
        .into_response()),
        Err(AdminError::ProductNotFound) => Err(AppError::NotFound(format!("product {id}"))),
        Err(AdminError::CategoryNotFound) => Err(AppError::NotFound(format!(
            "category {}",
            form.category_id
        ))),
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}

/// Display the product delete confirmation page.
pub async fn product_delete_page(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<ProductDeleteTemplate, AppError> {
    let catalog = CatalogService::new(state.pool());
    let product = get_product(&catalog, ProductId::new(id)).await?;

    Ok(ProductDeleteTemplate {
        username: admin.username,
        id,
        name: product.name,
    })
}

/// Handle product deletion.
pub async fn product_delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let catalog = CatalogService::new(state.pool());
    let product = get_product(&catalog, ProductId::new(id)).await?;
    let category_id = product.category_id.as_i64();

    let admin = AdminService::new(state.pool());
    match admin.delete_product(ProductId::new(id)).await {
        Ok(()) => Ok(redirect_with_success(
            &format!("/admin/category/{category_id}"),
            "Product deleted",
        )
        .into_response()),
        Err(AdminError::ProductNotFound) => Err(AppError::NotFound(format!("product {id}"))),
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}

// =============================================================================
// Helpers
// =============================================================================

async fn get_category(
    catalog: &CatalogService<'_>,
    id: CategoryId,
) -> Result<crate::models::catalog::Category, AppError> {
    catalog.get_category(id).await.map_err(|e| match e {
        CatalogError::CategoryNotFound => AppError::NotFound(format!("category {id}")),
        other => AppError::Internal(other.to_string()),
    })
}

async fn get_product(
    catalog: &CatalogService<'_>,
    id: ProductId,
) -> Result<Product, AppError> {
    catalog.get_product(id).await.map_err(|e| match e {
        CatalogError::ProductNotFound => AppError::NotFound(format!("product {id}")),
        other => AppError::Internal(other.to_string()),
    })
}

async fn category_options(
    catalog: &CatalogService<'_>,
    selected: CategoryId,
) -> Result<Vec<CategoryOption>, AppError> {
    let categories = catalog
        .search_categories("")
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(categories
        .iter()
        .map(|c| CategoryOption {
            id: c.id.as_i64(),
            name: c.name.clone(),
            selected: c.id == selected,
        })
        .collect())
}

fn parse_product_form(form: &ProductForm) -> Result<ProductInput, String> {
    ProductInput::parse(
        form.name.trim(),
        form.price.trim(),
        form.quantity.trim(),
        form.man_date.trim(),
    )
    .map_err(|e| e.to_string())
}
