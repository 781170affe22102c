//! JSON API route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::catalog::CatalogService;
use crate::state::AppState;

/// Query parameters for category search.
#[derive(Debug, Deserialize)]
pub struct CategorySearchQuery {
    /// Name substring to match; empty or absent matches everything.
    #[serde(default)]
    pub q: String,
}

/// A category in API responses.
#[derive(Debug, Serialize)]
pub struct CategoryJson {
    pub id: i64,
    pub name: String,
}

/// Search categories by name substring, returning JSON.
pub async fn category_search(
    State(state): State<AppState>,
    Query(query): Query<CategorySearchQuery>,
) -> Result<Json<Vec<CategoryJson>>, AppError> {
    let catalog = CatalogService::new(state.pool());
    let categories = catalog
        .search_categories(query.q.trim())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(
        categories
            .iter()
            .map(|c| CategoryJson {
                id: c.id.as_i64(),
                name: c.name.clone(),
            })
            .collect(),
    ))
}
