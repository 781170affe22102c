//! Order history route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;

use crate::error::AppError;
use crate::middleware::auth::RequireUser;
use crate::routes::MessageQuery;
use crate::services::export::ExportService;
use crate::state::AppState;

/// An order line prepared for display.
pub struct OrderView {
    pub product_name: String,
    pub quantity: i64,
    pub price: String,
    pub line_total: String,
}

/// A past transaction with its orders, prepared for display.
pub struct TransactionView {
    pub id: i64,
    pub datetime: String,
    pub orders: Vec<OrderView>,
    pub total: String,
}

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders.html")]
pub struct OrdersTemplate {
    pub username: String,
    pub transactions: Vec<TransactionView>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the user's order history, grouped by transaction.
pub async fn history(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<MessageQuery>,
) -> Result<OrdersTemplate, AppError> {
    let orders = crate::db::orders::OrderRepository::new(state.pool());
    let entries = orders.history(user.id).await?;

    // Entries arrive ordered by transaction; fold consecutive runs into
    // one view per transaction.
    let mut transactions: Vec<TransactionView> = Vec::new();
    let mut totals: Vec<Decimal> = Vec::new();

    for entry in &entries {
        let line_total = entry.price.total(entry.quantity);
        let view = OrderView {
            product_name: entry.product_name.clone(),
            quantity: entry.quantity,
            price: entry.price.to_string(),
            line_total: line_total.to_string(),
        };

        match transactions.last_mut() {
            Some(last) if last.id == entry.transaction_id.as_i64() => {
                last.orders.push(view);
                if let Some(total) = totals.last_mut() {
                    *total += line_total;
                }
            }
            _ => {
                transactions.push(TransactionView {
                    id: entry.transaction_id.as_i64(),
                    datetime: entry.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    orders: vec![view],
                    total: String::new(),
                });
                totals.push(line_total);
            }
        }
    }

    for (transaction, total) in transactions.iter_mut().zip(&totals) {
        transaction.total = total.to_string();
    }

    Ok(OrdersTemplate {
        username: user.username,
        transactions,
        error: query.error,
        success: query.success,
    })
}

/// Download the user's order history as a CSV attachment.
pub async fn export_csv(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Response, AppError> {
    let export = ExportService::new(state.pool());
    let bytes = export
        .order_history_csv(user.id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"order_history.csv\"",
            ),
        ],
        bytes,
    )
        .into_response())
}
