//! Purchase history route.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;
use vendo_core::HistoryEntry;
use vendo_db::repository::purchase::HISTORY_LIMIT;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub transactions: Vec<HistoryItem>,
}

#[derive(Debug, Serialize)]
pub struct HistoryItem {
    pub id: i64,
    pub transaction_date: String,
    pub product_name: String,
    pub quantity: i64,
    pub total_price_cents: i64,
    pub money_inserted_cents: i64,
    pub change_returned_cents: i64,
    pub stock_after: i64,
}

impl From<&HistoryEntry> for HistoryItem {
    fn from(entry: &HistoryEntry) -> Self {
        HistoryItem {
            id: entry.id,
            transaction_date: entry.transaction_date.to_rfc3339(),
            product_name: entry.product_name.clone(),
            quantity: entry.quantity,
            total_price_cents: entry.total_price_cents,
            money_inserted_cents: entry.money_inserted_cents,
            change_returned_cents: entry.change_returned_cents,
            stock_after: entry.stock_after,
        }
    }
}

/// `GET /api/history?limit=N`
///
/// Newest first; capped at 50 regardless of the requested limit.
pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let limit = query.limit.unwrap_or(HISTORY_LIMIT);
    let entries = state.db.purchases().history(limit).await?;

    Ok(Json(HistoryResponse {
        transactions: entries.iter().map(HistoryItem::from).collect(),
    }))
}
