//! Catalog route: what's on the shelves.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;
use vendo_core::{Category, Product, DENOMINATIONS};

/// The catalog as customers see it: products grouped by shelf, plus the
/// denominations the machine accepts.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub cakes: Vec<CatalogItem>,
    pub drinks: Vec<CatalogItem>,
    pub denominations: Vec<u32>,
}

#[derive(Debug, Serialize)]
pub struct CatalogItem {
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
    /// Display price, e.g. "Rs 30.00"
    pub price: String,
    pub quantity: i64,
    pub available: bool,
}

impl From<&Product> for CatalogItem {
    fn from(product: &Product) -> Self {
        CatalogItem {
            id: product.id,
            name: product.name.clone(),
            price_cents: product.price_cents,
            price: product.price().to_string(),
            quantity: product.quantity,
            available: product.is_available(),
        }
    }
}

/// `GET /api/catalog`
pub async fn get_catalog(State(state): State<AppState>) -> Result<Json<CatalogResponse>, ApiError> {
    let products = state.db.products().list_all().await?;

    let group = |category: Category| -> Vec<CatalogItem> {
        products
            .iter()
            .filter(|p| p.category == category)
            .map(CatalogItem::from)
            .collect()
    };

    Ok(Json(CatalogResponse {
        cakes: group(Category::Cake),
        drinks: group(Category::Drink),
        denominations: DENOMINATIONS.to_vec(),
    }))
}
